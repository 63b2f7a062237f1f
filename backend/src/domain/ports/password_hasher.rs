//! Port for one-way password hashing.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised while hashing a password.
    pub enum PasswordHashError {
        /// The hashing backend rejected the input or its parameters.
        Hash { message: String } => "password hashing failed: {message}",
    }
}

/// Salted password hashing.
///
/// `verify` never fails: a malformed stored hash simply does not match.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Hash `password` with a fresh random salt.
    async fn hash(&self, password: &str) -> Result<String, PasswordHashError>;

    /// Check `password` against a stored hash.
    async fn verify(&self, password: &str, hash: &str) -> bool;

    /// Spend the same effort as [`PasswordHasher::verify`] against a decoy
    /// hash. Used when the account does not exist.
    async fn verify_decoy(&self, password: &str);
}
