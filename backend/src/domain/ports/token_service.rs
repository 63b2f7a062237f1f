//! Port for signed session tokens.

use crate::domain::{AccessToken, UserId};

use super::define_port_error;

define_port_error! {
    /// Token failures. Verification collapses every cause into `Invalid`.
    pub enum TokenError {
        /// Signature, format, algorithm, expiry or subject check failed.
        Invalid => "token is invalid or expired",
        /// The token could not be encoded.
        Issue { message: String } => "token could not be issued: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait TokenService: Send + Sync {
    /// Issue a token whose subject is `user`.
    fn issue(&self, user: &UserId) -> Result<AccessToken, TokenError>;

    /// Verify `token` and return its subject.
    fn verify(&self, token: &str) -> Result<UserId, TokenError>;
}
