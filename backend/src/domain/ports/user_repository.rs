//! Port abstraction for user account persistence.
use async_trait::async_trait;

use crate::domain::{EmailAddress, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another account already uses the email address.
        DuplicateEmail { email: String } => "email {email} is already registered",
    }
}

/// A user together with the stored password hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredentials {
    pub user: User,
    pub password_hash: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account. Fails with `DuplicateEmail` when the email is taken.
    async fn create(&self, user: &User, password_hash: &str) -> Result<(), UserRepositoryError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError>;

    /// Fetch a user by normalised email.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserRepositoryError>;

    /// Fetch the account and hash used to check a login attempt.
    ///
    /// `email` is matched verbatim; callers lower-case it first.
    async fn find_credentials(
        &self,
        email: &str,
    ) -> Result<Option<StoredCredentials>, UserRepositoryError>;

    /// All users ordered by creation time.
    async fn list(&self) -> Result<Vec<User>, UserRepositoryError>;

    /// Persist profile changes (email, names, admin flag, `updated_at`).
    async fn update_profile(&self, user: &User) -> Result<(), UserRepositoryError>;

    /// Delete an account and everything it owns. Returns `false` when absent.
    async fn delete(&self, id: &UserId) -> Result<bool, UserRepositoryError>;

    /// Number of registered accounts.
    async fn count(&self) -> Result<u64, UserRepositoryError>;
}
