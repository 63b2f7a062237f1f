//! Driving port for account administration.

use async_trait::async_trait;

use crate::domain::{EmailAddress, Error, PersonName, Principal, User, UserId};

/// Replacement profile for an account.
#[derive(Debug, Clone)]
pub struct UserUpdate {
    pub email: EmailAddress,
    pub first_name: PersonName,
    pub last_name: PersonName,
    /// `None` leaves the flag untouched; only admins may change it.
    pub is_admin: Option<bool>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersCommand: Send + Sync {
    /// Update `target`. Allowed for the account itself and for admins.
    async fn update(
        &self,
        requester: &Principal,
        target: &UserId,
        update: UserUpdate,
    ) -> Result<User, Error>;

    /// Delete `target`. Admin only; admins cannot delete themselves.
    async fn delete(&self, requester: &Principal, target: &UserId) -> Result<(), Error>;
}
