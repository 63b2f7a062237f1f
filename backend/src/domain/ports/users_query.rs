//! Driving port for reading accounts.

use async_trait::async_trait;

use crate::domain::{Error, Principal, User, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Every account, oldest first. Admin only.
    async fn list(&self, requester: &Principal) -> Result<Vec<User>, Error>;

    /// One account, visible to itself and to admins.
    async fn get(&self, requester: &Principal, target: &UserId) -> Result<User, Error>;
}
