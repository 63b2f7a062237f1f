//! Port for child profile persistence.

use async_trait::async_trait;

use crate::domain::{Child, ChildId, PermissionType, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by child repository adapters.
    pub enum ChildRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "child repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "child repository query failed: {message}",
    }
}

/// A child reachable by a user, with the user's grant when not the owner.
pub type ChildWithGrant = (Child, Option<PermissionType>);

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChildRepository: Send + Sync {
    async fn create(&self, child: &Child) -> Result<(), ChildRepositoryError>;

    async fn find_by_id(&self, id: &ChildId) -> Result<Option<Child>, ChildRepositoryError>;

    /// Persist name, grade and `updated_at`.
    async fn update(&self, child: &Child) -> Result<(), ChildRepositoryError>;

    /// Delete a child; books, permissions and invitations cascade.
    async fn delete(&self, id: &ChildId) -> Result<bool, ChildRepositoryError>;

    /// Children owned by `user` (grant `None`) or shared with them (grant
    /// `Some`), ordered by name.
    async fn list_visible(&self, user: &UserId)
    -> Result<Vec<ChildWithGrant>, ChildRepositoryError>;
}
