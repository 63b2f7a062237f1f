//! Port for sharing grants.

use async_trait::async_trait;

use crate::domain::{ChildId, Permission, PermissionId, PermissionType, PermissionWithGrantee, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by permission repository adapters.
    pub enum PermissionRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "permission repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "permission repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PermissionRepository: Send + Sync {
    /// Grant held by `user` on `child`, if any.
    async fn find_grant(
        &self,
        user: &UserId,
        child: &ChildId,
    ) -> Result<Option<PermissionType>, PermissionRepositoryError>;

    /// Insert a grant, or change the level of the existing grant for the same
    /// user and child. Returns the stored row.
    async fn upsert(&self, permission: &Permission)
    -> Result<Permission, PermissionRepositoryError>;

    async fn find_by_id(
        &self,
        id: &PermissionId,
    ) -> Result<Option<Permission>, PermissionRepositoryError>;

    /// Grants on `child` with the grantee accounts, oldest first.
    async fn list_for_child(
        &self,
        child: &ChildId,
    ) -> Result<Vec<PermissionWithGrantee>, PermissionRepositoryError>;

    async fn delete(&self, id: &PermissionId) -> Result<bool, PermissionRepositoryError>;
}
