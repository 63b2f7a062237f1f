//! Driving port for listing the grants on a child.

use async_trait::async_trait;

use crate::domain::{ChildId, Error, PermissionWithGrantee, Principal};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PermissionsQuery: Send + Sync {
    /// Grants on `child` with grantee details. Requires EDIT.
    async fn list_for_child(
        &self,
        requester: &Principal,
        child: &ChildId,
    ) -> Result<Vec<PermissionWithGrantee>, Error>;
}
