//! Access checks on children, shared by every service touching a child.
//!
//! Access is recomputed from storage on each call so a revoked grant stops
//! working on the very next request.

use std::sync::Arc;

use super::ports::{ChildRepository, PermissionRepository};
use super::{AccessRequirement, ChildAccess, ChildId, Error, Principal, VisibleChild};

pub(crate) const CHILD_NOT_FOUND: &str = "Child not found";
pub(crate) const ACCESS_DENIED: &str = "Access denied";

/// Resolves the requester's access to a child.
pub struct ChildAccessPolicy<C, P> {
    children: Arc<C>,
    permissions: Arc<P>,
}

impl<C, P> Clone for ChildAccessPolicy<C, P> {
    fn clone(&self) -> Self {
        Self {
            children: Arc::clone(&self.children),
            permissions: Arc::clone(&self.permissions),
        }
    }
}

impl<C, P> ChildAccessPolicy<C, P> {
    /// Create a policy backed by the child and permission repositories.
    pub fn new(children: Arc<C>, permissions: Arc<P>) -> Self {
        Self {
            children,
            permissions,
        }
    }
}

impl<C, P> ChildAccessPolicy<C, P>
where
    C: ChildRepository,
    P: PermissionRepository,
{
    /// Load `child` and check the requester meets `requirement`.
    ///
    /// Unknown children yield `not_found`; insufficient access `forbidden`.
    pub async fn require(
        &self,
        requester: &Principal,
        child: &ChildId,
        requirement: AccessRequirement,
    ) -> Result<VisibleChild, Error> {
        let found = self
            .children
            .find_by_id(child)
            .await?
            .ok_or_else(|| Error::not_found(CHILD_NOT_FOUND))?;
        let grant = if found.owner_id() == requester.id() {
            None
        } else {
            self.permissions.find_grant(requester.id(), child).await?
        };
        let access = ChildAccess::resolve(found.owner_id(), requester.id(), grant);
        match access.effective() {
            Some(permission) if access.allows(requirement) => Ok(VisibleChild {
                is_owner: access == ChildAccess::Owner,
                permission,
                child: found,
            }),
            _ => {
                tracing::debug!(
                    user_id = %requester.id(),
                    child_id = %child,
                    ?requirement,
                    "child access denied"
                );
                Err(Error::forbidden(ACCESS_DENIED))
            }
        }
    }
}
