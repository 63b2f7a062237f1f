//! Driving port for sharing children with other people.

use async_trait::async_trait;

use crate::domain::{EmailAddress, Error, InvitationGrant, InviteOutcome, PermissionId, Principal};

/// Invite one email address to one or more children.
#[derive(Debug, Clone)]
pub struct InviteRequest {
    pub email: EmailAddress,
    pub grants: Vec<InvitationGrant>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SharingCommand: Send + Sync {
    /// Grant access directly when the email has an account, otherwise store
    /// a pending invitation. The requester must own every child.
    async fn invite(
        &self,
        requester: &Principal,
        request: InviteRequest,
    ) -> Result<InviteOutcome, Error>;

    /// Remove a grant. Requires EDIT on the granted child.
    async fn revoke(&self, requester: &Principal, permission: &PermissionId)
    -> Result<(), Error>;
}
