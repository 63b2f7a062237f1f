//! Sharing children with other people.
//!
//! Existing accounts receive a grant straight away. Unknown addresses get a
//! pending invitation, redeemed when the invitee registers with its token.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};

use crate::domain::ports::{
    ChildRepository, InvitationNotifier, InvitationRepository, InviteRequest,
    PermissionRepository, PermissionsQuery, SharingCommand, UserRepository,
};
use crate::domain::{
    AccessRequirement, ChildAccessPolicy, ChildId, Error, InvitationToken, InviteOutcome,
    PendingInvitation, Permission, PermissionId, PermissionWithGrantee, Principal,
};

pub(crate) const PERMISSION_NOT_FOUND: &str = "Permission not found";
pub(crate) const SELF_INVITE: &str = "You cannot invite yourself";
pub(crate) const NO_CHILDREN: &str = "At least one child must be selected";

/// Service implementing [`SharingCommand`] and [`PermissionsQuery`].
pub struct SharingService<U, C, P, I, N> {
    users: Arc<U>,
    permissions: Arc<P>,
    invitations: Arc<I>,
    notifier: Arc<N>,
    access: ChildAccessPolicy<C, P>,
    clock: Arc<dyn Clock>,
}

impl<U, C, P, I, N> SharingService<U, C, P, I, N> {
    /// Create a new service with the given repositories and collaborators.
    pub fn new(
        users: Arc<U>,
        children: Arc<C>,
        permissions: Arc<P>,
        invitations: Arc<I>,
        notifier: Arc<N>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            access: ChildAccessPolicy::new(children, Arc::clone(&permissions)),
            users,
            permissions,
            invitations,
            notifier,
            clock,
        }
    }
}

impl<U, C, P, I, N> SharingService<U, C, P, I, N>
where
    U: UserRepository,
    C: ChildRepository,
    P: PermissionRepository,
    I: InvitationRepository,
    N: InvitationNotifier,
{
    async fn invite_new_address(
        &self,
        requester: &Principal,
        request: &InviteRequest,
    ) -> Result<(), Error> {
        let token = InvitationToken::generate();
        let now = self.clock.utc();
        let rows: Vec<PendingInvitation> = request
            .grants
            .iter()
            .map(|grant| {
                PendingInvitation::issue(request.email.clone(), *grant, *requester.id(), &token, now)
            })
            .collect();
        self.invitations.replace_pending(&rows).await?;
        info!(
            invited_by = %requester.id(),
            children = rows.len(),
            "pending invitation stored"
        );
        // The stored invitation stays redeemable even if delivery fails.
        if let Err(error) = self
            .notifier
            .invitation_created(&request.email, requester.user(), &token)
            .await
        {
            warn!(%error, invited_by = %requester.id(), "invitation notification failed");
        }
        Ok(())
    }
}

#[async_trait]
impl<U, C, P, I, N> SharingCommand for SharingService<U, C, P, I, N>
where
    U: UserRepository,
    C: ChildRepository,
    P: PermissionRepository,
    I: InvitationRepository,
    N: InvitationNotifier,
{
    async fn invite(
        &self,
        requester: &Principal,
        request: InviteRequest,
    ) -> Result<InviteOutcome, Error> {
        if request.grants.is_empty() {
            return Err(Error::invalid_request(NO_CHILDREN));
        }
        if &request.email == requester.user().email() {
            return Err(Error::invalid_request(SELF_INVITE));
        }
        for grant in &request.grants {
            self.access
                .require(requester, &grant.child_id, AccessRequirement::Owner)
                .await?;
        }

        let Some(grantee) = self.users.find_by_email(&request.email).await? else {
            self.invite_new_address(requester, &request).await?;
            return Ok(InviteOutcome::Invited);
        };

        let now = self.clock.utc();
        for grant in &request.grants {
            let stored = self
                .permissions
                .upsert(&Permission {
                    id: PermissionId::random(),
                    user_id: *grantee.id(),
                    child_id: grant.child_id,
                    permission_type: grant.permission_type,
                    created_at: now,
                })
                .await?;
            info!(
                permission_id = %stored.id,
                grantee = %grantee.id(),
                child_id = %stored.child_id,
                permission_type = %stored.permission_type,
                "access granted"
            );
        }
        Ok(InviteOutcome::Granted)
    }

    async fn revoke(&self, requester: &Principal, permission: &PermissionId) -> Result<(), Error> {
        let existing = self
            .permissions
            .find_by_id(permission)
            .await?
            .ok_or_else(|| Error::not_found(PERMISSION_NOT_FOUND))?;
        self.access
            .require(requester, &existing.child_id, AccessRequirement::Edit)
            .await?;
        if !self.permissions.delete(permission).await? {
            return Err(Error::not_found(PERMISSION_NOT_FOUND));
        }
        info!(permission_id = %permission, revoked_by = %requester.id(), "access revoked");
        Ok(())
    }
}

#[async_trait]
impl<U, C, P, I, N> PermissionsQuery for SharingService<U, C, P, I, N>
where
    U: UserRepository,
    C: ChildRepository,
    P: PermissionRepository,
    I: InvitationRepository,
    N: InvitationNotifier,
{
    async fn list_for_child(
        &self,
        requester: &Principal,
        child: &ChildId,
    ) -> Result<Vec<PermissionWithGrantee>, Error> {
        self.access
            .require(requester, child, AccessRequirement::Edit)
            .await?;
        Ok(self.permissions.list_for_child(child).await?)
    }
}

#[cfg(test)]
#[path = "sharing_service_tests.rs"]
mod tests;
