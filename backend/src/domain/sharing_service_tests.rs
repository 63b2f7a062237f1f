//! Tests for invitations, grants and revocation.

use std::sync::Arc;

use super::*;
use crate::domain::ports::{
    MockChildRepository, MockInvitationNotifier, MockInvitationRepository,
    MockPermissionRepository, MockUserRepository, NotifierError,
};
use crate::domain::test_fixtures::{FixtureClock, child_owned_by, fixed_now, principal, user};
use crate::domain::{Child, EmailAddress, ErrorCode, InvitationGrant, PermissionType};

#[derive(Default)]
struct Mocks {
    users: MockUserRepository,
    children: MockChildRepository,
    permissions: MockPermissionRepository,
    invitations: MockInvitationRepository,
    notifier: MockInvitationNotifier,
}

type TestService = SharingService<
    MockUserRepository,
    MockChildRepository,
    MockPermissionRepository,
    MockInvitationRepository,
    MockInvitationNotifier,
>;

impl Mocks {
    fn owning(child: Child) -> Self {
        let mut mocks = Self::default();
        mocks
            .children
            .expect_find_by_id()
            .returning(move |_| Ok(Some(child.clone())));
        mocks
    }

    fn build(self) -> TestService {
        SharingService::new(
            Arc::new(self.users),
            Arc::new(self.children),
            Arc::new(self.permissions),
            Arc::new(self.invitations),
            Arc::new(self.notifier),
            Arc::new(FixtureClock(fixed_now())),
        )
    }
}

fn request(email: &str, child: &Child, permission_type: PermissionType) -> InviteRequest {
    InviteRequest {
        email: EmailAddress::new(email).expect("email"),
        grants: vec![InvitationGrant {
            child_id: *child.id(),
            permission_type,
        }],
    }
}

#[tokio::test]
async fn existing_account_receives_grant() {
    let owner = principal(false);
    let child = child_owned_by(owner.id());
    let grantee = user("friend@x.com", false);
    let grantee_id = *grantee.id();
    let mut mocks = Mocks::owning(child.clone());
    mocks
        .users
        .expect_find_by_email()
        .return_once(move |_| Ok(Some(grantee)));
    mocks
        .permissions
        .expect_upsert()
        .withf(move |permission| {
            permission.user_id == grantee_id && permission.permission_type == PermissionType::Edit
        })
        .times(1)
        .returning(|permission| Ok(permission.clone()));
    mocks.invitations.expect_replace_pending().never();

    let outcome = mocks
        .build()
        .invite(&owner, request("friend@x.com", &child, PermissionType::Edit))
        .await
        .expect("granted");
    assert_eq!(outcome, InviteOutcome::Granted);
}

#[tokio::test]
async fn unknown_address_gets_pending_invitation() {
    let owner = principal(false);
    let child = child_owned_by(owner.id());
    let mut mocks = Mocks::owning(child.clone());
    mocks.users.expect_find_by_email().return_once(|_| Ok(None));
    mocks
        .invitations
        .expect_replace_pending()
        .withf(|rows| rows.len() == 1 && rows[0].email.as_ref() == "new@x.com")
        .times(1)
        .return_once(|_| Ok(()));
    mocks
        .notifier
        .expect_invitation_created()
        .times(1)
        .return_once(|_, _, _| Ok(()));

    let outcome = mocks
        .build()
        .invite(&owner, request("new@x.com", &child, PermissionType::View))
        .await
        .expect("invited");
    assert_eq!(outcome, InviteOutcome::Invited);
}

#[tokio::test]
async fn failed_delivery_still_reports_invited() {
    let owner = principal(false);
    let child = child_owned_by(owner.id());
    let mut mocks = Mocks::owning(child.clone());
    mocks.users.expect_find_by_email().return_once(|_| Ok(None));
    mocks
        .invitations
        .expect_replace_pending()
        .return_once(|_| Ok(()));
    mocks
        .notifier
        .expect_invitation_created()
        .return_once(|_, _, _| Err(NotifierError::delivery("smtp down")));

    let outcome = mocks
        .build()
        .invite(&owner, request("new@x.com", &child, PermissionType::View))
        .await
        .expect("invited");
    assert_eq!(outcome, InviteOutcome::Invited);
}

#[tokio::test]
async fn inviting_yourself_is_rejected() {
    let owner = principal(false);
    let child = child_owned_by(owner.id());
    let email = owner.user().email().to_string();
    let mocks = Mocks::default();

    let error = mocks
        .build()
        .invite(&owner, request(&email, &child, PermissionType::View))
        .await
        .expect_err("self invite");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(error.message(), SELF_INVITE);
}

#[tokio::test]
async fn only_owner_may_invite() {
    let owner = principal(false);
    let editor = principal(false);
    let child = child_owned_by(owner.id());
    let mut mocks = Mocks::owning(child.clone());
    mocks
        .permissions
        .expect_find_grant()
        .return_once(|_, _| Ok(Some(PermissionType::Edit)));
    mocks.users.expect_find_by_email().never();

    let error = mocks
        .build()
        .invite(&editor, request("new@x.com", &child, PermissionType::View))
        .await
        .expect_err("editor is not owner");
    assert_eq!(error.code(), ErrorCode::Forbidden);
}

#[tokio::test]
async fn revoke_requires_edit_on_child() {
    let owner = principal(false);
    let viewer = principal(false);
    let child = child_owned_by(owner.id());
    let permission = Permission {
        id: PermissionId::random(),
        user_id: *viewer.id(),
        child_id: *child.id(),
        permission_type: PermissionType::View,
        created_at: fixed_now(),
    };
    let permission_id = permission.id;
    let mut mocks = Mocks::owning(child);
    mocks
        .permissions
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(permission)));
    mocks
        .permissions
        .expect_find_grant()
        .return_once(|_, _| Ok(Some(PermissionType::View)));
    mocks.permissions.expect_delete().never();

    let error = mocks
        .build()
        .revoke(&viewer, &permission_id)
        .await
        .expect_err("viewer cannot revoke");
    assert_eq!(error.code(), ErrorCode::Forbidden);
}

#[tokio::test]
async fn unknown_permission_is_not_found() {
    let mut mocks = Mocks::default();
    mocks.permissions.expect_find_by_id().return_once(|_| Ok(None));

    let error = mocks
        .build()
        .revoke(&principal(false), &PermissionId::random())
        .await
        .expect_err("missing");
    assert_eq!(error.code(), ErrorCode::NotFound);
}
