//! Sharing handlers: invitations, grants and revocation.
//!
//! ```text
//! POST   /api/children/{id}/invite      {"email":"a@b.c","permissionType":"VIEW"}
//! POST   /api/invite-user               {"email":"a@b.c","children":[{"childId":"...","permissionType":"EDIT"}]}
//! GET    /api/children/{id}/permissions
//! DELETE /api/permissions/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::ports::InviteRequest;
use crate::domain::{
    ChildId, EmailAddress, Error, InvitationGrant, InviteOutcome, PermissionId, PermissionType,
    PermissionWithGrantee,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::children::CHILD_ID;
use crate::inbound::http::session::CurrentUser;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, field_error, parse_id, parse_permission_type};

const PERMISSION_ID: FieldName = FieldName::new("id");
const PERMISSION_TYPE: FieldName = FieldName::new("permissionType");
const GRANT_CHILD_ID: FieldName = FieldName::new("childId");

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InviteRequestBody {
    #[schema(example = "grandma@example.com")]
    pub email: String,
    #[schema(example = "VIEW")]
    pub permission_type: String,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChildGrantBody {
    pub child_id: String,
    #[schema(example = "EDIT")]
    pub permission_type: String,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkInviteRequestBody {
    pub email: String,
    pub children: Vec<ChildGrantBody>,
}

/// Whether the invite became a grant or a pending invitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum InviteStatus {
    Granted,
    Invited,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InviteResponse {
    pub message: String,
    pub status: InviteStatus,
}

impl From<InviteOutcome> for InviteResponse {
    fn from(value: InviteOutcome) -> Self {
        let (message, status) = match value {
            InviteOutcome::Granted => ("Access granted successfully", InviteStatus::Granted),
            InviteOutcome::Invited => ("Invitation sent successfully", InviteStatus::Invited),
        };
        Self {
            message: message.to_owned(),
            status,
        }
    }
}

/// Grantee summary embedded in a permission listing.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GranteeResponse {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PermissionResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub child_id: Uuid,
    pub permission_type: PermissionType,
    pub created_at: DateTime<Utc>,
    pub user: GranteeResponse,
}

impl From<&PermissionWithGrantee> for PermissionResponse {
    fn from(value: &PermissionWithGrantee) -> Self {
        let permission = &value.permission;
        let grantee = &value.grantee;
        Self {
            id: *permission.id.as_uuid(),
            user_id: *permission.user_id.as_uuid(),
            child_id: *permission.child_id.as_uuid(),
            permission_type: permission.permission_type,
            created_at: permission.created_at,
            user: GranteeResponse {
                id: *grantee.id().as_uuid(),
                email: grantee.email().to_string(),
                first_name: grantee.first_name().to_string(),
                last_name: grantee.last_name().to_string(),
            },
        }
    }
}

fn parse_grant(child: &str, permission_type: &str) -> Result<InvitationGrant, Error> {
    Ok(InvitationGrant {
        child_id: parse_id(child, GRANT_CHILD_ID)?,
        permission_type: parse_permission_type(permission_type, PERMISSION_TYPE)?,
    })
}

async fn send_invite(
    state: &HttpState,
    user: &CurrentUser,
    email: &str,
    grants: Vec<InvitationGrant>,
) -> ApiResult<web::Json<InviteResponse>> {
    let email = EmailAddress::new(email).map_err(field_error)?;
    let outcome = state
        .sharing
        .invite(user.principal(), InviteRequest { email, grants })
        .await?;
    Ok(web::Json(InviteResponse::from(outcome)))
}

/// Share one child. Owner only.
#[utoipa::path(
    post,
    path = "/api/children/{id}/invite",
    params(("id" = String, Path, description = "Child id")),
    request_body = InviteRequestBody,
    responses(
        (status = 200, description = "Granted or invited", body = InviteResponse),
        (status = 400, description = "Invalid request or self-invite", body = Error),
        (status = 403, description = "Owner only", body = Error),
        (status = 404, description = "Child not found", body = Error)
    ),
    tags = ["sharing"],
    operation_id = "inviteToChild"
)]
#[post("/children/{id}/invite")]
pub async fn invite_to_child(
    state: web::Data<HttpState>,
    user: CurrentUser,
    path: web::Path<String>,
    payload: web::Json<InviteRequestBody>,
) -> ApiResult<web::Json<InviteResponse>> {
    let child: ChildId = parse_id(&path, CHILD_ID)?;
    let permission_type = parse_permission_type(&payload.permission_type, PERMISSION_TYPE)?;
    let grants = vec![InvitationGrant {
        child_id: child,
        permission_type,
    }];
    send_invite(&state, &user, &payload.email, grants).await
}

/// Share several children with one email address in a single invitation.
#[utoipa::path(
    post,
    path = "/api/invite-user",
    request_body = BulkInviteRequestBody,
    responses(
        (status = 200, description = "Granted or invited", body = InviteResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 403, description = "Owner only", body = Error),
        (status = 404, description = "Child not found", body = Error)
    ),
    tags = ["sharing"],
    operation_id = "inviteUser"
)]
#[post("/invite-user")]
pub async fn invite_user(
    state: web::Data<HttpState>,
    user: CurrentUser,
    payload: web::Json<BulkInviteRequestBody>,
) -> ApiResult<web::Json<InviteResponse>> {
    if payload.children.is_empty() {
        return Err(Error::invalid_request("children must not be empty").with_details(
            serde_json::json!({ "field": "children", "code": "empty_field" }),
        ));
    }
    let grants = payload
        .children
        .iter()
        .map(|grant| parse_grant(&grant.child_id, &grant.permission_type))
        .collect::<Result<Vec<_>, _>>()?;
    send_invite(&state, &user, &payload.email, grants).await
}

/// Grants on a child. Requires EDIT.
#[utoipa::path(
    get,
    path = "/api/children/{id}/permissions",
    params(("id" = String, Path, description = "Child id")),
    responses(
        (status = 200, description = "Grants", body = [PermissionResponse]),
        (status = 403, description = "EDIT access required", body = Error),
        (status = 404, description = "Child not found", body = Error)
    ),
    tags = ["sharing"],
    operation_id = "listChildPermissions"
)]
#[get("/children/{id}/permissions")]
pub async fn list_child_permissions(
    state: web::Data<HttpState>,
    user: CurrentUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<PermissionResponse>>> {
    let child: ChildId = parse_id(&path, CHILD_ID)?;
    let grants = state
        .permissions_query
        .list_for_child(user.principal(), &child)
        .await?;
    Ok(web::Json(grants.iter().map(PermissionResponse::from).collect()))
}

/// Revoke a permission on a child the caller owns.
#[utoipa::path(
    delete,
    path = "/api/permissions/{id}",
    params(("id" = String, Path, description = "Permission id")),
    responses(
        (status = 204, description = "Revoked"),
        (status = 403, description = "EDIT access required", body = Error),
        (status = 404, description = "Permission not found", body = Error)
    ),
    tags = ["sharing"],
    operation_id = "revokePermission"
)]
#[delete("/permissions/{id}")]
pub async fn revoke_permission(
    state: web::Data<HttpState>,
    user: CurrentUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let permission: PermissionId = parse_id(&path, PERMISSION_ID)?;
    state.sharing.revoke(user.principal(), &permission).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Permission;
    use crate::domain::test_fixtures::{fixed_now, principal, user};
    use crate::inbound::http::state::test_support::MockPorts;
    use crate::inbound::http::test_utils::call_as;
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(InviteOutcome::Granted, "granted", "Access granted successfully")]
    #[case(InviteOutcome::Invited, "invited", "Invitation sent successfully")]
    #[actix_web::test]
    async fn single_invite_reports_the_outcome(
        #[case] outcome: InviteOutcome,
        #[case] status_text: &str,
        #[case] message: &str,
    ) {
        let child = ChildId::random();
        let mut ports = MockPorts::authenticated_as(principal(false));
        ports
            .sharing
            .expect_invite()
            .withf(move |_, request| {
                request.email.as_ref() == "grandma@example.com"
                    && request.grants
                        == vec![InvitationGrant {
                            child_id: child,
                            permission_type: PermissionType::View,
                        }]
            })
            .times(1)
            .returning(move |_, _| Ok(outcome));
        let (status, body) = call_as(
            ports,
            actix_test::TestRequest::post()
                .uri(&format!("/api/children/{child}/invite"))
                .set_json(json!({"email": "Grandma@Example.com", "permissionType": "VIEW"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], status_text);
        assert_eq!(body["message"], message);
    }

    #[actix_web::test]
    async fn unknown_permission_types_are_rejected() {
        let (status, body) = call_as(
            MockPorts::authenticated_as(principal(false)),
            actix_test::TestRequest::post()
                .uri(&format!("/api/children/{}/invite", ChildId::random()))
                .set_json(json!({"email": "a@example.com", "permissionType": "OWNER"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"]["code"], "invalid_permission_type");
    }

    #[actix_web::test]
    async fn bulk_invite_forwards_every_grant() {
        let first = ChildId::random();
        let second = ChildId::random();
        let mut ports = MockPorts::authenticated_as(principal(false));
        ports
            .sharing
            .expect_invite()
            .withf(move |_, request| {
                request.grants.len() == 2
                    && request.grants[0].child_id == first
                    && request.grants[1].permission_type == PermissionType::Edit
            })
            .times(1)
            .returning(|_, _| Ok(InviteOutcome::Invited));
        let (status, body) = call_as(
            ports,
            actix_test::TestRequest::post()
                .uri("/api/invite-user")
                .set_json(json!({
                    "email": "aunt@example.com",
                    "children": [
                        {"childId": first.to_string(), "permissionType": "VIEW"},
                        {"childId": second.to_string(), "permissionType": "EDIT"}
                    ]
                })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "invited");
    }

    #[rstest]
    #[case(json!({"email": "aunt@example.com", "children": []}), "children")]
    #[case(json!({"email": "aunt@example.com", "children": [{"childId": "nope", "permissionType": "VIEW"}]}), "childId")]
    #[case(json!({"email": "not-an-email", "children": [{"childId": ChildId::random().to_string(), "permissionType": "VIEW"}]}), "email")]
    #[actix_web::test]
    async fn bulk_invite_validates_the_body(#[case] payload: serde_json::Value, #[case] field: &str) {
        let (status, body) = call_as(
            MockPorts::authenticated_as(principal(false)),
            actix_test::TestRequest::post()
                .uri("/api/invite-user")
                .set_json(payload),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"]["field"], field);
    }

    #[actix_web::test]
    async fn permissions_list_embeds_the_grantee() {
        let child = ChildId::random();
        let grantee = user("grandma@example.com", false);
        let grant = PermissionWithGrantee {
            permission: Permission {
                id: PermissionId::random(),
                user_id: *grantee.id(),
                child_id: child,
                permission_type: PermissionType::Edit,
                created_at: fixed_now(),
            },
            grantee,
        };
        let mut ports = MockPorts::authenticated_as(principal(false));
        ports
            .permissions_query
            .expect_list_for_child()
            .withf(move |_, requested| *requested == child)
            .returning(move |_, _| Ok(vec![grant.clone()]));
        let (status, body) = call_as(
            ports,
            actix_test::TestRequest::get().uri(&format!("/api/children/{child}/permissions")),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["permissionType"], "EDIT");
        assert_eq!(body[0]["childId"], child.to_string());
        assert_eq!(body[0]["user"]["email"], "grandma@example.com");
        assert_eq!(body[0]["user"]["firstName"], "Ada");
    }

    #[actix_web::test]
    async fn revoke_answers_no_content() {
        let mut ports = MockPorts::authenticated_as(principal(false));
        ports.sharing.expect_revoke().times(1).returning(|_, _| Ok(()));
        let (status, _) = call_as(
            ports,
            actix_test::TestRequest::delete()
                .uri(&format!("/api/permissions/{}", PermissionId::random())),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[actix_web::test]
    async fn revoke_without_edit_is_forbidden() {
        let mut ports = MockPorts::authenticated_as(principal(false));
        ports
            .sharing
            .expect_revoke()
            .returning(|_, _| Err(Error::forbidden("Access denied")));
        let (status, body) = call_as(
            ports,
            actix_test::TestRequest::delete()
                .uri(&format!("/api/permissions/{}", PermissionId::random())),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["code"], "forbidden");
    }
}
