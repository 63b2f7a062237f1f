//! Registration, login and invitation redemption handlers.
//!
//! ```text
//! POST /api/auth/register {"email":"a@x.com","password":"secret1","firstName":"A","lastName":"B"}
//! POST /api/auth/login {"email":"a@x.com","password":"secret1"}
//! GET  /api/auth/invitation-details?token=<64 hex chars>
//! POST /api/auth/register-with-invitation {..., "invitationToken":"<64 hex chars>"}
//! ```
//!
//! These routes are public; everything else under `/api` needs a bearer token.

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{
    Error, InvitationDetails, InvitationToken, LoginCredentials, LoginSuccess, PermissionType,
    Registration,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::UserResponse;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{field_error, login_error};

/// Body of `POST /api/auth/register`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[schema(example = "parent@example.com")]
    pub email: String,
    #[schema(example = "secret1")]
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

impl TryFrom<&RegisterRequest> for Registration {
    type Error = Error;

    fn try_from(value: &RegisterRequest) -> Result<Self, Self::Error> {
        Registration::try_from_parts(
            &value.email,
            &value.password,
            &value.first_name,
            &value.last_name,
        )
        .map_err(field_error)
    }
}

/// Body of `POST /api/auth/login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful login: a bearer token valid for 24 hours and the account.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user: UserResponse,
}

impl From<LoginSuccess> for LoginResponse {
    fn from(value: LoginSuccess) -> Self {
        Self {
            token: value.token.as_str().to_owned(),
            user: UserResponse::from(&value.user),
        }
    }
}

/// Query of `GET /api/auth/invitation-details`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct InvitationQuery {
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvitedChildResponse {
    pub child_id: Uuid,
    pub child_name: String,
    pub permission_type: PermissionType,
}

/// What an invitee sees before registering.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvitationDetailsResponse {
    pub email: String,
    #[schema(example = "Ada Lovelace")]
    pub inviter_name: String,
    pub children: Vec<InvitedChildResponse>,
}

impl From<InvitationDetails> for InvitationDetailsResponse {
    fn from(value: InvitationDetails) -> Self {
        Self {
            email: value.email.to_string(),
            inviter_name: value.inviter_name,
            children: value
                .children
                .into_iter()
                .map(|child| InvitedChildResponse {
                    child_id: *child.child_id.as_uuid(),
                    child_name: child.child_name,
                    permission_type: child.permission_type,
                })
                .collect(),
        }
    }
}

/// Body of `POST /api/auth/register-with-invitation`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterWithInvitationRequest {
    #[serde(flatten)]
    pub registration: RegisterRequest,
    pub invitation_token: String,
}

fn invitation_token(raw: &str) -> Result<InvitationToken, Error> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(Error::invalid_request("Invitation token is required")
            .with_details(serde_json::json!({ "field": "token", "code": "empty_field" })));
    }
    Ok(InvitationToken::from_raw(raw))
}

/// Create an account. The first account ever registered is an admin.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Invalid request or email taken", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let registration = Registration::try_from(&payload.into_inner())?;
    let user = state.auth.register(registration).await?;
    Ok(HttpResponse::Created().json(UserResponse::from(&user)))
}

/// Exchange credentials for a bearer token.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = LoginResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<LoginResponse>> {
    let LoginRequest { email, password } = payload.into_inner();
    let credentials = LoginCredentials::try_from_parts(&email, &password).map_err(login_error)?;
    let success = state.auth.login(credentials).await?;
    Ok(web::Json(LoginResponse::from(success)))
}

/// Describe a pending invitation.
#[utoipa::path(
    get,
    path = "/api/auth/invitation-details",
    params(("token" = String, Query, description = "Invitation token from the registration link")),
    responses(
        (status = 200, description = "Invitation details", body = InvitationDetailsResponse),
        (status = 400, description = "Missing token", body = Error),
        (status = 404, description = "Invalid or expired invitation", body = Error)
    ),
    tags = ["auth"],
    operation_id = "invitationDetails",
    security([])
)]
#[get("/auth/invitation-details")]
pub async fn invitation_details(
    state: web::Data<HttpState>,
    query: web::Query<InvitationQuery>,
) -> ApiResult<web::Json<InvitationDetailsResponse>> {
    let token = invitation_token(&query.token)?;
    let details = state.auth.invitation_details(&token).await?;
    Ok(web::Json(details.into()))
}

/// Register the invitee and grant the invited children in one step.
#[utoipa::path(
    post,
    path = "/api/auth/register-with-invitation",
    request_body = RegisterWithInvitationRequest,
    responses(
        (status = 201, description = "Account created with access", body = UserResponse),
        (status = 400, description = "Invalid request or email mismatch", body = Error),
        (status = 404, description = "Invalid or expired invitation", body = Error)
    ),
    tags = ["auth"],
    operation_id = "registerWithInvitation",
    security([])
)]
#[post("/auth/register-with-invitation")]
pub async fn register_with_invitation(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterWithInvitationRequest>,
) -> ApiResult<HttpResponse> {
    let request = payload.into_inner();
    let registration = Registration::try_from(&request.registration)?;
    let token = invitation_token(&request.invitation_token)?;
    let user = state
        .auth
        .register_with_invitation(registration, &token)
        .await?;
    Ok(HttpResponse::Created().json(UserResponse::from(&user)))
}
