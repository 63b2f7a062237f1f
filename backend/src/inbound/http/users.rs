//! Account handlers.
//!
//! ```text
//! GET    /api/users/me
//! GET    /api/users            (admin)
//! GET    /api/users/{id}       (self or admin)
//! PUT    /api/users/{id}       (self or admin)
//! DELETE /api/users/{id}       (admin, never self)
//! ```

use actix_web::{HttpResponse, delete, get, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::UserUpdate;
use crate::domain::{EmailAddress, Error, PersonName, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::UserResponse;
use crate::inbound::http::session::CurrentUser;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, field_error, parse_id};

const USER_ID: FieldName = FieldName::new("id");

/// Body of `PUT /api/users/{id}`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// Only admins may change this flag.
    #[serde(default)]
    pub is_admin: Option<bool>,
}

impl TryFrom<UpdateUserRequest> for UserUpdate {
    type Error = Error;

    fn try_from(value: UpdateUserRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            email: EmailAddress::new(&value.email).map_err(field_error)?,
            first_name: PersonName::first(&value.first_name).map_err(field_error)?,
            last_name: PersonName::last(&value.last_name).map_err(field_error)?,
            is_admin: value.is_admin,
        })
    }
}

/// The authenticated account.
#[utoipa::path(
    get,
    path = "/api/users/me",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["users"],
    operation_id = "currentUser"
)]
#[get("/users/me")]
pub async fn current_user(user: CurrentUser) -> web::Json<UserResponse> {
    web::Json(UserResponse::from(user.principal().user()))
}

/// Every account, oldest first.
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "Users", body = [UserResponse]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Admin only", body = Error)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    user: CurrentUser,
) -> ApiResult<web::Json<Vec<UserResponse>>> {
    let users = state.users_query.list(user.principal()).await?;
    Ok(web::Json(users.iter().map(UserResponse::from).collect()))
}

/// Fetch a user by id. Admin only.
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 400, description = "Invalid id", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    user: CurrentUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserResponse>> {
    let target: UserId = parse_id(&path, USER_ID)?;
    let found = state.users_query.get(user.principal(), &target).await?;
    Ok(web::Json(UserResponse::from(&found)))
}

/// Replace an account's profile.
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 400, description = "Invalid request or email taken", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    user: CurrentUser,
    path: web::Path<String>,
    payload: web::Json<UpdateUserRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    let target: UserId = parse_id(&path, USER_ID)?;
    let update = UserUpdate::try_from(payload.into_inner())?;
    let updated = state.users.update(user.principal(), &target, update).await?;
    Ok(web::Json(UserResponse::from(&updated)))
}

/// Delete a user. Admin only.
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 400, description = "Admins cannot delete themselves", body = Error),
        (status = 403, description = "Admin only", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    user: CurrentUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let target: UserId = parse_id(&path, USER_ID)?;
    state.users.delete(user.principal(), &target).await?;
    Ok(HttpResponse::NoContent().finish())
}
