//! Child profile handlers.
//!
//! ```text
//! POST   /api/children                     {"name":"Mia","grade":"2nd"}
//! GET    /api/children
//! GET    /api/children/with-counts?year=2024&month=3
//! GET    /api/children/book-counts?year=2024&month=3
//! GET    /api/children/{id}
//! PUT    /api/children/{id}                {"name":"Mia","grade":"3rd"}
//! DELETE /api/children/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{ChildDraft, ChildId, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{BookCountResponse, ChildResponse, ChildWithCountResponse};
use crate::inbound::http::session::CurrentUser;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, field_error, parse_id, parse_period, parse_required_period,
};

pub(crate) const CHILD_ID: FieldName = FieldName::new("id");

/// Body of `POST /api/children` and `PUT /api/children/{id}`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChildRequest {
    #[schema(example = "Mia")]
    pub name: String,
    #[schema(example = "2nd")]
    pub grade: String,
}

impl TryFrom<&ChildRequest> for ChildDraft {
    type Error = Error;

    fn try_from(value: &ChildRequest) -> Result<Self, Self::Error> {
        ChildDraft::try_from_parts(&value.name, &value.grade).map_err(field_error)
    }
}

/// Optional calendar month for `GET /api/children/with-counts`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CountsQuery {
    /// Four-digit year; requires `month`.
    pub year: Option<i32>,
    /// Month 1-12; requires `year`.
    pub month: Option<u32>,
}

/// Create a child owned by the caller.
#[utoipa::path(
    post,
    path = "/api/children",
    request_body = ChildRequest,
    responses(
        (status = 201, description = "Child created", body = ChildResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["children"],
    operation_id = "createChild"
)]
#[post("/children")]
pub async fn create_child(
    state: web::Data<HttpState>,
    user: CurrentUser,
    payload: web::Json<ChildRequest>,
) -> ApiResult<HttpResponse> {
    let draft = ChildDraft::try_from(&payload.into_inner())?;
    let child = state.children.create(user.principal(), draft).await?;
    Ok(HttpResponse::Created().json(ChildResponse::from(&child)))
}

/// Children the caller owns or has been granted, ordered by name.
#[utoipa::path(
    get,
    path = "/api/children",
    responses(
        (status = 200, description = "Visible children", body = [ChildResponse]),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["children"],
    operation_id = "listChildren"
)]
#[get("/children")]
pub async fn list_children(
    state: web::Data<HttpState>,
    user: CurrentUser,
) -> ApiResult<web::Json<Vec<ChildResponse>>> {
    let children = state.children_query.list(user.principal()).await?;
    Ok(web::Json(children.into_iter().map(ChildResponse::from).collect()))
}

/// Visible children with book counts for a month, or all-time.
#[utoipa::path(
    get,
    path = "/api/children/with-counts",
    params(CountsQuery),
    responses(
        (status = 200, description = "Children with counts", body = [ChildWithCountResponse]),
        (status = 400, description = "Invalid year or month", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["children"],
    operation_id = "listChildrenWithCounts"
)]
#[get("/children/with-counts")]
pub async fn list_children_with_counts(
    state: web::Data<HttpState>,
    user: CurrentUser,
    query: web::Query<CountsQuery>,
) -> ApiResult<web::Json<Vec<ChildWithCountResponse>>> {
    let CountsQuery { year, month } = query.into_inner();
    let period = parse_period(year, month)?;
    let counts = state
        .children_query
        .list_with_counts(user.principal(), period)
        .await?;
    Ok(web::Json(
        counts.into_iter().map(ChildWithCountResponse::from).collect(),
    ))
}

/// Per-child book counts for one month, used when switching months.
#[utoipa::path(
    get,
    path = "/api/children/book-counts",
    params(CountsQuery),
    responses(
        (status = 200, description = "Counts per visible child", body = [BookCountResponse]),
        (status = 400, description = "Missing or invalid year or month", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["children"],
    operation_id = "childBookCounts"
)]
#[get("/children/book-counts")]
pub async fn book_counts(
    state: web::Data<HttpState>,
    user: CurrentUser,
    query: web::Query<CountsQuery>,
) -> ApiResult<web::Json<Vec<BookCountResponse>>> {
    let CountsQuery { year, month } = query.into_inner();
    let period = parse_required_period(year, month)?;
    let counts = state
        .children_query
        .list_with_counts(user.principal(), Some(period))
        .await?;
    Ok(web::Json(counts.iter().map(BookCountResponse::from).collect()))
}

/// Fetch a single child.
#[utoipa::path(
    get,
    path = "/api/children/{id}",
    params(("id" = String, Path, description = "Child id")),
    responses(
        (status = 200, description = "Child", body = ChildResponse),
        (status = 403, description = "No access", body = Error),
        (status = 404, description = "Child not found", body = Error)
    ),
    tags = ["children"],
    operation_id = "getChild"
)]
#[get("/children/{id}")]
pub async fn get_child(
    state: web::Data<HttpState>,
    user: CurrentUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<ChildResponse>> {
    let child: ChildId = parse_id(&path, CHILD_ID)?;
    let visible = state.children_query.get(user.principal(), &child).await?;
    Ok(web::Json(ChildResponse::from(visible)))
}

/// Rename or regrade a child. Requires EDIT.
#[utoipa::path(
    put,
    path = "/api/children/{id}",
    params(("id" = String, Path, description = "Child id")),
    request_body = ChildRequest,
    responses(
        (status = 200, description = "Updated child", body = ChildResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 403, description = "EDIT access required", body = Error),
        (status = 404, description = "Child not found", body = Error)
    ),
    tags = ["children"],
    operation_id = "updateChild"
)]
#[put("/children/{id}")]
pub async fn update_child(
    state: web::Data<HttpState>,
    user: CurrentUser,
    path: web::Path<String>,
    payload: web::Json<ChildRequest>,
) -> ApiResult<web::Json<ChildResponse>> {
    let child: ChildId = parse_id(&path, CHILD_ID)?;
    let draft = ChildDraft::try_from(&payload.into_inner())?;
    let updated = state.children.update(user.principal(), &child, draft).await?;
    Ok(web::Json(ChildResponse::from(&updated)))
}

/// Delete a child with its books and grants. Owner only.
#[utoipa::path(
    delete,
    path = "/api/children/{id}",
    params(("id" = String, Path, description = "Child id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 403, description = "Owner only", body = Error),
        (status = 404, description = "Child not found", body = Error)
    ),
    tags = ["children"],
    operation_id = "deleteChild"
)]
#[delete("/children/{id}")]
pub async fn delete_child(
    state: web::Data<HttpState>,
    user: CurrentUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let child: ChildId = parse_id(&path, CHILD_ID)?;
    state.children.delete(user.principal(), &child).await?;
    Ok(HttpResponse::NoContent().finish())
}
