//! Test-only maintenance routes, mounted when `enable_test_routes` is set.

use actix_web::{delete, web};

use crate::domain::Error;
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::MessageResponse;
use crate::inbound::http::state::HttpState;

/// Delete every row in the store. Unauthenticated; never mount in production.
#[utoipa::path(
    delete,
    path = "/api/test/reset-db",
    responses(
        (status = 200, description = "Store wiped", body = MessageResponse),
        (status = 503, description = "Database unavailable", body = Error)
    ),
    tags = ["maintenance"],
    security([]),
    operation_id = "resetDatabase"
)]
#[delete("/test/reset-db")]
pub async fn reset_database(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<MessageResponse>> {
    state.maintenance.reset_database().await?;
    Ok(web::Json(MessageResponse::new("Database reset successfully")))
}
