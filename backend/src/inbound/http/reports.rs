//! Reading report handler.

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Error;
use crate::domain::ports::{ChildReport, ReadingReport};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{BookResponse, ChildResponse};
use crate::inbound::http::session::CurrentUser;
use crate::inbound::http::state::HttpState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChildReportResponse {
    pub child: ChildResponse,
    pub books: Vec<BookResponse>,
    pub total_books: usize,
}

impl From<ChildReport> for ChildReportResponse {
    fn from(value: ChildReport) -> Self {
        let books: Vec<BookResponse> = value.books.iter().map(BookResponse::from).collect();
        Self {
            child: ChildResponse::from(value.child),
            total_books: books.len(),
            books,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReadingReportResponse {
    pub children: Vec<ChildReportResponse>,
}

impl From<ReadingReport> for ReadingReportResponse {
    fn from(value: ReadingReport) -> Self {
        Self {
            children: value.children.into_iter().map(Into::into).collect(),
        }
    }
}

/// Every visible child with the books they have read.
#[utoipa::path(
    get,
    path = "/api/reports/my-books",
    responses(
        (status = 200, description = "Reading report", body = ReadingReportResponse),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["reports"],
    operation_id = "myBooksReport"
)]
#[get("/reports/my-books")]
pub async fn my_books(
    state: web::Data<HttpState>,
    user: CurrentUser,
) -> ApiResult<web::Json<ReadingReportResponse>> {
    let report = state.reports.my_books(user.principal()).await?;
    Ok(web::Json(report.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_fixtures::{book_for, child_owned_by, principal};
    use crate::domain::{PermissionType, VisibleChild};
    use crate::inbound::http::state::test_support::MockPorts;
    use crate::inbound::http::test_utils::call_as;
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;

    #[actix_web::test]
    async fn report_counts_books_per_child() {
        let caller = principal(false);
        let child = child_owned_by(caller.id());
        let child_id = *child.id();
        let report = ReadingReport {
            children: vec![ChildReport {
                child: VisibleChild {
                    child,
                    is_owner: true,
                    permission: PermissionType::Edit,
                },
                books: vec![
                    book_for(&child_id, "Matilda", "2024-03-14"),
                    book_for(&child_id, "Holes", "2024-02-01"),
                ],
            }],
        };
        let mut ports = MockPorts::authenticated_as(caller);
        ports
            .reports
            .expect_my_books()
            .times(1)
            .returning(move |_| Ok(report.clone()));
        let (status, body) =
            call_as(ports, actix_test::TestRequest::get().uri("/api/reports/my-books")).await;
        assert_eq!(status, StatusCode::OK);
        let entry = &body["children"][0];
        assert_eq!(entry["totalBooks"], 2);
        assert_eq!(entry["child"]["name"], "Mia");
        assert_eq!(entry["child"]["isOwner"], true);
        assert_eq!(entry["books"][1]["title"], "Holes");
    }

    #[actix_web::test]
    async fn empty_report_has_no_children() {
        let mut ports = MockPorts::authenticated_as(principal(false));
        ports
            .reports
            .expect_my_books()
            .returning(|_| Ok(ReadingReport::default()));
        let (status, body) =
            call_as(ports, actix_test::TestRequest::get().uri("/api/reports/my-books")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({ "children": [] }));
    }
}
