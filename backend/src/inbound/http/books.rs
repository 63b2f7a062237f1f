//! Book log handlers.
//!
//! ```text
//! POST   /api/books                 {"title":"Matilda","author":"Roald Dahl","dateRead":"2024-03-14","childId":"..."}
//! GET    /api/books?childId=...
//! GET    /api/books/child/{childId}
//! POST   /api/books/child/{childId}
//! GET    /api/books/{id}
//! PUT    /api/books/{id}
//! DELETE /api/books/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{BookDraft, BookFields, BookId, ChildId, Error, Principal};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::BookResponse;
use crate::inbound::http::session::CurrentUser;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, field_error, parse_id};

const BOOK_ID: FieldName = FieldName::new("id");
const CHILD_ID: FieldName = FieldName::new("childId");

/// Book content. `childId` is required on `POST /api/books` and ignored
/// elsewhere; books never move between children.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookRequest {
    #[schema(example = "Matilda")]
    pub title: String,
    #[schema(example = "Roald Dahl")]
    pub author: String,
    #[schema(example = "2024-03-14")]
    pub date_read: String,
    #[serde(default)]
    pub child_id: Option<String>,
    #[serde(default)]
    pub isbn: Option<String>,
    #[serde(default)]
    pub lexile_level: Option<String>,
    #[serde(default)]
    pub is_partial: bool,
    #[serde(default)]
    pub partial_comment: Option<String>,
}

impl TryFrom<&BookRequest> for BookDraft {
    type Error = Error;

    fn try_from(value: &BookRequest) -> Result<Self, Self::Error> {
        BookDraft::try_from_fields(BookFields {
            title: &value.title,
            author: &value.author,
            date_read: &value.date_read,
            isbn: value.isbn.as_deref(),
            lexile_level: value.lexile_level.as_deref(),
            is_partial: value.is_partial,
            partial_comment: value.partial_comment.as_deref(),
        })
        .map_err(field_error)
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct BooksQuery {
    /// Restrict to one child; all visible children when omitted.
    pub child_id: Option<String>,
}

async fn create_for(
    state: &HttpState,
    requester: &Principal,
    child: ChildId,
    request: &BookRequest,
) -> ApiResult<HttpResponse> {
    let draft = BookDraft::try_from(request)?;
    let book = state.books.create(requester, &child, draft).await?;
    Ok(HttpResponse::Created().json(BookResponse::from(&book)))
}

async fn list_for(
    state: &HttpState,
    requester: &Principal,
    child: Option<ChildId>,
) -> ApiResult<web::Json<Vec<BookResponse>>> {
    let books = state.books_query.list(requester, child).await?;
    Ok(web::Json(books.iter().map(BookResponse::from).collect()))
}

/// Log a book. Requires EDIT on the child.
#[utoipa::path(
    post,
    path = "/api/books",
    request_body = BookRequest,
    responses(
        (status = 201, description = "Book logged", body = BookResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 403, description = "EDIT access required", body = Error),
        (status = 404, description = "Child not found", body = Error)
    ),
    tags = ["books"],
    operation_id = "createBook"
)]
#[post("/books")]
pub async fn create_book(
    state: web::Data<HttpState>,
    user: CurrentUser,
    payload: web::Json<BookRequest>,
) -> ApiResult<HttpResponse> {
    let request = payload.into_inner();
    let raw_child = request.child_id.as_deref().ok_or_else(|| {
        Error::invalid_request("childId is required")
            .with_details(serde_json::json!({ "field": "childId", "code": "missing_field" }))
    })?;
    let child: ChildId = parse_id(raw_child, CHILD_ID)?;
    create_for(&state, user.principal(), child, &request).await
}

/// Books of one child, or of every visible child. Newest first.
#[utoipa::path(
    get,
    path = "/api/books",
    params(BooksQuery),
    responses(
        (status = 200, description = "Books", body = [BookResponse]),
        (status = 403, description = "No access to the child", body = Error),
        (status = 404, description = "Child not found", body = Error)
    ),
    tags = ["books"],
    operation_id = "listBooks"
)]
#[get("/books")]
pub async fn list_books(
    state: web::Data<HttpState>,
    user: CurrentUser,
    query: web::Query<BooksQuery>,
) -> ApiResult<web::Json<Vec<BookResponse>>> {
    let child = query
        .child_id
        .as_deref()
        .map(|raw| parse_id::<ChildId>(raw, CHILD_ID))
        .transpose()?;
    list_for(&state, user.principal(), child).await
}

/// List books logged for one child.
#[utoipa::path(
    get,
    path = "/api/books/child/{childId}",
    params(("childId" = String, Path, description = "Child id")),
    responses(
        (status = 200, description = "Books of the child", body = [BookResponse]),
        (status = 403, description = "No access to the child", body = Error),
        (status = 404, description = "Child not found", body = Error)
    ),
    tags = ["books"],
    operation_id = "listChildBooks"
)]
#[get("/books/child/{child_id}")]
pub async fn list_child_books(
    state: web::Data<HttpState>,
    user: CurrentUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<BookResponse>>> {
    let child: ChildId = parse_id(&path, CHILD_ID)?;
    list_for(&state, user.principal(), Some(child)).await
}

/// Log a book against the child in the path.
#[utoipa::path(
    post,
    path = "/api/books/child/{childId}",
    params(("childId" = String, Path, description = "Child id")),
    request_body = BookRequest,
    responses(
        (status = 201, description = "Book logged", body = BookResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 403, description = "EDIT access required", body = Error),
        (status = 404, description = "Child not found", body = Error)
    ),
    tags = ["books"],
    operation_id = "createChildBook"
)]
#[post("/books/child/{child_id}")]
pub async fn create_child_book(
    state: web::Data<HttpState>,
    user: CurrentUser,
    path: web::Path<String>,
    payload: web::Json<BookRequest>,
) -> ApiResult<HttpResponse> {
    let child: ChildId = parse_id(&path, CHILD_ID)?;
    create_for(&state, user.principal(), child, &payload).await
}

/// Fetch a single book.
#[utoipa::path(
    get,
    path = "/api/books/{id}",
    params(("id" = String, Path, description = "Book id")),
    responses(
        (status = 200, description = "Book", body = BookResponse),
        (status = 403, description = "No access", body = Error),
        (status = 404, description = "Book not found", body = Error)
    ),
    tags = ["books"],
    operation_id = "getBook"
)]
#[get("/books/{id}")]
pub async fn get_book(
    state: web::Data<HttpState>,
    user: CurrentUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<BookResponse>> {
    let book: BookId = parse_id(&path, BOOK_ID)?;
    let found = state.books_query.get(user.principal(), &book).await?;
    Ok(web::Json(BookResponse::from(&found)))
}

/// Replace a book's content. Requires EDIT on its child.
#[utoipa::path(
    put,
    path = "/api/books/{id}",
    params(("id" = String, Path, description = "Book id")),
    request_body = BookRequest,
    responses(
        (status = 200, description = "Updated book", body = BookResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 403, description = "EDIT access required", body = Error),
        (status = 404, description = "Book not found", body = Error)
    ),
    tags = ["books"],
    operation_id = "updateBook"
)]
#[put("/books/{id}")]
pub async fn update_book(
    state: web::Data<HttpState>,
    user: CurrentUser,
    path: web::Path<String>,
    payload: web::Json<BookRequest>,
) -> ApiResult<web::Json<BookResponse>> {
    let book: BookId = parse_id(&path, BOOK_ID)?;
    let draft = BookDraft::try_from(&payload.into_inner())?;
    let updated = state.books.update(user.principal(), &book, draft).await?;
    Ok(web::Json(BookResponse::from(&updated)))
}

/// Delete a book.
#[utoipa::path(
    delete,
    path = "/api/books/{id}",
    params(("id" = String, Path, description = "Book id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 403, description = "EDIT access required", body = Error),
        (status = 404, description = "Book not found", body = Error)
    ),
    tags = ["books"],
    operation_id = "deleteBook"
)]
#[delete("/books/{id}")]
pub async fn delete_book(
    state: web::Data<HttpState>,
    user: CurrentUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let book: BookId = parse_id(&path, BOOK_ID)?;
    state.books.delete(user.principal(), &book).await?;
    Ok(HttpResponse::NoContent().finish())
}
