//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: every HTTP endpoint from the inbound layer
//! - **Schemas**: request and response bodies plus the shared error envelope
//! - **Security**: bearer token authentication scheme
//!
//! The generated specification is served by Swagger UI in debug builds.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode, PermissionType};
use crate::inbound::http::auth::{
    InvitationDetailsResponse, InvitedChildResponse, LoginRequest, LoginResponse,
    RegisterRequest, RegisterWithInvitationRequest,
};
use crate::inbound::http::books::BookRequest;
use crate::inbound::http::children::ChildRequest;
use crate::inbound::http::dto::{
    BookCountResponse, BookResponse, ChildResponse, ChildWithCountResponse, MessageResponse,
    UserResponse,
};
use crate::inbound::http::reports::{ChildReportResponse, ReadingReportResponse};
use crate::inbound::http::sharing::{
    BulkInviteRequestBody, ChildGrantBody, GranteeResponse, InviteRequestBody, InviteResponse,
    InviteStatus, PermissionResponse,
};
use crate::inbound::http::users::UpdateUserRequest;

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Token issued by POST /api/auth/login."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Booktracker API",
        description = "Reading logs for children, shared between family members."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::auth::register,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::invitation_details,
        crate::inbound::http::auth::register_with_invitation,
        crate::inbound::http::users::current_user,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::children::create_child,
        crate::inbound::http::children::list_children,
        crate::inbound::http::children::list_children_with_counts,
        crate::inbound::http::children::book_counts,
        crate::inbound::http::children::get_child,
        crate::inbound::http::children::update_child,
        crate::inbound::http::children::delete_child,
        crate::inbound::http::books::create_book,
        crate::inbound::http::books::list_books,
        crate::inbound::http::books::list_child_books,
        crate::inbound::http::books::create_child_book,
        crate::inbound::http::books::get_book,
        crate::inbound::http::books::update_book,
        crate::inbound::http::books::delete_book,
        crate::inbound::http::sharing::invite_to_child,
        crate::inbound::http::sharing::invite_user,
        crate::inbound::http::sharing::list_child_permissions,
        crate::inbound::http::sharing::revoke_permission,
        crate::inbound::http::reports::my_books,
        crate::inbound::http::maintenance::reset_database,
        crate::inbound::http::health::status,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        PermissionType,
        RegisterRequest,
        LoginRequest,
        LoginResponse,
        InvitedChildResponse,
        InvitationDetailsResponse,
        RegisterWithInvitationRequest,
        UserResponse,
        UpdateUserRequest,
        ChildRequest,
        ChildResponse,
        ChildWithCountResponse,
        BookCountResponse,
        BookRequest,
        BookResponse,
        InviteRequestBody,
        ChildGrantBody,
        BulkInviteRequestBody,
        InviteStatus,
        InviteResponse,
        GranteeResponse,
        PermissionResponse,
        ChildReportResponse,
        ReadingReportResponse,
        MessageResponse,
    )),
    tags(
        (name = "auth", description = "Registration, login and invitation redemption"),
        (name = "users", description = "Account management"),
        (name = "children", description = "Children and their reading counts"),
        (name = "books", description = "Books read by children"),
        (name = "sharing", description = "Invitations and access grants"),
        (name = "reports", description = "Reading reports"),
        (name = "maintenance", description = "Test-only maintenance routes"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
