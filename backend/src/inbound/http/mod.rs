//! HTTP inbound adapter exposing REST endpoints.

pub mod auth;
pub mod books;
pub mod children;
pub mod dto;
pub mod error;
pub mod health;
pub mod maintenance;
pub mod reports;
pub mod session;
pub mod sharing;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

use actix_web::{Scope, web};

pub use error::ApiResult;

/// Every `/api` route. Literal segments are registered ahead of the `{id}`
/// patterns they would otherwise collide with.
pub fn api_scope(enable_test_routes: bool) -> Scope {
    let scope = web::scope("/api")
        .app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(error::query_error_handler))
        .app_data(web::PathConfig::default().error_handler(error::path_error_handler))
        .route("/health", web::get().to(health::status))
        .service(auth::register)
        .service(auth::login)
        .service(auth::invitation_details)
        .service(auth::register_with_invitation)
        .service(users::current_user)
        .service(users::list_users)
        .service(users::get_user)
        .service(users::update_user)
        .service(users::delete_user)
        .service(children::create_child)
        .service(children::list_children)
        .service(children::list_children_with_counts)
        .service(children::book_counts)
        .service(sharing::invite_to_child)
        .service(sharing::list_child_permissions)
        .service(children::get_child)
        .service(children::update_child)
        .service(children::delete_child)
        .service(sharing::invite_user)
        .service(sharing::revoke_permission)
        .service(books::create_book)
        .service(books::list_books)
        .service(books::list_child_books)
        .service(books::create_child_book)
        .service(books::get_book)
        .service(books::update_book)
        .service(books::delete_book)
        .service(reports::my_books);

    if enable_test_routes {
        scope.service(maintenance::reset_database)
    } else {
        scope
    }
}
