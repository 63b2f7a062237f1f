//! Mapping from driven-port failures to domain errors.
//!
//! Connection failures surface as `service_unavailable`, everything else as
//! `internal`. The adapter message is kept for logs; the HTTP adapter
//! redacts internal messages before they reach clients.

use super::Error;
use super::ports::{
    BookRepositoryError, ChildRepositoryError, InvitationRepositoryError,
    MaintenanceRepositoryError, NotifierError, PasswordHashError, PermissionRepositoryError,
    TokenError, UserRepositoryError,
};

pub(crate) const DUPLICATE_EMAIL_MESSAGE: &str = "User with this email already exists";

macro_rules! connection_or_query {
    ($error:ident, $label:literal) => {
        impl From<$error> for Error {
            fn from(error: $error) -> Self {
                match error {
                    $error::Connection { message } => {
                        Error::service_unavailable(format!("{} unavailable: {message}", $label))
                    }
                    $error::Query { message } => {
                        Error::internal(format!("{} error: {message}", $label))
                    }
                }
            }
        }
    };
}

connection_or_query!(ChildRepositoryError, "child repository");
connection_or_query!(BookRepositoryError, "book repository");
connection_or_query!(PermissionRepositoryError, "permission repository");
connection_or_query!(MaintenanceRepositoryError, "maintenance repository");

impl From<UserRepositoryError> for Error {
    fn from(error: UserRepositoryError) -> Self {
        match error {
            UserRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("user repository unavailable: {message}"))
            }
            UserRepositoryError::Query { message } => {
                Error::internal(format!("user repository error: {message}"))
            }
            UserRepositoryError::DuplicateEmail { .. } => {
                Error::invalid_request(DUPLICATE_EMAIL_MESSAGE)
            }
        }
    }
}

impl From<InvitationRepositoryError> for Error {
    fn from(error: InvitationRepositoryError) -> Self {
        match error {
            InvitationRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("invitation repository unavailable: {message}"))
            }
            InvitationRepositoryError::Query { message } => {
                Error::internal(format!("invitation repository error: {message}"))
            }
            InvitationRepositoryError::DuplicateEmail { .. } => {
                Error::invalid_request(DUPLICATE_EMAIL_MESSAGE)
            }
        }
    }
}

impl From<PasswordHashError> for Error {
    fn from(error: PasswordHashError) -> Self {
        Error::internal(error.to_string())
    }
}

impl From<TokenError> for Error {
    fn from(error: TokenError) -> Self {
        match error {
            TokenError::Invalid => Error::unauthorized("Invalid or expired token"),
            TokenError::Issue { message } => {
                Error::internal(format!("token issue failed: {message}"))
            }
        }
    }
}

impl From<NotifierError> for Error {
    fn from(error: NotifierError) -> Self {
        Error::service_unavailable(error.to_string())
    }
}
