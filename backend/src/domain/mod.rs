//! Domain primitives, aggregates and services.
//!
//! Purpose: define strongly typed entities used by the HTTP and persistence
//! layers, and the services implementing the driving ports. Types are
//! validated on construction so services only ever see well-formed values.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - User, Child, Book, Permission, PendingInvitation: aggregates.
//! - Services (`AuthService`, `ChildrenService`, ...) implementing the
//!   driving ports declared in [`ports`].

pub mod access;
pub mod auth;
pub mod auth_service;
pub mod book;
pub mod books_service;
pub mod child;
pub mod children_service;
pub mod error;
pub mod ids;
pub mod invitation;
pub mod maintenance_service;
pub mod permission;
pub mod ports;
pub mod reports_service;
pub mod sharing_service;
pub mod trace_id;
pub mod user;
pub mod users_service;

mod repository_errors;
#[cfg(test)]
pub(crate) mod test_fixtures;

pub use self::access::ChildAccessPolicy;
pub use self::auth::{
    AccessToken, LoginCredentials, LoginSuccess, LoginValidationError, PASSWORD_MIN, Principal,
    Registration, RegistrationValidationError,
};
pub use self::auth_service::AuthService;
pub use self::book::{
    Book, BookDraft, BookFields, BookValidationError, DATE_READ_FORMAT, ReadingPeriod,
    ReadingPeriodError,
};
pub use self::books_service::BooksService;
pub use self::child::{Child, ChildBookCount, ChildDraft, ChildValidationError, VisibleChild};
pub use self::children_service::ChildrenService;
pub use self::error::{Error, ErrorCode};
pub use self::ids::{BookId, ChildId, InvalidId, InvitationId, PermissionId, UserId};
pub use self::invitation::{
    INVITATION_TTL_DAYS, InvitationDetails, InvitationGrant, InvitationToken, InviteOutcome,
    InvitedChild, PendingInvitation,
};
pub use self::maintenance_service::MaintenanceService;
pub use self::permission::{
    AccessRequirement, ChildAccess, InvalidPermissionType, Permission, PermissionType,
    PermissionWithGrantee,
};
pub use self::reports_service::ReportsService;
pub use self::sharing_service::SharingService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{EmailAddress, PersonName, User, UserProfile, UserValidationError};
pub use self::users_service::UsersService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use booktracker::domain::{ApiResult, Error};
///
/// fn lookup() -> ApiResult<u32> {
///     Err(Error::not_found("Child not found"))
/// }
/// assert!(lookup().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
