//! Domain ports for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`PasswordHasher`], [`TokenService`],
//! [`InvitationNotifier`]) describe what the domain needs from adapters and
//! expose typed errors built with `define_port_error!`. Driving ports
//! (`*Command`, `*Query`) are what inbound adapters call.

mod macros;
pub(crate) use macros::define_port_error;

mod auth_command;
mod book_repository;
mod books_command;
mod books_query;
mod child_repository;
mod children_command;
mod children_query;
mod invitation_notifier;
mod invitation_repository;
mod maintenance_command;
mod maintenance_repository;
mod password_hasher;
mod permission_repository;
mod permissions_query;
mod reports_query;
mod session_query;
mod sharing_command;
mod token_service;
mod user_repository;
mod users_command;
mod users_query;

pub use auth_command::AuthCommand;
#[cfg(test)]
pub use auth_command::MockAuthCommand;
pub use book_repository::{BookRepository, BookRepositoryError};
#[cfg(test)]
pub use book_repository::MockBookRepository;
pub use books_command::BooksCommand;
#[cfg(test)]
pub use books_command::MockBooksCommand;
pub use books_query::BooksQuery;
#[cfg(test)]
pub use books_query::MockBooksQuery;
pub use child_repository::{ChildRepository, ChildRepositoryError, ChildWithGrant};
#[cfg(test)]
pub use child_repository::MockChildRepository;
pub use children_command::ChildrenCommand;
#[cfg(test)]
pub use children_command::MockChildrenCommand;
pub use children_query::ChildrenQuery;
#[cfg(test)]
pub use children_query::MockChildrenQuery;
pub use invitation_notifier::{InvitationNotifier, NotifierError};
#[cfg(test)]
pub use invitation_notifier::MockInvitationNotifier;
pub use invitation_repository::{InvitationRepository, InvitationRepositoryError};
#[cfg(test)]
pub use invitation_repository::MockInvitationRepository;
pub use maintenance_command::MaintenanceCommand;
#[cfg(test)]
pub use maintenance_command::MockMaintenanceCommand;
#[cfg(test)]
pub use maintenance_repository::MockMaintenanceRepository;
pub use maintenance_repository::{MaintenanceRepository, MaintenanceRepositoryError};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use permission_repository::MockPermissionRepository;
pub use permission_repository::{PermissionRepository, PermissionRepositoryError};
pub use permissions_query::PermissionsQuery;
#[cfg(test)]
pub use permissions_query::MockPermissionsQuery;
pub use reports_query::{ChildReport, ReadingReport, ReportsQuery};
#[cfg(test)]
pub use reports_query::MockReportsQuery;
#[cfg(test)]
pub use session_query::MockSessionQuery;
pub use session_query::SessionQuery;
pub use sharing_command::{InviteRequest, SharingCommand};
#[cfg(test)]
pub use sharing_command::MockSharingCommand;
#[cfg(test)]
pub use token_service::MockTokenService;
pub use token_service::{TokenError, TokenService};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{StoredCredentials, UserRepository, UserRepositoryError};
pub use users_command::{UserUpdate, UsersCommand};
#[cfg(test)]
pub use users_command::MockUsersCommand;
pub use users_query::UsersQuery;
#[cfg(test)]
pub use users_query::MockUsersQuery;
