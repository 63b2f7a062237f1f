//! Builders wiring Diesel repositories and credential adapters into the
//! domain services behind [`HttpState`].

use std::sync::Arc;

use mockable::{Clock, DefaultClock};

use crate::domain::ports::PasswordHashError;
use crate::domain::{
    AuthService, BooksService, ChildrenService, MaintenanceService, ReportsService,
    SharingService, UsersService,
};
use crate::inbound::http::state::HttpState;
use crate::outbound::credentials::{Argon2PasswordHasher, JwtTokenService};
use crate::outbound::notify::TracingInvitationNotifier;
use crate::outbound::persistence::{
    DbPool, DieselBookRepository, DieselChildRepository, DieselInvitationRepository,
    DieselMaintenanceRepository, DieselPermissionRepository, DieselUserRepository,
};

use super::ServerConfig;

/// One shared instance of every repository over the same pool.
struct Repositories {
    users: Arc<DieselUserRepository>,
    children: Arc<DieselChildRepository>,
    books: Arc<DieselBookRepository>,
    permissions: Arc<DieselPermissionRepository>,
    invitations: Arc<DieselInvitationRepository>,
    maintenance: Arc<DieselMaintenanceRepository>,
}

impl Repositories {
    fn new(pool: &DbPool) -> Self {
        Self {
            users: Arc::new(DieselUserRepository::new(pool.clone())),
            children: Arc::new(DieselChildRepository::new(pool.clone())),
            books: Arc::new(DieselBookRepository::new(pool.clone())),
            permissions: Arc::new(DieselPermissionRepository::new(pool.clone())),
            invitations: Arc::new(DieselInvitationRepository::new(pool.clone())),
            maintenance: Arc::new(DieselMaintenanceRepository::new(pool.clone())),
        }
    }
}

/// Build the handler state from the server configuration.
///
/// # Errors
///
/// Returns [`PasswordHashError`] when the configured Argon2 parameters are
/// rejected.
pub fn build_http_state(config: &ServerConfig) -> Result<HttpState, PasswordHashError> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let repos = Repositories::new(&config.db_pool);
    let hasher = Arc::new(Argon2PasswordHasher::new(config.hashing)?);
    let tokens = Arc::new(JwtTokenService::new(
        config.jwt_secret.as_bytes(),
        clock.clone(),
    ));
    let notifier = Arc::new(TracingInvitationNotifier::new(config.frontend_url.clone()));

    let auth = Arc::new(AuthService::new(
        repos.users.clone(),
        repos.invitations.clone(),
        repos.children.clone(),
        hasher,
        tokens,
        clock.clone(),
    ));
    let users = Arc::new(UsersService::new(repos.users.clone(), clock.clone()));
    let children = Arc::new(ChildrenService::new(
        repos.children.clone(),
        repos.permissions.clone(),
        repos.books.clone(),
        clock.clone(),
    ));
    let books = Arc::new(BooksService::new(
        repos.books.clone(),
        repos.children.clone(),
        repos.permissions.clone(),
        clock.clone(),
    ));
    let sharing = Arc::new(SharingService::new(
        repos.users,
        repos.children.clone(),
        repos.permissions,
        repos.invitations,
        notifier,
        clock,
    ));
    let reports = Arc::new(ReportsService::new(repos.children, repos.books));
    let maintenance = Arc::new(MaintenanceService::new(repos.maintenance));

    Ok(HttpState {
        auth: auth.clone(),
        sessions: auth,
        users: users.clone(),
        users_query: users,
        children: children.clone(),
        children_query: children,
        books: books.clone(),
        books_query: books,
        sharing: sharing.clone(),
        permissions_query: sharing,
        reports,
        maintenance,
    })
}
