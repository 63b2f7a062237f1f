//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on driving ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AuthCommand, BooksCommand, BooksQuery, ChildrenCommand, ChildrenQuery, MaintenanceCommand,
    PermissionsQuery, ReportsQuery, SessionQuery, SharingCommand, UsersCommand, UsersQuery,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub auth: Arc<dyn AuthCommand>,
    pub sessions: Arc<dyn SessionQuery>,
    pub users: Arc<dyn UsersCommand>,
    pub users_query: Arc<dyn UsersQuery>,
    pub children: Arc<dyn ChildrenCommand>,
    pub children_query: Arc<dyn ChildrenQuery>,
    pub books: Arc<dyn BooksCommand>,
    pub books_query: Arc<dyn BooksQuery>,
    pub sharing: Arc<dyn SharingCommand>,
    pub permissions_query: Arc<dyn PermissionsQuery>,
    pub reports: Arc<dyn ReportsQuery>,
    pub maintenance: Arc<dyn MaintenanceCommand>,
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Mock-backed state for handler tests.

    use super::*;
    use crate::domain::ports::{
        MockAuthCommand, MockBooksCommand, MockBooksQuery, MockChildrenCommand,
        MockChildrenQuery, MockMaintenanceCommand, MockPermissionsQuery, MockReportsQuery,
        MockSessionQuery, MockSharingCommand, MockUsersCommand, MockUsersQuery,
    };
    use crate::domain::{Error, Principal};

    /// Token accepted by [`MockPorts::authenticated_as`].
    pub(crate) const TEST_TOKEN: &str = "test-token";

    /// One mock per driving port; set expectations then call [`Self::into_state`].
    #[derive(Default)]
    pub(crate) struct MockPorts {
        pub auth: MockAuthCommand,
        pub sessions: MockSessionQuery,
        pub users: MockUsersCommand,
        pub users_query: MockUsersQuery,
        pub children: MockChildrenCommand,
        pub children_query: MockChildrenQuery,
        pub books: MockBooksCommand,
        pub books_query: MockBooksQuery,
        pub sharing: MockSharingCommand,
        pub permissions_query: MockPermissionsQuery,
        pub reports: MockReportsQuery,
        pub maintenance: MockMaintenanceCommand,
    }

    impl MockPorts {
        /// Resolve [`TEST_TOKEN`] to `principal`; any other token is rejected.
        pub(crate) fn authenticated_as(principal: Principal) -> Self {
            let mut ports = Self::default();
            ports.sessions.expect_authenticate().returning(move |token| {
                if token == TEST_TOKEN {
                    Ok(principal.clone())
                } else {
                    Err(Error::unauthorized("Invalid or expired token"))
                }
            });
            ports
        }

        pub(crate) fn into_state(self) -> HttpState {
            HttpState {
                auth: Arc::new(self.auth),
                sessions: Arc::new(self.sessions),
                users: Arc::new(self.users),
                users_query: Arc::new(self.users_query),
                children: Arc::new(self.children),
                children_query: Arc::new(self.children_query),
                books: Arc::new(self.books),
                books_query: Arc::new(self.books_query),
                sharing: Arc::new(self.sharing),
                permissions_query: Arc::new(self.permissions_query),
                reports: Arc::new(self.reports),
                maintenance: Arc::new(self.maintenance),
            }
        }
    }

    /// `Authorization` header carrying [`TEST_TOKEN`].
    pub(crate) fn bearer() -> (&'static str, String) {
        ("Authorization", format!("Bearer {TEST_TOKEN}"))
    }
}
