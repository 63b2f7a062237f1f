//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use zeroize::Zeroizing;

use crate::config::AppConfig;
use crate::outbound::credentials::HashingParams;
use crate::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: DbPool,
    pub(crate) jwt_secret: Zeroizing<String>,
    pub(crate) frontend_url: String,
    pub(crate) enable_test_routes: bool,
    pub(crate) hashing: HashingParams,
}

impl ServerConfig {
    /// Construct a server configuration from loaded settings and a pool.
    #[must_use]
    pub fn new(settings: &AppConfig, db_pool: DbPool) -> Self {
        Self {
            bind_addr: settings.bind_addr(),
            db_pool,
            jwt_secret: Zeroizing::new(settings.jwt_secret().to_owned()),
            frontend_url: settings.frontend_url().to_owned(),
            enable_test_routes: settings.enable_test_routes,
            hashing: HashingParams::default(),
        }
    }

    /// Override the Argon2 cost parameters.
    #[must_use]
    pub fn with_hashing(mut self, hashing: HashingParams) -> Self {
        self.hashing = hashing;
        self
    }

    /// Replace the signing secret.
    #[must_use]
    pub fn with_jwt_secret(mut self, secret: impl Into<String>) -> Self {
        self.jwt_secret = Zeroizing::new(secret.into());
        self
    }

    /// Toggle the test-only maintenance routes.
    #[must_use]
    pub fn with_test_routes(mut self, enabled: bool) -> Self {
        self.enable_test_routes = enabled;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    /// Whether the database reset route is mounted.
    #[must_use]
    pub fn enable_test_routes(&self) -> bool {
        self.enable_test_routes
    }
}
