//! Application configuration loaded via OrthoConfig.
//!
//! Values come from `BOOKTRACKER_*` environment variables, configuration
//! files and command-line flags, in OrthoConfig's usual precedence order.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use ortho_config::OrthoConfig;
use serde::Deserialize;
use tracing::warn;

/// Signing secret used when none is configured. Never acceptable in
/// production; startup logs a warning when it is in effect.
pub const DEFAULT_JWT_SECRET: &str = "default-secret-change-me";
const DEFAULT_DATABASE_URL: &str = "booktracker.db";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_POOL_MAX_SIZE: u32 = 10;
const DEFAULT_FRONTEND_URL: &str = "http://localhost:3000";

/// Raised when the configured database URL cannot be used.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DatabaseUrlError {
    #[error("remote libsql databases are not supported: {0}")]
    RemoteLibsql(String),
    #[error("database url must not be empty")]
    Empty,
    #[error("in-memory databases are not supported")]
    InMemory,
}

/// Runtime settings for the HTTP server and its adapters.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "BOOKTRACKER")]
pub struct AppConfig {
    /// SQLite database path; a `file:` prefix is accepted.
    pub database_url: Option<String>,
    /// HMAC secret for signing session tokens.
    pub jwt_secret: Option<String>,
    /// Interface to bind.
    pub host: Option<IpAddr>,
    /// Port to bind.
    pub port: Option<u16>,
    /// Mount `DELETE /api/test/reset-db`.
    #[ortho_config(default = false)]
    pub enable_test_routes: bool,
    /// Maximum pooled database connections.
    pub pool_max_size: Option<u32>,
    /// Base URL of the web client, used to build invitation links.
    pub frontend_url: Option<String>,
}

impl AppConfig {
    /// SQLite path with any `file:` scheme removed.
    ///
    /// # Errors
    /// Rejects `libsql://` URLs, in-memory databases and empty values.
    pub fn database_path(&self) -> Result<String, DatabaseUrlError> {
        database_path(
            self.database_url
                .as_deref()
                .unwrap_or(DEFAULT_DATABASE_URL),
        )
    }

    /// Configured signing secret, falling back to [`DEFAULT_JWT_SECRET`].
    pub fn jwt_secret(&self) -> &str {
        self.jwt_secret.as_deref().unwrap_or(DEFAULT_JWT_SECRET)
    }

    /// Whether the insecure fallback secret is in effect.
    pub fn uses_default_secret(&self) -> bool {
        self.jwt_secret() == DEFAULT_JWT_SECRET
    }

    /// Socket address the HTTP server binds to.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(
            self.host.unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED)),
            self.port.unwrap_or(DEFAULT_PORT),
        )
    }

    pub fn pool_max_size(&self) -> u32 {
        self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE)
    }

    /// Origin allowed by CORS.
    pub fn frontend_url(&self) -> &str {
        self.frontend_url.as_deref().unwrap_or(DEFAULT_FRONTEND_URL)
    }

    /// Log configuration problems that do not prevent startup.
    pub fn warn_on_insecure_defaults(&self) {
        if self.uses_default_secret() {
            warn!("BOOKTRACKER_JWT_SECRET is not set; using the insecure default secret");
        }
        if self.enable_test_routes {
            warn!("test routes are enabled; DELETE /api/test/reset-db wipes the database");
        }
    }
}

/// Normalise a database URL into a SQLite path.
///
/// # Examples
/// ```
/// use booktracker::config::database_path;
///
/// assert_eq!(database_path("file:local.db").unwrap(), "local.db");
/// assert!(database_path("libsql://db.example.com").is_err());
/// assert!(database_path(":memory:").is_err());
/// ```
pub fn database_path(url: &str) -> Result<String, DatabaseUrlError> {
    let trimmed = url.trim();
    if trimmed.starts_with("libsql://") {
        return Err(DatabaseUrlError::RemoteLibsql(trimmed.to_owned()));
    }
    let path = trimmed.strip_prefix("file:").unwrap_or(trimmed);
    if path.is_empty() {
        return Err(DatabaseUrlError::Empty);
    }
    if path == ":memory:" || path.contains("mode=memory") {
        return Err(DatabaseUrlError::InMemory);
    }
    Ok(path.to_owned())
}
