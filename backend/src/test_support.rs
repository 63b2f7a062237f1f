//! Test utilities for the backend crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`,
//! through the `test-support` feature).

use tempfile::TempDir;

use crate::config::AppConfig;
use crate::outbound::credentials::HashingParams;
use crate::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use crate::server::ServerConfig;

/// Signing secret used by test servers.
pub const TEST_JWT_SECRET: &str = "test-secret";

/// Cheapest Argon2 parameters the crate accepts.
pub fn fast_hashing() -> HashingParams {
    HashingParams {
        memory_kib: 8,
        iterations: 1,
        parallelism: 1,
    }
}

/// A migrated SQLite database in a temporary directory, removed on drop.
pub struct TestDatabase {
    _dir: TempDir,
    url: String,
    pool: DbPool,
}

impl TestDatabase {
    /// Create, migrate and pool a fresh database.
    ///
    /// # Panics
    /// Panics when the temporary directory, migrations or pool fail.
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let url = dir
            .path()
            .join("booktracker-test.db")
            .to_string_lossy()
            .into_owned();
        run_migrations(&url).await.expect("apply migrations");
        let pool = DbPool::new(PoolConfig::new(url.clone()).with_max_size(4))
            .await
            .expect("build pool");
        Self {
            _dir: dir,
            url,
            pool,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    /// Server configuration over this database with test routes enabled.
    pub fn server_config(&self) -> ServerConfig {
        let settings = AppConfig {
            database_url: Some(self.url.clone()),
            jwt_secret: Some(TEST_JWT_SECRET.to_owned()),
            host: None,
            port: None,
            enable_test_routes: true,
            pool_max_size: None,
            frontend_url: None,
        };
        ServerConfig::new(&settings, self.pool()).with_hashing(fast_hashing())
    }
}
