//! SQLite-backed `MaintenanceRepository` used by the test reset endpoint.

use async_trait::async_trait;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{MaintenanceRepository, MaintenanceRepositoryError};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::pool::{DbPool, PoolError};
use super::schema::{books, children, pending_invitations, permissions, users};

/// Diesel-backed implementation of the maintenance repository port.
#[derive(Clone)]
pub struct DieselMaintenanceRepository {
    pool: DbPool,
}

impl DieselMaintenanceRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> MaintenanceRepositoryError {
    map_basic_pool_error(error, |message| {
        MaintenanceRepositoryError::connection(message)
    })
}

fn map_diesel_error(error: diesel::result::Error) -> MaintenanceRepositoryError {
    map_basic_diesel_error(
        error,
        MaintenanceRepositoryError::query,
        MaintenanceRepositoryError::connection,
    )
}

#[async_trait]
impl MaintenanceRepository for DieselMaintenanceRepository {
    async fn reset_all(&self) -> Result<(), MaintenanceRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        // Children before users, dependants before children.
        conn.transaction(|conn| {
            async move {
                diesel::delete(pending_invitations::table)
                    .execute(conn)
                    .await?;
                diesel::delete(books::table).execute(conn).await?;
                diesel::delete(permissions::table).execute(conn).await?;
                diesel::delete(children::table).execute(conn).await?;
                diesel::delete(users::table).execute(conn).await?;
                Ok::<_, diesel::result::Error>(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }
}
