//! Wiping the store between end-to-end test runs.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::domain::Error;
use crate::domain::ports::{MaintenanceCommand, MaintenanceRepository};

/// Service implementing [`MaintenanceCommand`].
pub struct MaintenanceService<M> {
    repository: Arc<M>,
}

impl<M> MaintenanceService<M> {
    /// Create a new service over the maintenance repository.
    pub fn new(repository: Arc<M>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<M: MaintenanceRepository> MaintenanceCommand for MaintenanceService<M> {
    async fn reset_database(&self) -> Result<(), Error> {
        self.repository.reset_all().await?;
        warn!("database reset: all rows deleted");
        Ok(())
    }
}
