//! Driving port for wiping all data between end-to-end test runs.

use async_trait::async_trait;

use crate::domain::Error;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MaintenanceCommand: Send + Sync {
    async fn reset_database(&self) -> Result<(), Error>;
}
