//! Port for destructive maintenance used by end-to-end test suites.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised while wiping the store.
    pub enum MaintenanceRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "maintenance connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "maintenance query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MaintenanceRepository: Send + Sync {
    /// Delete every invitation, book, permission, child and user.
    async fn reset_all(&self) -> Result<(), MaintenanceRepositoryError>;
}
