//! SQLite persistence adapters using Diesel ORM.
//!
//! Repository implementations translate between Diesel rows and domain types;
//! no business rules live here. Row structs (`models.rs`) and the schema
//! (`schema.rs`) never leave this module. Connections come from a `bb8` pool
//! of `SyncConnectionWrapper<SqliteConnection>`.
//!
//! # Example
//!
//! ```no_run
//! use booktracker::outbound::persistence::{
//!     DbPool, DieselUserRepository, PoolConfig, run_migrations,
//! };
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! run_migrations("booktracker.db").await?;
//! let pool = DbPool::new(PoolConfig::new("booktracker.db")).await?;
//! let users = DieselUserRepository::new(pool);
//! # let _ = users;
//! # Ok(())
//! # }
//! ```

mod diesel_basic_error_mapping;
mod diesel_book_repository;
mod diesel_child_repository;
mod diesel_invitation_repository;
mod diesel_maintenance_repository;
mod diesel_permission_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod row_mapping;
mod schema;

pub use diesel_book_repository::DieselBookRepository;
pub use diesel_child_repository::DieselChildRepository;
pub use diesel_invitation_repository::DieselInvitationRepository;
pub use diesel_maintenance_repository::DieselMaintenanceRepository;
pub use diesel_permission_repository::DieselPermissionRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError, SqliteConn};
