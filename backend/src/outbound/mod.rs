//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: SQLite repositories using Diesel ORM
//! - **credentials**: Argon2id password hashing and HS256 session tokens
//! - **notify**: invitation delivery through structured logs
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business logic.

pub mod credentials;
pub mod notify;
pub mod persistence;
