//! Booktracker backend: reading logs for children, shared between family
//! members over a JSON HTTP API.
//!
//! The crate follows a hexagonal layout. [`domain`] holds entities, services
//! and the ports they depend on; [`inbound`] adapts HTTP requests onto the
//! driving ports; [`outbound`] implements the driven ports over SQLite,
//! Argon2 and JWT; [`server`] wires them together.

pub mod config;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
