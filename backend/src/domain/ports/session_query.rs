//! Driving port resolving bearer tokens to principals.

use async_trait::async_trait;

use crate::domain::{Error, Principal};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionQuery: Send + Sync {
    /// Resolve a bearer token. Invalid tokens and deleted accounts yield
    /// `unauthorized`.
    async fn authenticate(&self, bearer: &str) -> Result<Principal, Error>;
}
