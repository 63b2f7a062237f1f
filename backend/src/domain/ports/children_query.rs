//! Driving port for listing children visible to a user.

use async_trait::async_trait;

use crate::domain::{ChildBookCount, ChildId, Error, Principal, ReadingPeriod, VisibleChild};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChildrenQuery: Send + Sync {
    /// Children owned by or shared with the requester, ordered by name.
    async fn list(&self, requester: &Principal) -> Result<Vec<VisibleChild>, Error>;

    /// One child. Requires VIEW.
    async fn get(&self, requester: &Principal, child: &ChildId) -> Result<VisibleChild, Error>;

    /// Visible children with their book counts; all-time when `period` is
    /// `None`.
    async fn list_with_counts(
        &self,
        requester: &Principal,
        period: Option<ReadingPeriod>,
    ) -> Result<Vec<ChildBookCount>, Error>;
}
