//! Driving port for managing child profiles.

use async_trait::async_trait;

use crate::domain::{Child, ChildDraft, ChildId, Error, Principal};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChildrenCommand: Send + Sync {
    /// Create a child owned by the requester.
    async fn create(&self, requester: &Principal, draft: ChildDraft) -> Result<Child, Error>;

    /// Rename or regrade a child. Requires EDIT.
    async fn update(
        &self,
        requester: &Principal,
        child: &ChildId,
        draft: ChildDraft,
    ) -> Result<Child, Error>;

    /// Delete a child and everything attached to it. Owner only.
    async fn delete(&self, requester: &Principal, child: &ChildId) -> Result<(), Error>;
}
