//! Driving port for logging books.

use async_trait::async_trait;

use crate::domain::{Book, BookDraft, BookId, ChildId, Error, Principal};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BooksCommand: Send + Sync {
    /// Log a book for `child`. Requires EDIT on the child.
    async fn create(
        &self,
        requester: &Principal,
        child: &ChildId,
        draft: BookDraft,
    ) -> Result<Book, Error>;

    /// Replace a book's content. Requires EDIT on its child.
    async fn update(
        &self,
        requester: &Principal,
        book: &BookId,
        draft: BookDraft,
    ) -> Result<Book, Error>;

    /// Delete a book. Requires EDIT on its child.
    async fn delete(&self, requester: &Principal, book: &BookId) -> Result<(), Error>;
}
