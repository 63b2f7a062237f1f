//! Driving port for reading logged books.

use async_trait::async_trait;

use crate::domain::{Book, BookId, ChildId, Error, Principal};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BooksQuery: Send + Sync {
    /// Books of `child` (VIEW required), or of every visible child when
    /// `child` is `None`. Newest reading first.
    async fn list(&self, requester: &Principal, child: Option<ChildId>)
    -> Result<Vec<Book>, Error>;

    /// One book. Requires VIEW on its child.
    async fn get(&self, requester: &Principal, book: &BookId) -> Result<Book, Error>;
}
