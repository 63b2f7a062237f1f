//! Port for book persistence.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::{Book, BookId, ChildId, ReadingPeriod};

use super::define_port_error;

define_port_error! {
    /// Errors raised by book repository adapters.
    pub enum BookRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "book repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "book repository query failed: {message}",
    }
}

/// Storage for books logged against children.
///
/// Listings are ordered by `date_read` descending, then `created_at`
/// descending.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookRepository: Send + Sync {
    async fn create(&self, book: &Book) -> Result<(), BookRepositoryError>;

    async fn find_by_id(&self, id: &BookId) -> Result<Option<Book>, BookRepositoryError>;

    /// Persist the book content and `updated_at`.
    async fn update(&self, book: &Book) -> Result<(), BookRepositoryError>;

    async fn delete(&self, id: &BookId) -> Result<bool, BookRepositoryError>;

    /// Books belonging to any of `children`.
    async fn list_for_children(&self, children: &[ChildId])
    -> Result<Vec<Book>, BookRepositoryError>;

    /// Book counts per child, optionally restricted to a reading period.
    /// Children without books are absent from the map.
    async fn count_for_children(
        &self,
        children: &[ChildId],
        period: Option<ReadingPeriod>,
    ) -> Result<HashMap<ChildId, u64>, BookRepositoryError>;
}
