//! Book logging use-cases. Every operation is gated on access to the
//! book's child.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::children_service::visible_children;
use crate::domain::ports::{
    BookRepository, BooksCommand, BooksQuery, ChildRepository, PermissionRepository,
};
use crate::domain::{
    AccessRequirement, Book, BookDraft, BookId, ChildAccessPolicy, ChildId, Error, Principal,
};

pub(crate) const BOOK_NOT_FOUND: &str = "Book not found";

/// Service implementing the book driving ports.
pub struct BooksService<B, C, P> {
    books: Arc<B>,
    children: Arc<C>,
    access: ChildAccessPolicy<C, P>,
    clock: Arc<dyn Clock>,
}

impl<B, C, P> BooksService<B, C, P> {
    /// Create a new service with the given repositories.
    pub fn new(
        books: Arc<B>,
        children: Arc<C>,
        permissions: Arc<P>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            access: ChildAccessPolicy::new(Arc::clone(&children), permissions),
            books,
            children,
            clock,
        }
    }
}

impl<B, C, P> BooksService<B, C, P>
where
    B: BookRepository,
    C: ChildRepository,
    P: PermissionRepository,
{
    /// Load a book and check the requester's access to its child.
    async fn authorised_book(
        &self,
        requester: &Principal,
        id: &BookId,
        requirement: AccessRequirement,
    ) -> Result<Book, Error> {
        let book = self
            .books
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found(BOOK_NOT_FOUND))?;
        self.access
            .require(requester, book.child_id(), requirement)
            .await?;
        Ok(book)
    }
}

#[async_trait]
impl<B, C, P> BooksCommand for BooksService<B, C, P>
where
    B: BookRepository,
    C: ChildRepository,
    P: PermissionRepository,
{
    async fn create(
        &self,
        requester: &Principal,
        child: &ChildId,
        draft: BookDraft,
    ) -> Result<Book, Error> {
        self.access
            .require(requester, child, AccessRequirement::Edit)
            .await?;
        let book = Book::new(BookId::random(), *child, draft, self.clock.utc());
        self.books.create(&book).await?;
        info!(book_id = %book.id(), child_id = %child, "book logged");
        Ok(book)
    }

    async fn update(
        &self,
        requester: &Principal,
        book: &BookId,
        draft: BookDraft,
    ) -> Result<Book, Error> {
        let existing = self
            .authorised_book(requester, book, AccessRequirement::Edit)
            .await?;
        let updated = existing.revised(draft, self.clock.utc());
        self.books.update(&updated).await?;
        Ok(updated)
    }

    async fn delete(&self, requester: &Principal, book: &BookId) -> Result<(), Error> {
        self.authorised_book(requester, book, AccessRequirement::Edit)
            .await?;
        if !self.books.delete(book).await? {
            return Err(Error::not_found(BOOK_NOT_FOUND));
        }
        info!(book_id = %book, "book deleted");
        Ok(())
    }
}

#[async_trait]
impl<B, C, P> BooksQuery for BooksService<B, C, P>
where
    B: BookRepository,
    C: ChildRepository,
    P: PermissionRepository,
{
    async fn list(
        &self,
        requester: &Principal,
        child: Option<ChildId>,
    ) -> Result<Vec<Book>, Error> {
        let ids = match child {
            Some(id) => {
                self.access
                    .require(requester, &id, AccessRequirement::View)
                    .await?;
                vec![id]
            }
            None => visible_children(self.children.as_ref(), requester)
                .await?
                .into_iter()
                .map(|visible| *visible.child.id())
                .collect(),
        };
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.books.list_for_children(&ids).await?)
    }

    async fn get(&self, requester: &Principal, book: &BookId) -> Result<Book, Error> {
        self.authorised_book(requester, book, AccessRequirement::View)
            .await
    }
}
