//! Reading reports across every child visible to the requester.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::children_service::visible_children;
use crate::domain::ports::{
    BookRepository, ChildReport, ChildRepository, ReadingReport, ReportsQuery,
};
use crate::domain::{Book, ChildId, Error, Principal};

/// Service implementing [`ReportsQuery`].
pub struct ReportsService<C, B> {
    children: Arc<C>,
    books: Arc<B>,
}

impl<C, B> ReportsService<C, B> {
    /// Create a new service with the given repositories.
    pub fn new(children: Arc<C>, books: Arc<B>) -> Self {
        Self { children, books }
    }
}

#[async_trait]
impl<C, B> ReportsQuery for ReportsService<C, B>
where
    C: ChildRepository,
    B: BookRepository,
{
    async fn my_books(&self, requester: &Principal) -> Result<ReadingReport, Error> {
        let visible = visible_children(self.children.as_ref(), requester).await?;
        if visible.is_empty() {
            return Ok(ReadingReport::default());
        }
        let ids: Vec<ChildId> = visible.iter().map(|entry| *entry.child.id()).collect();

        let mut by_child: HashMap<ChildId, Vec<Book>> = HashMap::new();
        for book in self.books.list_for_children(&ids).await? {
            by_child.entry(*book.child_id()).or_default().push(book);
        }
        let children = visible
            .into_iter()
            .map(|child| ChildReport {
                books: by_child.remove(child.child.id()).unwrap_or_default(),
                child,
            })
            .collect();
        Ok(ReadingReport { children })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockBookRepository, MockChildRepository};
    use crate::domain::test_fixtures::{book_for, child_owned_by, principal};

    #[tokio::test]
    async fn books_are_grouped_per_child_in_order() {
        let me = principal(false);
        let first = child_owned_by(me.id());
        let second = child_owned_by(me.id());
        let books = vec![
            book_for(first.id(), "Matilda", "2025-02-01"),
            book_for(first.id(), "The BFG", "2025-01-01"),
        ];
        let mut children = MockChildRepository::new();
        children
            .expect_list_visible()
            .return_once(move |_| Ok(vec![(first, None), (second, None)]));
        let mut repo = MockBookRepository::new();
        repo.expect_list_for_children()
            .return_once(move |_| Ok(books));

        let report = ReportsService::new(Arc::new(children), Arc::new(repo))
            .my_books(&me)
            .await
            .expect("report");
        assert_eq!(report.children.len(), 2);
        let titles: Vec<_> = report.children[0]
            .books
            .iter()
            .map(|book| book.content().title().to_owned())
            .collect();
        assert_eq!(titles, ["Matilda", "The BFG"]);
        assert!(report.children[1].books.is_empty());
    }

    #[tokio::test]
    async fn no_children_means_empty_report() {
        let mut children = MockChildRepository::new();
        children.expect_list_visible().return_once(|_| Ok(Vec::new()));
        let mut repo = MockBookRepository::new();
        repo.expect_list_for_children().never();

        let report = ReportsService::new(Arc::new(children), Arc::new(repo))
            .my_books(&principal(false))
            .await
            .expect("report");
        assert!(report.children.is_empty());
    }
}
