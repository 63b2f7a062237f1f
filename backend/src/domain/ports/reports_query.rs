//! Driving port for reading reports.

use async_trait::async_trait;

use crate::domain::{Book, Error, Principal, VisibleChild};

/// Books read by one child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildReport {
    pub child: VisibleChild,
    pub books: Vec<Book>,
}

/// Report over every child visible to the requester.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadingReport {
    pub children: Vec<ChildReport>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReportsQuery: Send + Sync {
    async fn my_books(&self, requester: &Principal) -> Result<ReadingReport, Error>;
}
