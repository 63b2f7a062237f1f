//! SQLite-backed `BookRepository` implementation using Diesel ORM.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{BookRepository, BookRepositoryError};
use crate::domain::{Book, BookId, ChildId, ReadingPeriod};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{BookRow, BookUpdate, NewBookRow};
use super::pool::{DbPool, PoolError};
use super::row_mapping::{RowDecodeError, book_from_row};
use super::schema::books;

/// Diesel-backed implementation of the book repository port.
#[derive(Clone)]
pub struct DieselBookRepository {
    pool: DbPool,
}

impl DieselBookRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> BookRepositoryError {
    map_basic_pool_error(error, |message| BookRepositoryError::connection(message))
}

fn map_diesel_error(error: diesel::result::Error) -> BookRepositoryError {
    map_basic_diesel_error(
        error,
        BookRepositoryError::query,
        BookRepositoryError::connection,
    )
}

fn map_decode_error(error: RowDecodeError) -> BookRepositoryError {
    BookRepositoryError::query(error.to_string())
}

fn child_keys(ids: &[ChildId]) -> Vec<String> {
    ids.iter().map(ToString::to_string).collect()
}

#[async_trait]
impl BookRepository for DieselBookRepository {
    async fn create(&self, book: &Book) -> Result<(), BookRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(books::table)
            .values(&NewBookRow::from(book))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: &BookId) -> Result<Option<Book>, BookRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = books::table
            .filter(books::id.eq(id.to_string()))
            .select(BookRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(book_from_row).transpose().map_err(map_decode_error)
    }

    async fn update(&self, book: &Book) -> Result<(), BookRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(books::table.filter(books::id.eq(book.id().to_string())))
            .set(&BookUpdate::from(book))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if updated == 0 {
            return Err(BookRepositoryError::query("record not found"));
        }
        Ok(())
    }

    async fn delete(&self, id: &BookId) -> Result<bool, BookRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(books::table.filter(books::id.eq(id.to_string())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn list_for_children(
        &self,
        children: &[ChildId],
    ) -> Result<Vec<Book>, BookRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<BookRow> = books::table
            .filter(books::child_id.eq_any(child_keys(children)))
            .order((books::date_read.desc(), books::created_at.desc()))
            .select(BookRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter()
            .map(book_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(map_decode_error)
    }

    async fn count_for_children(
        &self,
        children: &[ChildId],
        period: Option<ReadingPeriod>,
    ) -> Result<HashMap<ChildId, u64>, BookRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = books::table
            .filter(books::child_id.eq_any(child_keys(children)))
            .group_by(books::child_id)
            .select((books::child_id, count_star()))
            .into_boxed();
        if let Some(period) = period {
            query = query
                .filter(books::date_read.ge(period.start()))
                .filter(books::date_read.lt(period.end()));
        }
        let rows: Vec<(String, i64)> = query.load(&mut conn).await.map_err(map_diesel_error)?;

        rows.into_iter()
            .map(|(child_id, total)| {
                let id = ChildId::new(&child_id)
                    .map_err(|err| BookRepositoryError::query(err.to_string()))?;
                let total = u64::try_from(total)
                    .map_err(|_| BookRepositoryError::query("negative book count"))?;
                Ok((id, total))
            })
            .collect()
    }
}
