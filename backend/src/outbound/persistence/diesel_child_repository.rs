//! SQLite-backed `ChildRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ChildRepository, ChildRepositoryError, ChildWithGrant};
use crate::domain::{Child, ChildId, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{ChildRow, ChildUpdate, NewChildRow};
use super::pool::{DbPool, PoolError};
use super::row_mapping::{RowDecodeError, child_from_row, permission_type_from_str};
use super::schema::{children, permissions};

/// Diesel-backed implementation of the child repository port.
#[derive(Clone)]
pub struct DieselChildRepository {
    pool: DbPool,
}

impl DieselChildRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ChildRepositoryError {
    map_basic_pool_error(error, |message| ChildRepositoryError::connection(message))
}

fn map_diesel_error(error: diesel::result::Error) -> ChildRepositoryError {
    map_basic_diesel_error(
        error,
        ChildRepositoryError::query,
        ChildRepositoryError::connection,
    )
}

fn map_decode_error(error: RowDecodeError) -> ChildRepositoryError {
    ChildRepositoryError::query(error.to_string())
}

fn row_to_visible(
    (row, grant): (ChildRow, Option<String>),
) -> Result<ChildWithGrant, RowDecodeError> {
    let grant = grant
        .map(|raw| permission_type_from_str("permissions", &row.id, &raw))
        .transpose()?;
    Ok((child_from_row(row)?, grant))
}

#[async_trait]
impl ChildRepository for DieselChildRepository {
    async fn create(&self, child: &Child) -> Result<(), ChildRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(children::table)
            .values(&NewChildRow::from(child))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: &ChildId) -> Result<Option<Child>, ChildRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = children::table
            .filter(children::id.eq(id.to_string()))
            .select(ChildRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(child_from_row).transpose().map_err(map_decode_error)
    }

    async fn update(&self, child: &Child) -> Result<(), ChildRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated =
            diesel::update(children::table.filter(children::id.eq(child.id().to_string())))
                .set(&ChildUpdate::from(child))
                .execute(&mut conn)
                .await
                .map_err(map_diesel_error)?;
        if updated == 0 {
            return Err(ChildRepositoryError::query("record not found"));
        }
        Ok(())
    }

    async fn delete(&self, id: &ChildId) -> Result<bool, ChildRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(children::table.filter(children::id.eq(id.to_string())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn list_visible(
        &self,
        requester: &UserId,
    ) -> Result<Vec<ChildWithGrant>, ChildRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let requester = requester.to_string();

        // (user_id, child_id) is unique, so the join adds at most one row per child.
        let rows: Vec<(ChildRow, Option<String>)> = children::table
            .left_join(
                permissions::table.on(permissions::child_id
                    .eq(children::id)
                    .and(permissions::user_id.eq(&requester))),
            )
            .filter(
                children::owner_id
                    .eq(&requester)
                    .or(permissions::id.is_not_null()),
            )
            .order((children::name.asc(), children::created_at.asc()))
            .select((
                ChildRow::as_select(),
                permissions::permission_type.nullable(),
            ))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter()
            .map(row_to_visible)
            .collect::<Result<Vec<_>, _>>()
            .map_err(map_decode_error)
    }
}
