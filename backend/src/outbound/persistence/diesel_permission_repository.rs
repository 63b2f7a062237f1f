//! SQLite-backed `PermissionRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;
use diesel::upsert::excluded;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{PermissionRepository, PermissionRepositoryError};
use crate::domain::{ChildId, Permission, PermissionId, PermissionType, PermissionWithGrantee, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewPermissionRow, PermissionRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::row_mapping::{
    RowDecodeError, permission_from_row, permission_type_from_str, user_from_row,
};
use super::schema::{permissions, users};

/// Diesel-backed implementation of the permission repository port.
#[derive(Clone)]
pub struct DieselPermissionRepository {
    pool: DbPool,
}

impl DieselPermissionRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> PermissionRepositoryError {
    map_basic_pool_error(error, |message| {
        PermissionRepositoryError::connection(message)
    })
}

fn map_diesel_error(error: diesel::result::Error) -> PermissionRepositoryError {
    map_basic_diesel_error(
        error,
        PermissionRepositoryError::query,
        PermissionRepositoryError::connection,
    )
}

fn map_decode_error(error: RowDecodeError) -> PermissionRepositoryError {
    PermissionRepositoryError::query(error.to_string())
}

/// Insert a grant or change the level of the existing one for the same user
/// and child. The existing row keeps its id and `created_at`.
pub(super) async fn upsert_grant<C>(conn: &mut C, permission: &Permission) -> QueryResult<usize>
where
    C: AsyncConnection<Backend = Sqlite> + Send,
{
    diesel::insert_into(permissions::table)
        .values(NewPermissionRow::from(permission))
        .on_conflict((permissions::user_id, permissions::child_id))
        .do_update()
        .set(permissions::permission_type.eq(excluded(permissions::permission_type)))
        .execute(conn)
        .await
}

#[async_trait]
impl PermissionRepository for DieselPermissionRepository {
    async fn find_grant(
        &self,
        user: &UserId,
        child: &ChildId,
    ) -> Result<Option<PermissionType>, PermissionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let raw: Option<String> = permissions::table
            .filter(permissions::user_id.eq(user.to_string()))
            .filter(permissions::child_id.eq(child.to_string()))
            .select(permissions::permission_type)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        raw.map(|raw| permission_type_from_str("permissions", &child.to_string(), &raw))
            .transpose()
            .map_err(map_decode_error)
    }

    async fn upsert(
        &self,
        permission: &Permission,
    ) -> Result<Permission, PermissionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let grant = permission.clone();
        let row = conn
            .transaction(|conn| {
                async move {
                    upsert_grant(conn, &grant).await?;
                    permissions::table
                        .filter(permissions::user_id.eq(grant.user_id.to_string()))
                        .filter(permissions::child_id.eq(grant.child_id.to_string()))
                        .select(PermissionRow::as_select())
                        .first::<PermissionRow>(conn)
                        .await
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;
        permission_from_row(row).map_err(map_decode_error)
    }

    async fn find_by_id(
        &self,
        id: &PermissionId,
    ) -> Result<Option<Permission>, PermissionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = permissions::table
            .filter(permissions::id.eq(id.to_string()))
            .select(PermissionRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(permission_from_row)
            .transpose()
            .map_err(map_decode_error)
    }

    async fn list_for_child(
        &self,
        child: &ChildId,
    ) -> Result<Vec<PermissionWithGrantee>, PermissionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<(PermissionRow, UserRow)> = permissions::table
            .inner_join(users::table)
            .filter(permissions::child_id.eq(child.to_string()))
            .order((permissions::created_at.asc(), permissions::id.asc()))
            .select((PermissionRow::as_select(), UserRow::as_select()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter()
            .map(|(permission, grantee)| {
                Ok(PermissionWithGrantee {
                    permission: permission_from_row(permission)?,
                    grantee: user_from_row(grantee)?,
                })
            })
            .collect::<Result<Vec<_>, RowDecodeError>>()
            .map_err(map_decode_error)
    }

    async fn delete(&self, id: &PermissionId) -> Result<bool, PermissionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(permissions::table.filter(permissions::id.eq(id.to_string())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}
