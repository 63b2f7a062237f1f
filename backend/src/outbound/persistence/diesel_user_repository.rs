//! SQLite-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{StoredCredentials, UserRepository, UserRepositoryError};
use crate::domain::{EmailAddress, User, UserId};

use super::diesel_basic_error_mapping::{
    is_unique_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{NewUserRow, UserProfileUpdate, UserRow};
use super::pool::{DbPool, PoolError};
use super::row_mapping::{RowDecodeError, user_from_row};
use super::schema::users;

/// Diesel-backed implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserRepositoryError {
    map_basic_pool_error(error, |message| UserRepositoryError::connection(message))
}

fn map_diesel_error(error: diesel::result::Error) -> UserRepositoryError {
    map_basic_diesel_error(
        error,
        UserRepositoryError::query,
        UserRepositoryError::connection,
    )
}

/// Writes touching `users.email` report a UNIQUE violation as a duplicate.
fn map_write_error(error: diesel::result::Error, email: &str) -> UserRepositoryError {
    if is_unique_violation(&error) {
        UserRepositoryError::duplicate_email(email)
    } else {
        map_diesel_error(error)
    }
}

fn map_decode_error(error: RowDecodeError) -> UserRepositoryError {
    UserRepositoryError::query(error.to_string())
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(&self, user: &User, password_hash: &str) -> Result<(), UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(users::table)
            .values(&NewUserRow::new(user, password_hash))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_write_error(err, user.email().as_ref()))
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .filter(users::id.eq(id.to_string()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(user_from_row).transpose().map_err(map_decode_error)
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(user_from_row).transpose().map_err(map_decode_error)
    }

    async fn find_credentials(
        &self,
        email: &str,
    ) -> Result<Option<StoredCredentials>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .filter(users::email.eq(email))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        let Some(row) = row else {
            return Ok(None);
        };
        let password_hash = row.password_hash.clone();
        let user = user_from_row(row).map_err(map_decode_error)?;
        Ok(Some(StoredCredentials {
            user,
            password_hash,
        }))
    }

    async fn list(&self) -> Result<Vec<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<UserRow> = users::table
            .order((users::created_at.asc(), users::email.asc()))
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter()
            .map(user_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(map_decode_error)
    }

    async fn update_profile(&self, user: &User) -> Result<(), UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(users::table.filter(users::id.eq(user.id().to_string())))
            .set(&UserProfileUpdate::from(user))
            .execute(&mut conn)
            .await
            .map_err(|err| map_write_error(err, user.email().as_ref()))?;
        if updated == 0 {
            return Err(UserRepositoryError::query("record not found"));
        }
        Ok(())
    }

    async fn delete(&self, id: &UserId) -> Result<bool, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(users::table.filter(users::id.eq(id.to_string())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn count(&self) -> Result<u64, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = users::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        u64::try_from(total).map_err(|_| UserRepositoryError::query("negative user count"))
    }
}
