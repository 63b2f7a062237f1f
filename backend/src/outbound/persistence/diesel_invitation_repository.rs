//! SQLite-backed `InvitationRepository` implementation using Diesel ORM.
//!
//! Redemption creates the account, grants access and consumes the
//! invitation in a single transaction, so a failed step leaves the
//! invitation redeemable.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{InvitationRepository, InvitationRepositoryError};
use crate::domain::{PendingInvitation, Permission, User};

use super::diesel_basic_error_mapping::{
    is_unique_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::diesel_permission_repository::upsert_grant;
use super::models::{NewPendingInvitationRow, NewUserRow, PendingInvitationRow};
use super::pool::{DbPool, PoolError};
use super::row_mapping::invitation_from_row;
use super::schema::{pending_invitations, users};

/// Diesel-backed implementation of the invitation repository port.
#[derive(Clone)]
pub struct DieselInvitationRepository {
    pool: DbPool,
}

impl DieselInvitationRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> InvitationRepositoryError {
    map_basic_pool_error(error, |message| {
        InvitationRepositoryError::connection(message)
    })
}

fn map_diesel_error(error: diesel::result::Error) -> InvitationRepositoryError {
    map_basic_diesel_error(
        error,
        InvitationRepositoryError::query,
        InvitationRepositoryError::connection,
    )
}

#[async_trait]
impl InvitationRepository for DieselInvitationRepository {
    async fn replace_pending(
        &self,
        invitations: &[PendingInvitation],
    ) -> Result<(), InvitationRepositoryError> {
        let rows: Vec<NewPendingInvitationRow<'_>> = invitations
            .iter()
            .map(NewPendingInvitationRow::from)
            .collect();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction(|conn| {
            async move {
                for row in &rows {
                    diesel::insert_into(pending_invitations::table)
                        .values(row)
                        .on_conflict((pending_invitations::email, pending_invitations::child_id))
                        .do_update()
                        .set((
                            pending_invitations::permission_type
                                .eq(excluded(pending_invitations::permission_type)),
                            pending_invitations::invited_by
                                .eq(excluded(pending_invitations::invited_by)),
                            pending_invitations::token_hash
                                .eq(excluded(pending_invitations::token_hash)),
                            pending_invitations::expires_at
                                .eq(excluded(pending_invitations::expires_at)),
                            pending_invitations::created_at
                                .eq(excluded(pending_invitations::created_at)),
                        ))
                        .execute(conn)
                        .await?;
                }
                Ok::<_, diesel::result::Error>(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn find_by_fingerprint(
        &self,
        fingerprint: &str,
    ) -> Result<Vec<PendingInvitation>, InvitationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<PendingInvitationRow> = pending_invitations::table
            .filter(pending_invitations::token_hash.eq(fingerprint))
            .order((
                pending_invitations::created_at.asc(),
                pending_invitations::id.asc(),
            ))
            .select(PendingInvitationRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter()
            .map(invitation_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| InvitationRepositoryError::query(err.to_string()))
    }

    async fn redeem(
        &self,
        fingerprint: &str,
        user: &User,
        password_hash: &str,
        grants: &[Permission],
    ) -> Result<(), InvitationRepositoryError> {
        let new_user = NewUserRow::new(user, password_hash);
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction(|conn| {
            async move {
                diesel::insert_into(users::table)
                    .values(&new_user)
                    .execute(conn)
                    .await?;
                for grant in grants {
                    upsert_grant(conn, grant).await?;
                }
                diesel::delete(
                    pending_invitations::table
                        .filter(pending_invitations::token_hash.eq(fingerprint)),
                )
                .execute(conn)
                .await?;
                Ok::<_, diesel::result::Error>(())
            }
            .scope_boxed()
        })
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                InvitationRepositoryError::duplicate_email(user.email().as_ref())
            } else {
                map_diesel_error(err)
            }
        })
    }
}
