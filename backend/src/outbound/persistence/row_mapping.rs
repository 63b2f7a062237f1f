//! Conversions from stored rows back into domain values.
//!
//! Stored values were validated on the way in, so a failure here means the
//! database was edited out of band. Repositories surface it as a query error.

use std::fmt::Display;

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::domain::{
    Book, BookDraft, BookId, Child, ChildId, EmailAddress, InvitationGrant, InvitationId,
    PendingInvitation, Permission, PermissionId, PermissionType, PersonName, User, UserId,
    UserProfile,
};

use super::models::{BookRow, ChildRow, PendingInvitationRow, PermissionRow, UserRow};

/// A stored row that no longer satisfies the domain's invariants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("stored {table} row {id} is invalid: {reason}")]
pub(crate) struct RowDecodeError {
    table: &'static str,
    id: String,
    reason: String,
}

fn field<T, E: Display>(
    table: &'static str,
    id: &str,
    value: Result<T, E>,
) -> Result<T, RowDecodeError> {
    value.map_err(|err| RowDecodeError {
        table,
        id: id.to_owned(),
        reason: err.to_string(),
    })
}

fn utc(value: NaiveDateTime) -> DateTime<Utc> {
    value.and_utc()
}

/// Decode a user row into the domain aggregate.
pub(crate) fn user_from_row(row: UserRow) -> Result<User, RowDecodeError> {
    let id = field("users", &row.id, UserId::new(&row.id))?;
    let profile = UserProfile {
        email: field("users", &row.id, EmailAddress::new(&row.email))?,
        first_name: field("users", &row.id, PersonName::first(&row.first_name))?,
        last_name: field("users", &row.id, PersonName::last(&row.last_name))?,
        is_admin: row.is_admin,
    };
    Ok(User::restore(
        id,
        profile,
        utc(row.created_at),
        utc(row.updated_at),
    ))
}

pub(crate) fn child_from_row(row: ChildRow) -> Result<Child, RowDecodeError> {
    let id = field("children", &row.id, ChildId::new(&row.id))?;
    let owner_id = field("children", &row.id, UserId::new(&row.owner_id))?;
    Ok(Child::restore(
        id,
        row.name,
        row.grade,
        owner_id,
        utc(row.created_at),
        utc(row.updated_at),
    ))
}

pub(crate) fn book_from_row(row: BookRow) -> Result<Book, RowDecodeError> {
    let id = field("books", &row.id, BookId::new(&row.id))?;
    let child_id = field("books", &row.id, ChildId::new(&row.child_id))?;
    let content = BookDraft::restore(
        row.title,
        row.author,
        row.date_read,
        row.isbn,
        row.lexile_level,
        row.is_partial,
        row.partial_comment,
    );
    Ok(Book::restore(
        id,
        child_id,
        content,
        utc(row.created_at),
        utc(row.updated_at),
    ))
}

pub(crate) fn permission_type_from_str(
    table: &'static str,
    id: &str,
    raw: &str,
) -> Result<PermissionType, RowDecodeError> {
    field(table, id, raw.parse::<PermissionType>())
}

pub(crate) fn permission_from_row(row: PermissionRow) -> Result<Permission, RowDecodeError> {
    Ok(Permission {
        id: field("permissions", &row.id, PermissionId::new(&row.id))?,
        user_id: field("permissions", &row.id, UserId::new(&row.user_id))?,
        child_id: field("permissions", &row.id, ChildId::new(&row.child_id))?,
        permission_type: permission_type_from_str("permissions", &row.id, &row.permission_type)?,
        created_at: utc(row.created_at),
    })
}

pub(crate) fn invitation_from_row(
    row: PendingInvitationRow,
) -> Result<PendingInvitation, RowDecodeError> {
    const TABLE: &str = "pending_invitations";
    Ok(PendingInvitation {
        id: field(TABLE, &row.id, InvitationId::new(&row.id))?,
        email: field(TABLE, &row.id, EmailAddress::new(&row.email))?,
        grant: InvitationGrant {
            child_id: field(TABLE, &row.id, ChildId::new(&row.child_id))?,
            permission_type: permission_type_from_str(TABLE, &row.id, &row.permission_type)?,
        },
        invited_by: field(TABLE, &row.id, UserId::new(&row.invited_by))?,
        token_fingerprint: row.token_hash,
        expires_at: utc(row.expires_at),
        created_at: utc(row.created_at),
    })
}
