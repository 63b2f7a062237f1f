//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions back into domain types live
//! in `row_mapping`.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::{Book, Child, PendingInvitation, Permission, User};

use super::schema::{books, children, pending_invitations, permissions, users};

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct UserRow {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub is_admin: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: String,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub is_admin: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl<'a> NewUserRow<'a> {
    pub(crate) fn new(user: &'a User, password_hash: &'a str) -> Self {
        Self {
            id: user.id().to_string(),
            email: user.email().as_ref(),
            password_hash,
            first_name: user.first_name().as_ref(),
            last_name: user.last_name().as_ref(),
            is_admin: user.is_admin(),
            created_at: user.created_at().naive_utc(),
            updated_at: user.updated_at().naive_utc(),
        }
    }
}

/// Changeset struct for profile edits.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserProfileUpdate<'a> {
    pub email: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub is_admin: bool,
    pub updated_at: NaiveDateTime,
}

impl<'a> From<&'a User> for UserProfileUpdate<'a> {
    fn from(user: &'a User) -> Self {
        Self {
            email: user.email().as_ref(),
            first_name: user.first_name().as_ref(),
            last_name: user.last_name().as_ref(),
            is_admin: user.is_admin(),
            updated_at: user.updated_at().naive_utc(),
        }
    }
}

// ---------------------------------------------------------------------------
// Children
// ---------------------------------------------------------------------------

/// Row struct for reading from the children table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = children)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct ChildRow {
    pub id: String,
    pub name: String,
    pub grade: String,
    pub owner_id: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = children)]
pub(crate) struct NewChildRow<'a> {
    pub id: String,
    pub name: &'a str,
    pub grade: &'a str,
    pub owner_id: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl<'a> From<&'a Child> for NewChildRow<'a> {
    fn from(child: &'a Child) -> Self {
        Self {
            id: child.id().to_string(),
            name: child.name(),
            grade: child.grade(),
            owner_id: child.owner_id().to_string(),
            created_at: child.created_at().naive_utc(),
            updated_at: child.updated_at().naive_utc(),
        }
    }
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = children)]
pub(crate) struct ChildUpdate<'a> {
    pub name: &'a str,
    pub grade: &'a str,
    pub updated_at: NaiveDateTime,
}

impl<'a> From<&'a Child> for ChildUpdate<'a> {
    fn from(child: &'a Child) -> Self {
        Self {
            name: child.name(),
            grade: child.grade(),
            updated_at: child.updated_at().naive_utc(),
        }
    }
}

// ---------------------------------------------------------------------------
// Books
// ---------------------------------------------------------------------------

/// Row struct for reading from the books table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = books)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct BookRow {
    pub id: String,
    pub title: String,
    pub author: String,
    pub date_read: NaiveDate,
    pub child_id: String,
    pub isbn: Option<String>,
    pub lexile_level: Option<String>,
    pub is_partial: bool,
    pub partial_comment: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = books)]
pub(crate) struct NewBookRow<'a> {
    pub id: String,
    pub title: &'a str,
    pub author: &'a str,
    pub date_read: NaiveDate,
    pub child_id: String,
    pub isbn: Option<&'a str>,
    pub lexile_level: Option<&'a str>,
    pub is_partial: bool,
    pub partial_comment: Option<&'a str>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl<'a> From<&'a Book> for NewBookRow<'a> {
    fn from(book: &'a Book) -> Self {
        let content = book.content();
        Self {
            id: book.id().to_string(),
            title: content.title(),
            author: content.author(),
            date_read: content.date_read(),
            child_id: book.child_id().to_string(),
            isbn: content.isbn(),
            lexile_level: content.lexile_level(),
            is_partial: content.is_partial(),
            partial_comment: content.partial_comment(),
            created_at: book.created_at().naive_utc(),
            updated_at: book.updated_at().naive_utc(),
        }
    }
}

/// Full replacement of a book's content; cleared optional fields become NULL.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = books)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct BookUpdate<'a> {
    pub title: &'a str,
    pub author: &'a str,
    pub date_read: NaiveDate,
    pub isbn: Option<&'a str>,
    pub lexile_level: Option<&'a str>,
    pub is_partial: bool,
    pub partial_comment: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

impl<'a> From<&'a Book> for BookUpdate<'a> {
    fn from(book: &'a Book) -> Self {
        let content = book.content();
        Self {
            title: content.title(),
            author: content.author(),
            date_read: content.date_read(),
            isbn: content.isbn(),
            lexile_level: content.lexile_level(),
            is_partial: content.is_partial(),
            partial_comment: content.partial_comment(),
            updated_at: book.updated_at().naive_utc(),
        }
    }
}

// ---------------------------------------------------------------------------
// Permissions
// ---------------------------------------------------------------------------

/// Row struct for reading from the permissions table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = permissions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct PermissionRow {
    pub id: String,
    pub user_id: String,
    pub child_id: String,
    pub permission_type: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = permissions)]
pub(crate) struct NewPermissionRow {
    pub id: String,
    pub user_id: String,
    pub child_id: String,
    pub permission_type: &'static str,
    pub created_at: NaiveDateTime,
}

impl From<&Permission> for NewPermissionRow {
    fn from(permission: &Permission) -> Self {
        Self {
            id: permission.id.to_string(),
            user_id: permission.user_id.to_string(),
            child_id: permission.child_id.to_string(),
            permission_type: permission.permission_type.as_str(),
            created_at: permission.created_at.naive_utc(),
        }
    }
}

// ---------------------------------------------------------------------------
// Pending invitations
// ---------------------------------------------------------------------------

/// Row struct for reading from the pending_invitations table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = pending_invitations)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct PendingInvitationRow {
    pub id: String,
    pub email: String,
    pub child_id: String,
    pub permission_type: String,
    pub invited_by: String,
    pub token_hash: String,
    pub expires_at: NaiveDateTime,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = pending_invitations)]
pub(crate) struct NewPendingInvitationRow<'a> {
    pub id: String,
    pub email: &'a str,
    pub child_id: String,
    pub permission_type: &'static str,
    pub invited_by: String,
    pub token_hash: &'a str,
    pub expires_at: NaiveDateTime,
    pub created_at: NaiveDateTime,
}

impl<'a> From<&'a PendingInvitation> for NewPendingInvitationRow<'a> {
    fn from(invitation: &'a PendingInvitation) -> Self {
        Self {
            id: invitation.id.to_string(),
            email: invitation.email.as_ref(),
            child_id: invitation.grant.child_id.to_string(),
            permission_type: invitation.grant.permission_type.as_str(),
            invited_by: invitation.invited_by.to_string(),
            token_hash: &invitation.token_fingerprint,
            expires_at: invitation.expires_at.naive_utc(),
            created_at: invitation.created_at.naive_utc(),
        }
    }
}
