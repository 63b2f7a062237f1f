//! Response payloads shared by several HTTP handlers.
//!
//! Domain types stay free of serialisation concerns; these DTOs define the
//! camelCase JSON shapes clients see.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{Book, Child, ChildBookCount, PermissionType, User, VisibleChild};

/// Account as returned to clients. Never includes the password hash.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    #[schema(example = "parent@example.com")]
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: *user.id().as_uuid(),
            email: user.email().to_string(),
            first_name: user.first_name().to_string(),
            last_name: user.last_name().to_string(),
            is_admin: user.is_admin(),
            created_at: user.created_at(),
            updated_at: user.updated_at(),
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}

/// Child profile. `isOwner` and `permissionType` describe the caller's
/// access and are present whenever the response was produced for a reader.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChildResponse {
    pub id: Uuid,
    #[schema(example = "Mia")]
    pub name: String,
    #[schema(example = "2nd")]
    pub grade: String,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_owner: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permission_type: Option<PermissionType>,
}

impl From<&Child> for ChildResponse {
    fn from(child: &Child) -> Self {
        Self {
            id: *child.id().as_uuid(),
            name: child.name().to_owned(),
            grade: child.grade().to_owned(),
            owner_id: *child.owner_id().as_uuid(),
            created_at: child.created_at(),
            updated_at: child.updated_at(),
            is_owner: None,
            permission_type: None,
        }
    }
}

impl From<Child> for ChildResponse {
    fn from(child: Child) -> Self {
        Self::from(&child)
    }
}

impl From<&VisibleChild> for ChildResponse {
    fn from(visible: &VisibleChild) -> Self {
        Self {
            is_owner: Some(visible.is_owner),
            permission_type: Some(visible.permission),
            ..Self::from(&visible.child)
        }
    }
}

impl From<VisibleChild> for ChildResponse {
    fn from(visible: VisibleChild) -> Self {
        Self::from(&visible)
    }
}

/// Visible child with the number of books counted for the requested period.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChildWithCountResponse {
    #[serde(flatten)]
    pub child: ChildResponse,
    pub book_count: u64,
}

impl From<ChildBookCount> for ChildWithCountResponse {
    fn from(value: ChildBookCount) -> Self {
        Self {
            child: ChildResponse::from(&value.child),
            book_count: value.book_count,
        }
    }
}

/// Book count for one visible child, keyed by id only.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookCountResponse {
    pub child_id: Uuid,
    pub book_count: u64,
}

impl From<&ChildBookCount> for BookCountResponse {
    fn from(value: &ChildBookCount) -> Self {
        Self {
            child_id: *value.child.child.id().as_uuid(),
            book_count: value.book_count,
        }
    }
}

/// Logged book.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookResponse {
    pub id: Uuid,
    pub child_id: Uuid,
    #[schema(example = "Matilda")]
    pub title: String,
    #[schema(example = "Roald Dahl")]
    pub author: String,
    #[schema(value_type = String, format = Date, example = "2024-03-14")]
    pub date_read: NaiveDate,
    pub isbn: Option<String>,
    pub lexile_level: Option<String>,
    pub is_partial: bool,
    pub partial_comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Book> for BookResponse {
    fn from(book: &Book) -> Self {
        let content = book.content();
        Self {
            id: *book.id().as_uuid(),
            child_id: *book.child_id().as_uuid(),
            title: content.title().to_owned(),
            author: content.author().to_owned(),
            date_read: content.date_read(),
            isbn: content.isbn().map(str::to_owned),
            lexile_level: content.lexile_level().map(str::to_owned),
            is_partial: content.is_partial(),
            partial_comment: content.partial_comment().map(str::to_owned),
            created_at: book.created_at(),
            updated_at: book.updated_at(),
        }
    }
}

impl From<Book> for BookResponse {
    fn from(book: Book) -> Self {
        Self::from(&book)
    }
}

/// Plain `{message}` acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Database reset successfully")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
