//! Child profiles whose reading is tracked.

use std::fmt;

use chrono::{DateTime, Utc};

use super::{ChildId, PermissionType, UserId};

/// Maximum length of a child's name.
pub const CHILD_NAME_MAX: usize = 100;
/// Maximum length of a grade label.
pub const GRADE_MAX: usize = 50;

/// Validation errors for child payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChildValidationError {
    EmptyName,
    NameTooLong { max: usize },
    EmptyGrade,
    GradeTooLong { max: usize },
}

impl ChildValidationError {
    /// Request field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyName | Self::NameTooLong { .. } => "name",
            Self::EmptyGrade | Self::GradeTooLong { .. } => "grade",
        }
    }

    /// Machine-readable code for the error details.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyName => "empty_name",
            Self::NameTooLong { .. } => "name_too_long",
            Self::EmptyGrade => "empty_grade",
            Self::GradeTooLong { .. } => "grade_too_long",
        }
    }
}

impl fmt::Display for ChildValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::NameTooLong { max } => write!(f, "name must be at most {max} characters"),
            Self::EmptyGrade => write!(f, "grade must not be empty"),
            Self::GradeTooLong { max } => write!(f, "grade must be at most {max} characters"),
        }
    }
}

impl std::error::Error for ChildValidationError {}

/// Validated name and grade for creating or updating a child.
///
/// # Examples
/// ```
/// use booktracker::domain::ChildDraft;
///
/// let draft = ChildDraft::try_from_parts(" Mia ", "3rd").unwrap();
/// assert_eq!(draft.name(), "Mia");
/// assert!(ChildDraft::try_from_parts("", "3rd").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildDraft {
    name: String,
    grade: String,
}

impl ChildDraft {
    /// Validate raw request values.
    pub fn try_from_parts(name: &str, grade: &str) -> Result<Self, ChildValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ChildValidationError::EmptyName);
        }
        if name.chars().count() > CHILD_NAME_MAX {
            return Err(ChildValidationError::NameTooLong {
                max: CHILD_NAME_MAX,
            });
        }
        let grade = grade.trim();
        if grade.is_empty() {
            return Err(ChildValidationError::EmptyGrade);
        }
        if grade.chars().count() > GRADE_MAX {
            return Err(ChildValidationError::GradeTooLong { max: GRADE_MAX });
        }
        Ok(Self {
            name: name.to_owned(),
            grade: grade.to_owned(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn grade(&self) -> &str {
        &self.grade
    }
}

/// A child profile owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Child {
    id: ChildId,
    name: String,
    grade: String,
    owner_id: UserId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Child {
    /// Create a new child owned by `owner_id`.
    pub fn new(id: ChildId, owner_id: UserId, draft: ChildDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name,
            grade: draft.grade,
            owner_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rehydrate a stored child. Values are trusted as already validated.
    pub fn restore(
        id: ChildId,
        name: String,
        grade: String,
        owner_id: UserId,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            grade,
            owner_id,
            created_at,
            updated_at,
        }
    }

    /// Return a copy carrying the draft's values.
    #[must_use]
    pub fn revised(&self, draft: ChildDraft, now: DateTime<Utc>) -> Self {
        Self {
            name: draft.name,
            grade: draft.grade,
            updated_at: now,
            ..self.clone()
        }
    }

    /// Stable identifier.
    pub fn id(&self) -> &ChildId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn grade(&self) -> &str {
        &self.grade
    }

    /// User who created the child.
    pub fn owner_id(&self) -> &UserId {
        &self.owner_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

/// A child as seen by a particular requester.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleChild {
    pub child: Child,
    /// Whether the requester owns the child.
    pub is_owner: bool,
    /// Effective permission; owners report [`PermissionType::Edit`].
    pub permission: PermissionType,
}

/// A visible child paired with the number of books counted for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildBookCount {
    pub child: VisibleChild,
    pub book_count: u64,
}
