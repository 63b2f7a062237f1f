//! User accounts.

use std::fmt;

use chrono::{DateTime, Utc};

use super::UserId;

/// Maximum accepted email length.
pub const EMAIL_MAX: usize = 254;
/// Maximum accepted length for first and last names.
pub const PERSON_NAME_MAX: usize = 100;

/// Validation errors for user fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyEmail,
    InvalidEmail,
    EmailTooLong { max: usize },
    EmptyFirstName,
    EmptyLastName,
    NameTooLong { field: &'static str, max: usize },
}

impl UserValidationError {
    /// Request field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyEmail | Self::InvalidEmail | Self::EmailTooLong { .. } => "email",
            Self::EmptyFirstName => "firstName",
            Self::EmptyLastName => "lastName",
            Self::NameTooLong { field, .. } => *field,
        }
    }

    /// Machine-readable code for the error details.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyEmail => "empty_email",
            Self::InvalidEmail => "invalid_email",
            Self::EmailTooLong { .. } => "email_too_long",
            Self::EmptyFirstName => "empty_first_name",
            Self::EmptyLastName => "empty_last_name",
            Self::NameTooLong { .. } => "name_too_long",
        }
    }
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::InvalidEmail => write!(f, "email must be a valid address"),
            Self::EmailTooLong { max } => write!(f, "email must be at most {max} characters"),
            Self::EmptyFirstName => write!(f, "first name must not be empty"),
            Self::EmptyLastName => write!(f, "last name must not be empty"),
            Self::NameTooLong { field, max } => {
                write!(f, "{field} must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Normalised email address (trimmed, lower-cased).
///
/// ## Invariants
/// - exactly one `@` with a non-empty local part;
/// - the domain contains a dot that is neither its first nor last character;
/// - no whitespace.
///
/// # Examples
/// ```
/// use booktracker::domain::EmailAddress;
///
/// let email = EmailAddress::new("  Parent@Example.COM ").unwrap();
/// assert_eq!(email.as_ref(), "parent@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and normalise an email address.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let normalised = raw.as_ref().trim().to_lowercase();
        if normalised.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if normalised.chars().count() > EMAIL_MAX {
            return Err(UserValidationError::EmailTooLong { max: EMAIL_MAX });
        }
        if !is_plausible_email(&normalised) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(normalised))
    }
}

fn is_plausible_email(candidate: &str) -> bool {
    if candidate.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = candidate.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Trimmed, non-empty personal name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonName(String);

impl PersonName {
    /// Validate a first name.
    pub fn first(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Self::parse(raw.as_ref(), "firstName", UserValidationError::EmptyFirstName)
    }

    /// Validate a last name.
    pub fn last(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Self::parse(raw.as_ref(), "lastName", UserValidationError::EmptyLastName)
    }

    fn parse(
        raw: &str,
        field: &'static str,
        empty: UserValidationError,
    ) -> Result<Self, UserValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(empty);
        }
        if trimmed.chars().count() > PERSON_NAME_MAX {
            return Err(UserValidationError::NameTooLong {
                field,
                max: PERSON_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for PersonName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PersonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Registered account without its credential material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    email: EmailAddress,
    first_name: PersonName,
    last_name: PersonName,
    is_admin: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Field bundle for [`User::new`].
#[derive(Debug, Clone)]
pub struct UserProfile {
    pub email: EmailAddress,
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub is_admin: bool,
}

impl User {
    /// Build a freshly registered user stamped with `now`.
    pub fn new(id: UserId, profile: UserProfile, now: DateTime<Utc>) -> Self {
        Self::restore(id, profile, now, now)
    }

    /// Rehydrate a user loaded from storage.
    pub fn restore(
        id: UserId,
        profile: UserProfile,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        let UserProfile {
            email,
            first_name,
            last_name,
            is_admin,
        } = profile;
        Self {
            id,
            email,
            first_name,
            last_name,
            is_admin,
            created_at,
            updated_at,
        }
    }

    /// Return a copy with the profile replaced and `updated_at` bumped.
    #[must_use]
    pub fn with_profile(&self, profile: UserProfile, now: DateTime<Utc>) -> Self {
        Self::restore(self.id, profile, self.created_at, now)
    }

    /// Stable identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Login email.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn first_name(&self) -> &PersonName {
        &self.first_name
    }

    pub fn last_name(&self) -> &PersonName {
        &self.last_name
    }

    /// Full name as shown in invitations.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Whether the user has administrative rights.
    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", UserValidationError::EmptyEmail)]
    #[case("   ", UserValidationError::EmptyEmail)]
    #[case("no-at-sign.example.com", UserValidationError::InvalidEmail)]
    #[case("@example.com", UserValidationError::InvalidEmail)]
    #[case("a@b@example.com", UserValidationError::InvalidEmail)]
    #[case("a@localhost", UserValidationError::InvalidEmail)]
    #[case("a@.example", UserValidationError::InvalidEmail)]
    #[case("a b@example.com", UserValidationError::InvalidEmail)]
    fn invalid_emails_are_rejected(#[case] raw: &str, #[case] expected: UserValidationError) {
        assert_eq!(EmailAddress::new(raw), Err(expected));
    }

    #[rstest]
    fn overlong_email_is_rejected() {
        let raw = format!("{}@example.com", "a".repeat(EMAIL_MAX));
        assert_eq!(
            EmailAddress::new(raw),
            Err(UserValidationError::EmailTooLong { max: EMAIL_MAX })
        );
    }

    #[rstest]
    fn names_are_trimmed_and_bounded() {
        let name = PersonName::first("  Ada ").expect("valid name");
        assert_eq!(name.as_ref(), "Ada");
        assert_eq!(
            PersonName::last(" "),
            Err(UserValidationError::EmptyLastName)
        );
        let err = PersonName::first("x".repeat(PERSON_NAME_MAX + 1)).expect_err("too long");
        assert_eq!(err.field(), "firstName");
        assert_eq!(err.code(), "name_too_long");
    }
}
