//! Authentication primitives: login credentials and registration input.
//!
//! Handlers convert raw request payloads through these constructors before
//! they reach a service, so services only ever see validated values.

use std::fmt;

use zeroize::Zeroizing;

use super::{EmailAddress, PersonName, UserId, UserValidationError};

/// Minimum password length accepted at registration.
pub const PASSWORD_MIN: usize = 6;

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Email was missing or blank once trimmed.
    EmptyEmail,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials.
///
/// ## Invariants
/// - `email` is trimmed, lower-cased and non-empty. It is not checked for
///   shape so a malformed address simply fails authentication.
/// - `password` is non-empty and keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use booktracker::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" A@X.com ", "pw123456").unwrap();
/// assert_eq!(creds.email(), "a@x.com");
/// assert_eq!(creds.password(), "pw123456");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalised = email.trim().to_lowercase();
        if normalised.is_empty() {
            return Err(LoginValidationError::EmptyEmail);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            email: normalised,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email used for the account lookup.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validation errors for registration payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationValidationError {
    /// A profile field failed validation.
    Profile(UserValidationError),
    /// The password is shorter than [`PASSWORD_MIN`].
    PasswordTooShort { min: usize },
}

impl RegistrationValidationError {
    /// Request field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Profile(inner) => inner.field(),
            Self::PasswordTooShort { .. } => "password",
        }
    }

    /// Machine-readable code for the error details.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Profile(inner) => inner.code(),
            Self::PasswordTooShort { .. } => "password_too_short",
        }
    }
}

impl fmt::Display for RegistrationValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Profile(inner) => inner.fmt(f),
            Self::PasswordTooShort { min } => {
                write!(f, "password must be at least {min} characters")
            }
        }
    }
}

impl std::error::Error for RegistrationValidationError {}

impl From<UserValidationError> for RegistrationValidationError {
    fn from(value: UserValidationError) -> Self {
        Self::Profile(value)
    }
}

/// Validated registration input.
#[derive(Debug, Clone)]
pub struct Registration {
    email: EmailAddress,
    password: Zeroizing<String>,
    first_name: PersonName,
    last_name: PersonName,
}

impl Registration {
    /// Validate raw registration fields.
    ///
    /// # Examples
    /// ```
    /// use booktracker::domain::Registration;
    ///
    /// let reg = Registration::try_from_parts("a@x.com", "pw123456", "A", "B").unwrap();
    /// assert_eq!(reg.email().as_ref(), "a@x.com");
    /// assert!(Registration::try_from_parts("a@x.com", "short", "A", "B").is_err());
    /// ```
    pub fn try_from_parts(
        email: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<Self, RegistrationValidationError> {
        let email = EmailAddress::new(email)?;
        if password.chars().count() < PASSWORD_MIN {
            return Err(RegistrationValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
            first_name: PersonName::first(first_name)?,
            last_name: PersonName::last(last_name)?,
        })
    }

    /// Normalised email address.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Plain-text password as submitted.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    /// Validated given name.
    pub fn first_name(&self) -> &PersonName {
        &self.first_name
    }

    /// Validated family name.
    pub fn last_name(&self) -> &PersonName {
        &self.last_name
    }
}

/// Signed bearer token handed to a client after login.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(Zeroizing<String>);

impl AccessToken {
    /// Wrap an encoded token.
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(Zeroizing::new(encoded.into()))
    }

    /// Encoded token string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(..)")
    }
}

/// Outcome of a successful login.
#[derive(Debug, Clone)]
pub struct LoginSuccess {
    pub token: AccessToken,
    pub user: super::User,
}

/// Authenticated principal resolved from a bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    user: super::User,
}

impl Principal {
    /// Wrap an authenticated user.
    pub fn new(user: super::User) -> Self {
        Self { user }
    }

    /// Authenticated user.
    pub fn user(&self) -> &super::User {
        &self.user
    }

    pub fn id(&self) -> &UserId {
        self.user.id()
    }

    /// Whether the principal bypasses ownership checks.
    pub fn is_admin(&self) -> bool {
        self.user.is_admin()
    }
}
