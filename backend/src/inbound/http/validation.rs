//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every helper yields an `invalid_request` error whose details name the
//! offending request field and a machine-readable code.

use std::fmt::Display;
use std::str::FromStr;

use serde_json::json;

use crate::domain::{
    BookValidationError, ChildValidationError, Error, InvalidId, LoginValidationError,
    PermissionType, ReadingPeriod, ReadingPeriodError, RegistrationValidationError,
    UserValidationError,
};

/// Validation error codes raised by the HTTP layer itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidUuid,
    InvalidPermissionType,
    InvalidPeriod,
    EmptyField,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidPermissionType => "invalid_permission_type",
            ErrorCode::InvalidPeriod => "invalid_period",
            ErrorCode::EmptyField => "empty_field",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &'static str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: &'static str,
    message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    fn with_code(self, code: &str) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code,
        }))
    }

    fn with_value(self, code: ErrorCode, value: &str) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value,
            "code": code.as_str(),
        }))
    }
}

/// Domain validation failures that know which request field they concern.
pub(crate) trait FieldViolation: Display {
    fn field(&self) -> &'static str;
    fn code(&self) -> &'static str;
}

macro_rules! field_violation {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl FieldViolation for $ty {
                fn field(&self) -> &'static str {
                    <$ty>::field(self)
                }

                fn code(&self) -> &'static str {
                    <$ty>::code(self)
                }
            }
        )+
    };
}

field_violation!(
    UserValidationError,
    RegistrationValidationError,
    ChildValidationError,
    BookValidationError,
);

/// Convert a domain validation failure into a `400` error.
pub(crate) fn field_error<E: FieldViolation>(err: E) -> Error {
    ValidationError::new(err.field(), err.to_string()).with_code(err.code())
}

pub(crate) fn login_error(err: LoginValidationError) -> Error {
    let field = match err {
        LoginValidationError::EmptyEmail => "email",
        LoginValidationError::EmptyPassword => "password",
    };
    ValidationError::new(field, err.to_string()).with_code(ErrorCode::EmptyField.as_str())
}

pub(crate) fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} must be a valid UUID"))
        .with_value(ErrorCode::InvalidUuid, value)
}

/// Parse an identifier such as `ChildId` from a path or body field.
pub(crate) fn parse_id<T>(value: &str, field: FieldName) -> Result<T, Error>
where
    T: FromStr<Err = InvalidId>,
{
    value.parse().map_err(|_| invalid_uuid_error(field, value))
}

pub(crate) fn parse_permission_type(value: &str, field: FieldName) -> Result<PermissionType, Error> {
    value.parse().map_err(|_| {
        let field = field.as_str();
        ValidationError::new(field, format!("{field} must be VIEW or EDIT"))
            .with_value(ErrorCode::InvalidPermissionType, value)
    })
}

/// Build an optional reporting month; both parts or neither must be given.
pub(crate) fn parse_period(
    year: Option<i32>,
    month: Option<u32>,
) -> Result<Option<ReadingPeriod>, Error> {
    let (year, month) = match (year, month) {
        (None, None) => return Ok(None),
        (Some(year), Some(month)) => (year, month),
        (Some(_), None) => {
            return Err(ValidationError::new("month", "year and month must be supplied together")
                .with_code(ErrorCode::InvalidPeriod.as_str()));
        }
        (None, Some(_)) => {
            return Err(ValidationError::new("year", "year and month must be supplied together")
                .with_code(ErrorCode::InvalidPeriod.as_str()));
        }
    };
    ReadingPeriod::month(year, month).map(Some).map_err(|err| {
        let field = match err {
            ReadingPeriodError::InvalidMonth => "month",
            ReadingPeriodError::InvalidYear => "year",
        };
        ValidationError::new(field, err.to_string()).with_code(ErrorCode::InvalidPeriod.as_str())
    })
}

/// Build a reporting month that must be present.
pub(crate) fn parse_required_period(
    year: Option<i32>,
    month: Option<u32>,
) -> Result<ReadingPeriod, Error> {
    parse_period(year, month)?.ok_or_else(|| {
        ValidationError::new("year", "year and month are required")
            .with_code(ErrorCode::InvalidPeriod.as_str())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ChildId, ErrorCode as DomainCode};
    use rstest::rstest;

    fn details(error: &Error) -> (&str, &str) {
        let details = error.details().expect("details");
        (
            details["field"].as_str().expect("field"),
            details["code"].as_str().expect("code"),
        )
    }

    #[rstest]
    fn domain_violations_keep_field_and_code() {
        let error = field_error(ChildValidationError::EmptyGrade);
        assert_eq!(error.code(), DomainCode::InvalidRequest);
        assert_eq!(error.message(), "grade must not be empty");
        assert_eq!(details(&error), ("grade", "empty_grade"));
    }

    #[rstest]
    fn registration_violations_point_at_the_password() {
        let error = field_error(RegistrationValidationError::PasswordTooShort { min: 6 });
        assert_eq!(details(&error), ("password", "password_too_short"));
    }

    #[rstest]
    #[case(LoginValidationError::EmptyEmail, "email")]
    #[case(LoginValidationError::EmptyPassword, "password")]
    fn login_violations_name_the_field(#[case] err: LoginValidationError, #[case] field: &str) {
        assert_eq!(details(&login_error(err)), (field, "empty_field"));
    }

    #[rstest]
    fn bad_ids_report_the_raw_value() {
        let error = parse_id::<ChildId>("nope", FieldName::new("childId")).expect_err("bad");
        assert_eq!(details(&error), ("childId", "invalid_uuid"));
        assert_eq!(error.details().expect("details")["value"], "nope");
    }

    #[rstest]
    #[case("VIEW", Some(PermissionType::View))]
    #[case("EDIT", Some(PermissionType::Edit))]
    #[case("view", None)]
    #[case("OWNER", None)]
    fn permission_types_are_upper_case(#[case] raw: &str, #[case] expected: Option<PermissionType>) {
        let parsed = parse_permission_type(raw, FieldName::new("permissionType")).ok();
        assert_eq!(parsed, expected);
    }

    #[rstest]
    #[case(None, None, true, false)]
    #[case(Some(2024), Some(3), true, true)]
    #[case(Some(2024), None, false, false)]
    #[case(None, Some(3), false, false)]
    #[case(Some(2024), Some(13), false, false)]
    #[case(Some(2024), Some(0), false, false)]
    fn periods_need_both_parts(
        #[case] year: Option<i32>,
        #[case] month: Option<u32>,
        #[case] ok: bool,
        #[case] bounded: bool,
    ) {
        let result = parse_period(year, month);
        assert_eq!(result.is_ok(), ok);
        if let Ok(period) = result {
            assert_eq!(period.is_some(), bounded);
        }
    }

    #[rstest]
    fn required_periods_reject_an_empty_query() {
        let error = parse_required_period(None, None).expect_err("missing period");
        assert_eq!(details(&error), ("year", "invalid_period"));
        assert!(parse_required_period(Some(2024), Some(2)).is_ok());
    }
}
