//! Books logged against a child.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};

use super::{BookId, ChildId};

pub const TITLE_MAX: usize = 255;
pub const AUTHOR_MAX: usize = 255;
pub const ISBN_MAX: usize = 20;
pub const LEXILE_MAX: usize = 20;
pub const PARTIAL_COMMENT_MAX: usize = 500;

/// Wire format of `dateRead`.
pub const DATE_READ_FORMAT: &str = "%Y-%m-%d";

/// Validation errors for book payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookValidationError {
    Empty { field: &'static str },
    TooLong { field: &'static str, max: usize },
    InvalidDateRead,
}

impl BookValidationError {
    /// Request field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Empty { field } | Self::TooLong { field, .. } => *field,
            Self::InvalidDateRead => "dateRead",
        }
    }

    /// Machine-readable code for the error details.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Empty { .. } => "empty_field",
            Self::TooLong { .. } => "field_too_long",
            Self::InvalidDateRead => "invalid_date",
        }
    }
}

impl fmt::Display for BookValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::TooLong { field, max } => write!(f, "{field} must be at most {max} characters"),
            Self::InvalidDateRead => write!(f, "dateRead must be a date formatted YYYY-MM-DD"),
        }
    }
}

impl std::error::Error for BookValidationError {}

/// Raw book fields as received from a client.
#[derive(Debug, Clone, Copy, Default)]
pub struct BookFields<'a> {
    pub title: &'a str,
    pub author: &'a str,
    pub date_read: &'a str,
    pub isbn: Option<&'a str>,
    pub lexile_level: Option<&'a str>,
    pub is_partial: bool,
    pub partial_comment: Option<&'a str>,
}

/// Validated book content, shared by create and update.
///
/// Optional text fields are trimmed and collapse to `None` when blank. The
/// partial-reading comment is dropped unless the book is marked partial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookDraft {
    title: String,
    author: String,
    date_read: NaiveDate,
    isbn: Option<String>,
    lexile_level: Option<String>,
    is_partial: bool,
    partial_comment: Option<String>,
}

fn required(value: &str, field: &'static str, max: usize) -> Result<String, BookValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(BookValidationError::Empty { field });
    }
    bounded(trimmed, field, max)
}

fn optional(
    value: Option<&str>,
    field: &'static str,
    max: usize,
) -> Result<Option<String>, BookValidationError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(trimmed) => bounded(trimmed, field, max).map(Some),
    }
}

fn bounded(value: &str, field: &'static str, max: usize) -> Result<String, BookValidationError> {
    if value.chars().count() > max {
        return Err(BookValidationError::TooLong { field, max });
    }
    Ok(value.to_owned())
}

impl BookDraft {
    /// Validate raw fields.
    ///
    /// # Examples
    /// ```
    /// use booktracker::domain::{BookDraft, BookFields};
    ///
    /// let draft = BookDraft::try_from_fields(BookFields {
    ///     title: "Matilda",
    ///     author: "Roald Dahl",
    ///     date_read: "2024-03-01",
    ///     ..BookFields::default()
    /// })
    /// .unwrap();
    /// assert_eq!(draft.date_read().to_string(), "2024-03-01");
    /// ```
    pub fn try_from_fields(fields: BookFields<'_>) -> Result<Self, BookValidationError> {
        let title = required(fields.title, "title", TITLE_MAX)?;
        let author = required(fields.author, "author", AUTHOR_MAX)?;
        let date_read = NaiveDate::parse_from_str(fields.date_read.trim(), DATE_READ_FORMAT)
            .map_err(|_| BookValidationError::InvalidDateRead)?;
        let isbn = optional(fields.isbn, "isbn", ISBN_MAX)?;
        let lexile_level = optional(fields.lexile_level, "lexileLevel", LEXILE_MAX)?;
        let partial_comment = if fields.is_partial {
            optional(fields.partial_comment, "partialComment", PARTIAL_COMMENT_MAX)?
        } else {
            None
        };
        Ok(Self {
            title,
            author,
            date_read,
            isbn,
            lexile_level,
            is_partial: fields.is_partial,
            partial_comment,
        })
    }

    /// Rehydrate stored content without re-validating it.
    pub fn restore(
        title: String,
        author: String,
        date_read: NaiveDate,
        isbn: Option<String>,
        lexile_level: Option<String>,
        is_partial: bool,
        partial_comment: Option<String>,
    ) -> Self {
        Self {
            title,
            author,
            date_read,
            isbn,
            lexile_level,
            is_partial,
            partial_comment,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    /// Day the book was finished or put down.
    pub fn date_read(&self) -> NaiveDate {
        self.date_read
    }

    pub fn isbn(&self) -> Option<&str> {
        self.isbn.as_deref()
    }

    pub fn lexile_level(&self) -> Option<&str> {
        self.lexile_level.as_deref()
    }

    /// True when the book was only partly read.
    pub fn is_partial(&self) -> bool {
        self.is_partial
    }

    pub fn partial_comment(&self) -> Option<&str> {
        self.partial_comment.as_deref()
    }
}

/// A book read by a child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    id: BookId,
    child_id: ChildId,
    content: BookDraft,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Book {
    /// Log a new book for `child_id`.
    pub fn new(id: BookId, child_id: ChildId, content: BookDraft, now: DateTime<Utc>) -> Self {
        Self::restore(id, child_id, content, now, now)
    }

    /// Rehydrate a stored book.
    pub fn restore(
        id: BookId,
        child_id: ChildId,
        content: BookDraft,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            child_id,
            content,
            created_at,
            updated_at,
        }
    }

    /// Return a copy with new content and a bumped `updated_at`.
    #[must_use]
    pub fn revised(&self, content: BookDraft, now: DateTime<Utc>) -> Self {
        Self::restore(self.id, self.child_id, content, self.created_at, now)
    }

    /// Stable identifier.
    pub fn id(&self) -> &BookId {
        &self.id
    }

    pub fn child_id(&self) -> &ChildId {
        &self.child_id
    }

    /// User-editable fields.
    pub fn content(&self) -> &BookDraft {
        &self.content
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

/// Half-open date range `[start, end)` used for monthly counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadingPeriod {
    start: NaiveDate,
    end: NaiveDate,
}

/// Rejected month filter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReadingPeriodError {
    #[error("month must be between 1 and 12")]
    InvalidMonth,
    #[error("year is out of range")]
    InvalidYear,
}

impl ReadingPeriod {
    /// Calendar month `year-month`.
    ///
    /// # Examples
    /// ```
    /// use booktracker::domain::ReadingPeriod;
    ///
    /// let december = ReadingPeriod::month(2024, 12).unwrap();
    /// assert_eq!(december.end().to_string(), "2025-01-01");
    /// assert!(ReadingPeriod::month(2024, 13).is_err());
    /// ```
    pub fn month(year: i32, month: u32) -> Result<Self, ReadingPeriodError> {
        if !(1..=12).contains(&month) {
            return Err(ReadingPeriodError::InvalidMonth);
        }
        let start =
            NaiveDate::from_ymd_opt(year, month, 1).ok_or(ReadingPeriodError::InvalidYear)?;
        let (next_year, next_month) = if month == 12 {
            (year.checked_add(1).ok_or(ReadingPeriodError::InvalidYear)?, 1)
        } else {
            (year, month + 1)
        };
        let end = NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .ok_or(ReadingPeriodError::InvalidYear)?;
        Ok(Self { start, end })
    }

    /// First day of the month.
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// First day of the following month; the range is half-open.
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Whether `date` falls inside the period.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn fields<'a>(title: &'a str, author: &'a str, date_read: &'a str) -> BookFields<'a> {
        BookFields {
            title,
            author,
            date_read,
            ..BookFields::default()
        }
    }

    #[rstest]
    #[case(fields(" ", "Dahl", "2024-01-01"), "title", "empty_field")]
    #[case(fields("Matilda", "", "2024-01-01"), "author", "empty_field")]
    #[case(fields("Matilda", "Dahl", "01/02/2024"), "dateRead", "invalid_date")]
    #[case(fields("Matilda", "Dahl", "2024-02-30"), "dateRead", "invalid_date")]
    fn invalid_fields_are_reported(
        #[case] input: BookFields<'_>,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        let err = BookDraft::try_from_fields(input).expect_err("invalid book");
        assert_eq!(err.field(), field);
        assert_eq!(err.code(), code);
    }

    #[rstest]
    fn blank_optionals_collapse_to_none() {
        let draft = BookDraft::try_from_fields(BookFields {
            isbn: Some("  "),
            lexile_level: Some(" 540L "),
            ..fields("Matilda", "Dahl", "2024-01-01")
        })
        .expect("valid book");
        assert_eq!(draft.isbn(), None);
        assert_eq!(draft.lexile_level(), Some("540L"));
    }

    #[rstest]
    #[case(true, Some("chapters 1-4"))]
    #[case(false, None)]
    fn partial_comment_requires_partial_flag(
        #[case] is_partial: bool,
        #[case] expected: Option<&str>,
    ) {
        let draft = BookDraft::try_from_fields(BookFields {
            is_partial,
            partial_comment: Some("chapters 1-4"),
            ..fields("Matilda", "Dahl", "2024-01-01")
        })
        .expect("valid book");
        assert_eq!(draft.partial_comment(), expected);
    }

    #[rstest]
    #[case(0)]
    #[case(13)]
    fn month_out_of_range_is_rejected(#[case] month: u32) {
        assert_eq!(
            ReadingPeriod::month(2024, month),
            Err(ReadingPeriodError::InvalidMonth)
        );
    }

    #[rstest]
    fn period_is_half_open() {
        let feb = ReadingPeriod::month(2024, 2).expect("valid month");
        let date = |s: &str| NaiveDate::parse_from_str(s, DATE_READ_FORMAT).expect("date");
        assert!(feb.contains(date("2024-02-01")));
        assert!(feb.contains(date("2024-02-29")));
        assert!(!feb.contains(date("2024-03-01")));
        assert!(!feb.contains(date("2024-01-31")));
    }
}
