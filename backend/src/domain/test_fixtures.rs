//! Builders shared by domain service tests.

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

use super::{
    Book, BookDraft, BookFields, BookId, Child, ChildDraft, ChildId, EmailAddress, PersonName,
    Principal, User, UserId, UserProfile,
};

pub(crate) struct FixtureClock(pub DateTime<Utc>);

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

pub(crate) fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0)
        .single()
        .expect("valid timestamp")
}

pub(crate) fn user(email: &str, is_admin: bool) -> User {
    User::new(
        UserId::random(),
        UserProfile {
            email: EmailAddress::new(email).expect("email"),
            first_name: PersonName::first("Ada").expect("first name"),
            last_name: PersonName::last("Lovelace").expect("last name"),
            is_admin,
        },
        fixed_now(),
    )
}

pub(crate) fn principal(is_admin: bool) -> Principal {
    let email = format!("{}@example.com", UserId::random());
    Principal::new(user(&email, is_admin))
}

pub(crate) fn child_owned_by(owner: &UserId) -> Child {
    Child::new(
        ChildId::random(),
        *owner,
        ChildDraft::try_from_parts("Mia", "2nd").expect("child draft"),
        fixed_now(),
    )
}

pub(crate) fn book_draft(title: &str, date_read: &str) -> BookDraft {
    BookDraft::try_from_fields(BookFields {
        title,
        author: "Roald Dahl",
        date_read,
        ..BookFields::default()
    })
    .expect("book draft")
}

pub(crate) fn book_for(child: &ChildId, title: &str, date_read: &str) -> Book {
    Book::new(BookId::random(), *child, book_draft(title, date_read), fixed_now())
}
