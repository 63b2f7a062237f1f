//! Integration tests for the Diesel repositories against a temporary SQLite
//! database.
//!
//! Each test migrates a fresh database file through `TestDatabase`, so tests
//! are independent and may run in parallel.

use booktracker::domain::ports::{
    BookRepository, ChildRepository, InvitationRepository, MaintenanceRepository,
    PermissionRepository, UserRepository, UserRepositoryError,
};
use booktracker::domain::{
    Book, BookDraft, BookFields, BookId, Child, ChildDraft, ChildId, EmailAddress,
    InvitationGrant, InvitationToken, PendingInvitation, Permission, PermissionId,
    PermissionType, PersonName, ReadingPeriod, User, UserId, UserProfile,
};
use booktracker::outbound::persistence::{
    DieselBookRepository, DieselChildRepository, DieselInvitationRepository,
    DieselMaintenanceRepository, DieselPermissionRepository, DieselUserRepository,
};
use booktracker::test_support::TestDatabase;
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use rstest::rstest;

fn at(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0)
        .single()
        .expect("valid timestamp")
        + TimeDelta::minutes(minutes)
}

fn user(email: &str) -> User {
    User::new(
        UserId::random(),
        UserProfile {
            email: EmailAddress::new(email).expect("email"),
            first_name: PersonName::first("Grace").expect("first name"),
            last_name: PersonName::last("Hopper").expect("last name"),
            is_admin: false,
        },
        at(0),
    )
}

fn child(owner: &UserId, name: &str) -> Child {
    Child::new(
        ChildId::random(),
        *owner,
        ChildDraft::try_from_parts(name, "3rd").expect("child draft"),
        at(0),
    )
}

fn book(child: &ChildId, title: &str, date_read: &str, minutes: i64) -> Book {
    let draft = BookDraft::try_from_fields(BookFields {
        title,
        author: "Beverly Cleary",
        date_read,
        isbn: Some("9780380709557"),
        ..BookFields::default()
    })
    .expect("book draft");
    Book::new(BookId::random(), *child, draft, at(minutes))
}

fn grant(user: &UserId, child: &ChildId, level: PermissionType) -> Permission {
    Permission {
        id: PermissionId::random(),
        user_id: *user,
        child_id: *child,
        permission_type: level,
        created_at: at(5),
    }
}

struct Repos {
    _db: TestDatabase,
    users: DieselUserRepository,
    children: DieselChildRepository,
    books: DieselBookRepository,
    permissions: DieselPermissionRepository,
    invitations: DieselInvitationRepository,
    maintenance: DieselMaintenanceRepository,
}

async fn repos() -> Repos {
    let db = TestDatabase::new().await;
    Repos {
        users: DieselUserRepository::new(db.pool()),
        children: DieselChildRepository::new(db.pool()),
        books: DieselBookRepository::new(db.pool()),
        permissions: DieselPermissionRepository::new(db.pool()),
        invitations: DieselInvitationRepository::new(db.pool()),
        maintenance: DieselMaintenanceRepository::new(db.pool()),
        _db: db,
    }
}

async fn seeded_user(repos: &Repos, email: &str) -> User {
    let account = user(email);
    repos
        .users
        .create(&account, "$argon2id$stub")
        .await
        .expect("create user");
    account
}

#[rstest]
#[tokio::test]
async fn users_round_trip_with_credentials() {
    let repos = repos().await;
    let account = seeded_user(&repos, "grace@example.com").await;

    let found = repos
        .users
        .find_by_id(account.id())
        .await
        .expect("find by id");
    assert_eq!(found.as_ref(), Some(&account));

    let credentials = repos
        .users
        .find_credentials("grace@example.com")
        .await
        .expect("find credentials")
        .expect("credentials present");
    assert_eq!(credentials.password_hash, "$argon2id$stub");
    assert_eq!(credentials.user, account);
    assert_eq!(repos.users.count().await.expect("count"), 1);
}

#[rstest]
#[tokio::test]
async fn duplicate_emails_are_reported() {
    let repos = repos().await;
    seeded_user(&repos, "grace@example.com").await;

    let err = repos
        .users
        .create(&user("grace@example.com"), "hash")
        .await
        .expect_err("duplicate email");
    assert!(matches!(err, UserRepositoryError::DuplicateEmail { .. }));
}

#[rstest]
#[tokio::test]
async fn deleting_a_user_cascades_to_children_and_books() {
    let repos = repos().await;
    let owner = seeded_user(&repos, "owner@example.com").await;
    let kid = child(owner.id(), "Ramona");
    repos.children.create(&kid).await.expect("create child");
    let entry = book(kid.id(), "Beezus and Ramona", "2024-05-01", 1);
    repos.books.create(&entry).await.expect("create book");

    assert!(repos.users.delete(owner.id()).await.expect("delete user"));

    assert!(repos
        .children
        .find_by_id(kid.id())
        .await
        .expect("find child")
        .is_none());
    assert!(repos
        .books
        .find_by_id(entry.id())
        .await
        .expect("find book")
        .is_none());
}

#[rstest]
#[tokio::test]
async fn visible_children_include_grants_ordered_by_name() {
    let repos = repos().await;
    let owner = seeded_user(&repos, "owner@example.com").await;
    let viewer = seeded_user(&repos, "viewer@example.com").await;
    let zoe = child(owner.id(), "Zoe");
    let abe = child(owner.id(), "Abe");
    let hidden = child(owner.id(), "Hidden");
    for kid in [&zoe, &abe, &hidden] {
        repos.children.create(kid).await.expect("create child");
    }
    repos
        .permissions
        .upsert(&grant(viewer.id(), zoe.id(), PermissionType::View))
        .await
        .expect("grant zoe");
    repos
        .permissions
        .upsert(&grant(viewer.id(), abe.id(), PermissionType::Edit))
        .await
        .expect("grant abe");

    let owned = repos
        .children
        .list_visible(owner.id())
        .await
        .expect("owner listing");
    let names: Vec<&str> = owned.iter().map(|(kid, _)| kid.name()).collect();
    assert_eq!(names, ["Abe", "Hidden", "Zoe"]);
    assert!(owned.iter().all(|(_, level)| level.is_none()));

    let shared = repos
        .children
        .list_visible(viewer.id())
        .await
        .expect("viewer listing");
    assert_eq!(
        shared
            .iter()
            .map(|(kid, level)| (kid.name(), *level))
            .collect::<Vec<_>>(),
        [
            ("Abe", Some(PermissionType::Edit)),
            ("Zoe", Some(PermissionType::View)),
        ]
    );
}

#[rstest]
#[tokio::test]
async fn upserting_a_grant_changes_the_level_in_place() {
    let repos = repos().await;
    let owner = seeded_user(&repos, "owner@example.com").await;
    let viewer = seeded_user(&repos, "viewer@example.com").await;
    let kid = child(owner.id(), "Ramona");
    repos.children.create(&kid).await.expect("create child");

    let first = repos
        .permissions
        .upsert(&grant(viewer.id(), kid.id(), PermissionType::View))
        .await
        .expect("first grant");
    let second = repos
        .permissions
        .upsert(&grant(viewer.id(), kid.id(), PermissionType::Edit))
        .await
        .expect("second grant");

    assert_eq!(first.id, second.id);
    assert_eq!(second.permission_type, PermissionType::Edit);
    let listed = repos
        .permissions
        .list_for_child(kid.id())
        .await
        .expect("list grants");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].grantee.email().to_string(), "viewer@example.com");
    assert_eq!(
        repos
            .permissions
            .find_grant(viewer.id(), kid.id())
            .await
            .expect("find grant"),
        Some(PermissionType::Edit)
    );

    assert!(repos.permissions.delete(&first.id).await.expect("revoke"));
    assert_eq!(
        repos
            .permissions
            .find_grant(viewer.id(), kid.id())
            .await
            .expect("find grant"),
        None
    );
}

#[rstest]
#[tokio::test]
async fn books_are_listed_newest_first_and_counted_per_month() {
    let repos = repos().await;
    let owner = seeded_user(&repos, "owner@example.com").await;
    let kid = child(owner.id(), "Ramona");
    let sibling = child(owner.id(), "Beezus");
    repos.children.create(&kid).await.expect("create child");
    repos.children.create(&sibling).await.expect("create sibling");

    let march_early = book(kid.id(), "Ellen Tebbits", "2024-03-02", 1);
    let march_late = book(kid.id(), "Henry Huggins", "2024-03-31", 2);
    let april = book(kid.id(), "Ribsy", "2024-04-01", 3);
    let sibling_march = book(sibling.id(), "Otis Spofford", "2024-03-10", 4);
    for entry in [&march_early, &march_late, &april, &sibling_march] {
        repos.books.create(entry).await.expect("create book");
    }

    let listed = repos
        .books
        .list_for_children(&[*kid.id()])
        .await
        .expect("list books");
    let titles: Vec<&str> = listed.iter().map(|b| b.content().title()).collect();
    assert_eq!(titles, ["Ribsy", "Henry Huggins", "Ellen Tebbits"]);
    assert_eq!(listed[0].content().isbn(), Some("9780380709557"));

    let children = [*kid.id(), *sibling.id()];
    let march = ReadingPeriod::month(2024, 3).expect("period");
    let counts = repos
        .books
        .count_for_children(&children, Some(march))
        .await
        .expect("count march");
    assert_eq!(counts.get(kid.id()), Some(&2));
    assert_eq!(counts.get(sibling.id()), Some(&1));

    let all_time = repos
        .books
        .count_for_children(&children, None)
        .await
        .expect("count all");
    assert_eq!(all_time.get(kid.id()), Some(&3));

    let empty = ReadingPeriod::month(2023, 12).expect("period");
    assert!(repos
        .books
        .count_for_children(&children, Some(empty))
        .await
        .expect("count december")
        .is_empty());
}

#[rstest]
#[tokio::test]
async fn book_updates_persist_content() {
    let repos = repos().await;
    let owner = seeded_user(&repos, "owner@example.com").await;
    let kid = child(owner.id(), "Ramona");
    repos.children.create(&kid).await.expect("create child");
    let entry = book(kid.id(), "Ribsy", "2024-04-01", 1);
    repos.books.create(&entry).await.expect("create book");

    let draft = BookDraft::try_from_fields(BookFields {
        title: "Ribsy",
        author: "Beverly Cleary",
        date_read: "2024-04-02",
        is_partial: true,
        partial_comment: Some("Stopped at chapter 5"),
        ..BookFields::default()
    })
    .expect("draft");
    let revised = entry.revised(draft, at(30));
    repos.books.update(&revised).await.expect("update");

    let stored = repos
        .books
        .find_by_id(entry.id())
        .await
        .expect("find")
        .expect("present");
    assert_eq!(stored, revised);
    assert_eq!(stored.content().partial_comment(), Some("Stopped at chapter 5"));
}

#[rstest]
#[tokio::test]
async fn invitations_are_replaced_and_redeemed_atomically() {
    let repos = repos().await;
    let owner = seeded_user(&repos, "owner@example.com").await;
    let kid = child(owner.id(), "Ramona");
    repos.children.create(&kid).await.expect("create child");
    let email = EmailAddress::new("aunt@example.com").expect("email");

    let stale_token = InvitationToken::generate();
    let token = InvitationToken::generate();
    let offer = |level: PermissionType, token: &InvitationToken| {
        PendingInvitation::issue(
            email.clone(),
            InvitationGrant {
                child_id: *kid.id(),
                permission_type: level,
            },
            *owner.id(),
            token,
            at(10),
        )
    };
    repos
        .invitations
        .replace_pending(&[offer(PermissionType::View, &stale_token)])
        .await
        .expect("first invite");
    repos
        .invitations
        .replace_pending(&[offer(PermissionType::Edit, &token)])
        .await
        .expect("second invite");

    assert!(repos
        .invitations
        .find_by_fingerprint(&stale_token.fingerprint())
        .await
        .expect("stale lookup")
        .is_empty());
    let pending = repos
        .invitations
        .find_by_fingerprint(&token.fingerprint())
        .await
        .expect("lookup");
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].grant.permission_type, PermissionType::Edit);

    let aunt = user("aunt@example.com");
    repos
        .invitations
        .redeem(
            &token.fingerprint(),
            &aunt,
            "hash",
            &[grant(aunt.id(), kid.id(), PermissionType::Edit)],
        )
        .await
        .expect("redeem");

    assert!(repos
        .invitations
        .find_by_fingerprint(&token.fingerprint())
        .await
        .expect("lookup after redeem")
        .is_empty());
    assert_eq!(
        repos
            .permissions
            .find_grant(aunt.id(), kid.id())
            .await
            .expect("grant"),
        Some(PermissionType::Edit)
    );
}

#[rstest]
#[tokio::test]
async fn redeeming_with_a_taken_email_leaves_the_invitation() {
    let repos = repos().await;
    let owner = seeded_user(&repos, "owner@example.com").await;
    let kid = child(owner.id(), "Ramona");
    repos.children.create(&kid).await.expect("create child");
    let token = InvitationToken::generate();
    let invite = PendingInvitation::issue(
        EmailAddress::new("owner@example.com").expect("email"),
        InvitationGrant {
            child_id: *kid.id(),
            permission_type: PermissionType::View,
        },
        *owner.id(),
        &token,
        at(10),
    );
    repos
        .invitations
        .replace_pending(&[invite])
        .await
        .expect("invite");

    let clash = user("owner@example.com");
    let result = repos
        .invitations
        .redeem(&token.fingerprint(), &clash, "hash", &[])
        .await;
    assert!(result.is_err());
    assert_eq!(
        repos
            .invitations
            .find_by_fingerprint(&token.fingerprint())
            .await
            .expect("lookup")
            .len(),
        1
    );
}

#[rstest]
#[tokio::test]
async fn reset_removes_every_row() {
    let repos = repos().await;
    let owner = seeded_user(&repos, "owner@example.com").await;
    let kid = child(owner.id(), "Ramona");
    repos.children.create(&kid).await.expect("create child");
    repos
        .books
        .create(&book(kid.id(), "Ribsy", "2024-04-01", 1))
        .await
        .expect("create book");

    repos.maintenance.reset_all().await.expect("reset");

    assert_eq!(repos.users.count().await.expect("count"), 0);
    assert!(repos
        .children
        .find_by_id(kid.id())
        .await
        .expect("find child")
        .is_none());
}
