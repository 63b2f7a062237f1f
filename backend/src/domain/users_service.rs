//! Account administration.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{UserRepository, UserUpdate, UsersCommand, UsersQuery};
use crate::domain::{Error, Principal, User, UserId, UserProfile};

pub(crate) const USER_NOT_FOUND: &str = "User not found";
pub(crate) const ADMIN_REQUIRED: &str = "Admin access required";
pub(crate) const ADMIN_FLAG_RESTRICTED: &str = "Only admins can change admin status";
pub(crate) const EMAIL_IN_USE: &str = "Email is already in use";
pub(crate) const SELF_DELETE: &str = "You cannot delete your own account";

/// Service implementing [`UsersQuery`] and [`UsersCommand`].
pub struct UsersService<U> {
    users: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<U> UsersService<U> {
    /// Create a new service with the given repository.
    pub fn new(users: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self { users, clock }
    }
}

fn require_self_or_admin(requester: &Principal, target: &UserId) -> Result<(), Error> {
    if requester.id() == target || requester.is_admin() {
        Ok(())
    } else {
        Err(Error::forbidden(crate::domain::access::ACCESS_DENIED))
    }
}

fn require_admin(requester: &Principal) -> Result<(), Error> {
    if requester.is_admin() {
        Ok(())
    } else {
        Err(Error::forbidden(ADMIN_REQUIRED))
    }
}

impl<U: UserRepository> UsersService<U> {
    async fn load(&self, id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found(USER_NOT_FOUND))
    }
}

#[async_trait]
impl<U: UserRepository> UsersQuery for UsersService<U> {
    async fn list(&self, requester: &Principal) -> Result<Vec<User>, Error> {
        require_admin(requester)?;
        Ok(self.users.list().await?)
    }

    async fn get(&self, requester: &Principal, target: &UserId) -> Result<User, Error> {
        require_self_or_admin(requester, target)?;
        self.load(target).await
    }
}

#[async_trait]
impl<U: UserRepository> UsersCommand for UsersService<U> {
    async fn update(
        &self,
        requester: &Principal,
        target: &UserId,
        update: UserUpdate,
    ) -> Result<User, Error> {
        require_self_or_admin(requester, target)?;
        let existing = self.load(target).await?;
        let is_admin = update.is_admin.unwrap_or(existing.is_admin());
        if is_admin != existing.is_admin() && !requester.is_admin() {
            return Err(Error::forbidden(ADMIN_FLAG_RESTRICTED));
        }
        let holder = self.users.find_by_email(&update.email).await?;
        if holder.is_some_and(|holder| holder.id() != target) {
            return Err(Error::invalid_request(EMAIL_IN_USE));
        }

        let updated = existing.with_profile(
            UserProfile {
                email: update.email,
                first_name: update.first_name,
                last_name: update.last_name,
                is_admin,
            },
            self.clock.utc(),
        );
        self.users.update_profile(&updated).await?;
        info!(user_id = %target, updated_by = %requester.id(), "user updated");
        Ok(updated)
    }

    async fn delete(&self, requester: &Principal, target: &UserId) -> Result<(), Error> {
        require_admin(requester)?;
        if requester.id() == target {
            return Err(Error::invalid_request(SELF_DELETE));
        }
        if !self.users.delete(target).await? {
            return Err(Error::not_found(USER_NOT_FOUND));
        }
        info!(user_id = %target, deleted_by = %requester.id(), "user deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockUserRepository;
    use crate::domain::test_fixtures::{FixtureClock, fixed_now, principal, user};
    use crate::domain::{EmailAddress, ErrorCode, PersonName};
    use rstest::rstest;

    fn service(users: MockUserRepository) -> UsersService<MockUserRepository> {
        UsersService::new(Arc::new(users), Arc::new(FixtureClock(fixed_now())))
    }

    fn update(email: &str, is_admin: Option<bool>) -> UserUpdate {
        UserUpdate {
            email: EmailAddress::new(email).expect("email"),
            first_name: PersonName::first("Grace").expect("first"),
            last_name: PersonName::last("Hopper").expect("last"),
            is_admin,
        }
    }

    #[rstest]
    #[case(false, Some(ErrorCode::Forbidden))]
    #[case(true, None)]
    #[tokio::test]
    async fn listing_is_admin_only(#[case] admin: bool, #[case] expected: Option<ErrorCode>) {
        let mut users = MockUserRepository::new();
        users
            .expect_list()
            .times(usize::from(admin))
            .returning(|| Ok(Vec::new()));
        let result = service(users).list(&principal(admin)).await;
        assert_eq!(result.err().map(|error| error.code()), expected);
    }

    #[tokio::test]
    async fn non_admin_cannot_promote_themselves() {
        let me = principal(false);
        let stored = me.user().clone();
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .return_once(move |_| Ok(Some(stored)));
        users.expect_update_profile().never();

        let error = service(users)
            .update(&me, me.id(), update("me@x.com", Some(true)))
            .await
            .expect_err("promotion");
        assert_eq!(error.code(), ErrorCode::Forbidden);
        assert_eq!(error.message(), ADMIN_FLAG_RESTRICTED);
    }

    #[tokio::test]
    async fn email_taken_by_someone_else_is_rejected() {
        let me = principal(false);
        let stored = me.user().clone();
        let holder = user("taken@x.com", false);
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .return_once(move |_| Ok(Some(stored)));
        users
            .expect_find_by_email()
            .return_once(move |_| Ok(Some(holder)));

        let error = service(users)
            .update(&me, me.id(), update("taken@x.com", None))
            .await
            .expect_err("taken");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn self_update_keeps_admin_flag() {
        let me = principal(true);
        let stored = me.user().clone();
        let same = me.user().clone();
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .return_once(move |_| Ok(Some(stored)));
        users
            .expect_find_by_email()
            .return_once(move |_| Ok(Some(same)));
        users
            .expect_update_profile()
            .withf(|user| user.is_admin() && user.first_name().as_ref() == "Grace")
            .return_once(|_| Ok(()));

        let email = me.user().email().to_string();
        let updated = service(users)
            .update(&me, me.id(), update(&email, None))
            .await
            .expect("updated");
        assert_eq!(updated.full_name(), "Grace Hopper");
    }

    #[tokio::test]
    async fn admin_cannot_delete_themselves() {
        let admin = principal(true);
        let mut users = MockUserRepository::new();
        users.expect_delete().never();

        let error = service(users)
            .delete(&admin, admin.id())
            .await
            .expect_err("self delete");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn other_users_are_hidden_from_non_admins() {
        let error = service(MockUserRepository::new())
            .get(&principal(false), &UserId::random())
            .await
            .expect_err("forbidden");
        assert_eq!(error.code(), ErrorCode::Forbidden);
    }
}
