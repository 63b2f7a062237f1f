//! Registration, login and session resolution.
//!
//! Login collapses "unknown email" and "wrong password" into one response
//! and spends the same hashing effort on both paths, so the endpoint does
//! not reveal which addresses have accounts.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{
    AuthCommand, ChildRepository, InvitationRepository, PasswordHasher, SessionQuery,
    TokenService, UserRepository,
};
use crate::domain::repository_errors::DUPLICATE_EMAIL_MESSAGE;
use crate::domain::{
    Error, InvitationDetails, InvitationToken, InvitedChild, LoginCredentials, LoginSuccess,
    PendingInvitation, Permission, PermissionId, Principal, Registration, User, UserId,
    UserProfile,
};

pub(crate) const INVALID_CREDENTIALS: &str = "Invalid credentials";
pub(crate) const INVALID_TOKEN: &str = "Invalid or expired token";
pub(crate) const INVALID_INVITATION: &str = "Invalid or expired invitation";
pub(crate) const INVITATION_EMAIL_MISMATCH: &str = "Email does not match invitation";

/// Service implementing [`AuthCommand`] and [`SessionQuery`].
pub struct AuthService<U, I, C, H, T> {
    users: Arc<U>,
    invitations: Arc<I>,
    children: Arc<C>,
    hasher: Arc<H>,
    tokens: Arc<T>,
    clock: Arc<dyn Clock>,
}

impl<U, I, C, H, T> AuthService<U, I, C, H, T> {
    /// Create a new service with the given repositories and credential adapters.
    pub fn new(
        users: Arc<U>,
        invitations: Arc<I>,
        children: Arc<C>,
        hasher: Arc<H>,
        tokens: Arc<T>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            invitations,
            children,
            hasher,
            tokens,
            clock,
        }
    }
}

impl<U, I, C, H, T> AuthService<U, I, C, H, T>
where
    U: UserRepository,
    I: InvitationRepository,
    C: ChildRepository,
    H: PasswordHasher,
    T: TokenService,
{
    /// Unexpired rows issued under `token`; none at all is a 404.
    async fn live_invitations(
        &self,
        token: &InvitationToken,
    ) -> Result<Vec<PendingInvitation>, Error> {
        let now = self.clock.utc();
        let rows: Vec<_> = self
            .invitations
            .find_by_fingerprint(&token.fingerprint())
            .await?
            .into_iter()
            .filter(|row| !row.is_expired(now))
            .collect();
        if rows.is_empty() {
            return Err(Error::not_found(INVALID_INVITATION));
        }
        Ok(rows)
    }

    async fn ensure_email_free(&self, registration: &Registration) -> Result<(), Error> {
        if self
            .users
            .find_by_email(registration.email())
            .await?
            .is_some()
        {
            return Err(Error::invalid_request(DUPLICATE_EMAIL_MESSAGE));
        }
        Ok(())
    }

    fn new_user(registration: &Registration, is_admin: bool, now: DateTime<Utc>) -> User {
        User::new(
            UserId::random(),
            UserProfile {
                email: registration.email().clone(),
                first_name: registration.first_name().clone(),
                last_name: registration.last_name().clone(),
                is_admin,
            },
            now,
        )
    }
}

#[async_trait]
impl<U, I, C, H, T> AuthCommand for AuthService<U, I, C, H, T>
where
    U: UserRepository,
    I: InvitationRepository,
    C: ChildRepository,
    H: PasswordHasher,
    T: TokenService,
{
    async fn register(&self, registration: Registration) -> Result<User, Error> {
        self.ensure_email_free(&registration).await?;
        let is_admin = self.users.count().await? == 0;
        let password_hash = self.hasher.hash(registration.password()).await?;
        let user = Self::new_user(&registration, is_admin, self.clock.utc());
        self.users.create(&user, &password_hash).await?;
        info!(user_id = %user.id(), is_admin, "user registered");
        Ok(user)
    }

    async fn login(&self, credentials: LoginCredentials) -> Result<LoginSuccess, Error> {
        let Some(stored) = self.users.find_credentials(credentials.email()).await? else {
            self.hasher.verify_decoy(credentials.password()).await;
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };
        if !self
            .hasher
            .verify(credentials.password(), &stored.password_hash)
            .await
        {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }
        let token = self.tokens.issue(stored.user.id())?;
        info!(user_id = %stored.user.id(), "user logged in");
        Ok(LoginSuccess {
            token,
            user: stored.user,
        })
    }

    async fn invitation_details(
        &self,
        token: &InvitationToken,
    ) -> Result<InvitationDetails, Error> {
        let rows = self.live_invitations(token).await?;
        let Some(first) = rows.first() else {
            return Err(Error::not_found(INVALID_INVITATION));
        };
        let inviter = self
            .users
            .find_by_id(&first.invited_by)
            .await?
            .ok_or_else(|| Error::not_found(INVALID_INVITATION))?;

        let mut children = Vec::with_capacity(rows.len());
        for row in &rows {
            if let Some(child) = self.children.find_by_id(&row.grant.child_id).await? {
                children.push(InvitedChild {
                    child_id: *child.id(),
                    child_name: child.name().to_owned(),
                    permission_type: row.grant.permission_type,
                });
            }
        }
        Ok(InvitationDetails {
            email: first.email.clone(),
            inviter_name: inviter.full_name(),
            children,
        })
    }

    async fn register_with_invitation(
        &self,
        registration: Registration,
        token: &InvitationToken,
    ) -> Result<User, Error> {
        let rows = self.live_invitations(token).await?;
        if rows.iter().any(|row| &row.email != registration.email()) {
            return Err(Error::invalid_request(INVITATION_EMAIL_MISMATCH));
        }
        self.ensure_email_free(&registration).await?;

        let password_hash = self.hasher.hash(registration.password()).await?;
        let now = self.clock.utc();
        let user = Self::new_user(&registration, false, now);
        let grants: Vec<Permission> = rows
            .iter()
            .map(|row| Permission {
                id: PermissionId::random(),
                user_id: *user.id(),
                child_id: row.grant.child_id,
                permission_type: row.grant.permission_type,
                created_at: now,
            })
            .collect();
        self.invitations
            .redeem(&token.fingerprint(), &user, &password_hash, &grants)
            .await?;
        info!(
            user_id = %user.id(),
            granted = grants.len(),
            "invitation redeemed"
        );
        Ok(user)
    }
}

#[async_trait]
impl<U, I, C, H, T> SessionQuery for AuthService<U, I, C, H, T>
where
    U: UserRepository,
    I: InvitationRepository,
    C: ChildRepository,
    H: PasswordHasher,
    T: TokenService,
{
    async fn authenticate(&self, bearer: &str) -> Result<Principal, Error> {
        let user_id = self
            .tokens
            .verify(bearer)
            .map_err(|_| Error::unauthorized(INVALID_TOKEN))?;
        let user = self
            .users
            .find_by_id(&user_id)
            .await?
            .ok_or_else(|| Error::unauthorized(INVALID_TOKEN))?;
        Ok(Principal::new(user))
    }
}

#[cfg(test)]
#[path = "auth_service_tests.rs"]
mod tests;
