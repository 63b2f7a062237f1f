//! Driving port for registration and login.
//!
//! Inbound adapters hand over already validated values; the port decides
//! account existence, admin bootstrap and invitation redemption.

use async_trait::async_trait;

use crate::domain::{
    Error, InvitationDetails, InvitationToken, LoginCredentials, LoginSuccess, Registration, User,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthCommand: Send + Sync {
    /// Create an account. The first account ever registered is an admin.
    async fn register(&self, registration: Registration) -> Result<User, Error>;

    /// Check credentials and issue a session token.
    async fn login(&self, credentials: LoginCredentials) -> Result<LoginSuccess, Error>;

    /// Describe an unexpired invitation before the invitee registers.
    async fn invitation_details(&self, token: &InvitationToken)
    -> Result<InvitationDetails, Error>;

    /// Register the invitee and grant every child listed in the invitation.
    async fn register_with_invitation(
        &self,
        registration: Registration,
        token: &InvitationToken,
    ) -> Result<User, Error>;
}
