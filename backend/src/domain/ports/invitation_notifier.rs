//! Port for telling invitees about a pending invitation.

use async_trait::async_trait;

use crate::domain::{EmailAddress, InvitationToken, User};

use super::define_port_error;

define_port_error! {
    /// Delivery failures reported by notifier adapters.
    pub enum NotifierError {
        Delivery { message: String } => "invitation delivery failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InvitationNotifier: Send + Sync {
    /// Deliver `token` to `email` on behalf of `inviter`.
    async fn invitation_created(
        &self,
        email: &EmailAddress,
        inviter: &User,
        token: &InvitationToken,
    ) -> Result<(), NotifierError>;
}
