//! Invitation delivery through structured logs.
//!
//! No mail transport is configured; the registration link is written to the
//! log at `info` so an operator can forward it.

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{InvitationNotifier, NotifierError};
use crate::domain::{EmailAddress, InvitationToken, User};

/// Notifier that logs the registration link for each invitation.
#[derive(Debug, Clone)]
pub struct TracingInvitationNotifier {
    frontend_url: String,
}

impl TracingInvitationNotifier {
    /// `frontend_url` is the origin serving the registration page.
    pub fn new(frontend_url: impl Into<String>) -> Self {
        Self {
            frontend_url: frontend_url.into(),
        }
    }

    /// Registration link carrying `token`.
    pub fn registration_link(&self, token: &InvitationToken) -> String {
        format!(
            "{}/register?invitation={}",
            self.frontend_url.trim_end_matches('/'),
            token.as_str()
        )
    }
}

#[async_trait]
impl InvitationNotifier for TracingInvitationNotifier {
    async fn invitation_created(
        &self,
        email: &EmailAddress,
        inviter: &User,
        token: &InvitationToken,
    ) -> Result<(), NotifierError> {
        info!(
            invitee = %email,
            inviter = %inviter.full_name(),
            link = %self.registration_link(token),
            "invitation link issued"
        );
        Ok(())
    }
}
