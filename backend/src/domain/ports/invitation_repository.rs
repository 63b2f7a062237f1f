//! Port for pending invitations.
//!
//! Rows are looked up by token fingerprint; the raw token is never stored.

use async_trait::async_trait;

use crate::domain::{PendingInvitation, Permission, User};

use super::define_port_error;

define_port_error! {
    /// Errors raised by invitation repository adapters.
    pub enum InvitationRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "invitation repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "invitation repository query failed: {message}",
        /// The invitee registered through another path first.
        DuplicateEmail { email: String } => "email {email} is already registered",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InvitationRepository: Send + Sync {
    /// Store `invitations`, replacing any pending row for the same email and
    /// child.
    async fn replace_pending(
        &self,
        invitations: &[PendingInvitation],
    ) -> Result<(), InvitationRepositoryError>;

    /// All rows issued under one token, including expired ones.
    async fn find_by_fingerprint(
        &self,
        fingerprint: &str,
    ) -> Result<Vec<PendingInvitation>, InvitationRepositoryError>;

    /// Create `user`, upsert `grants` and delete the rows for `fingerprint`
    /// in one transaction.
    async fn redeem(
        &self,
        fingerprint: &str,
        user: &User,
        password_hash: &str,
        grants: &[Permission],
    ) -> Result<(), InvitationRepositoryError>;
}
