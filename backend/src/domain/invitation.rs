//! Pending invitations for people who do not have an account yet.
//!
//! The raw token only ever leaves the process through the notifier; storage
//! keeps a SHA-256 fingerprint so a leaked table cannot be replayed.

use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use rand::RngCore;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use super::{ChildId, EmailAddress, InvitationId, PermissionType, UserId};

/// Lifetime of an invitation in days.
pub const INVITATION_TTL_DAYS: i64 = 7;

const TOKEN_BYTES: usize = 32;

/// Secret redeemable token sent to an invitee.
#[derive(Clone, PartialEq, Eq)]
pub struct InvitationToken(Zeroizing<String>);

impl InvitationToken {
    /// Generate a token from 32 random bytes, hex encoded.
    pub fn generate() -> Self {
        let mut bytes = Zeroizing::new([0_u8; TOKEN_BYTES]);
        rand::thread_rng().fill_bytes(&mut *bytes);
        Self(Zeroizing::new(hex::encode(&*bytes)))
    }

    /// Wrap a token supplied by a client.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(Zeroizing::new(raw.into()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Storage fingerprint of the token.
    ///
    /// # Examples
    /// ```
    /// use booktracker::domain::InvitationToken;
    ///
    /// let token = InvitationToken::generate();
    /// assert_eq!(token.as_str().len(), 64);
    /// assert_eq!(token.fingerprint(), InvitationToken::from_raw(token.as_str()).fingerprint());
    /// ```
    pub fn fingerprint(&self) -> String {
        hex::encode(Sha256::digest(self.0.as_bytes()))
    }
}

impl fmt::Debug for InvitationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("InvitationToken(..)")
    }
}

/// A child and access level offered in an invitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvitationGrant {
    pub child_id: ChildId,
    pub permission_type: PermissionType,
}

/// One stored invitation row; a request covering several children shares
/// one token across rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingInvitation {
    pub id: InvitationId,
    pub email: EmailAddress,
    pub grant: InvitationGrant,
    pub invited_by: UserId,
    pub token_fingerprint: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl PendingInvitation {
    /// Create a row for `grant` expiring [`INVITATION_TTL_DAYS`] after `now`.
    pub fn issue(
        email: EmailAddress,
        grant: InvitationGrant,
        invited_by: UserId,
        token: &InvitationToken,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: InvitationId::random(),
            email,
            grant,
            invited_by,
            token_fingerprint: token.fingerprint(),
            expires_at: now + TimeDelta::days(INVITATION_TTL_DAYS),
            created_at: now,
        }
    }

    /// True once `now` has reached the expiry instant.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// A child listed in invitation details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvitedChild {
    pub child_id: ChildId,
    pub child_name: String,
    pub permission_type: PermissionType,
}

/// Public summary of an invitation shown before registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvitationDetails {
    pub email: EmailAddress,
    pub inviter_name: String,
    pub children: Vec<InvitedChild>,
}

/// Result of inviting someone to one or more children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InviteOutcome {
    /// The email belongs to an account; permissions were granted directly.
    Granted,
    /// No account exists; a pending invitation was stored.
    Invited,
}
