//! UUID-backed identifiers for the aggregates.

use std::fmt;

/// Raised when a string is not a canonical UUID.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} must be a valid UUID")]
pub struct InvalidId {
    kind: &'static str,
}

impl InvalidId {
    /// Human label of the identifier that failed to parse, e.g. `child id`.
    pub fn kind(&self) -> &'static str {
        self.kind
    }
}

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(::uuid::Uuid);

        impl $name {
            /// Parse an identifier, rejecting surrounding whitespace.
            pub fn new(raw: impl AsRef<str>) -> Result<Self, $crate::domain::InvalidId> {
                let raw = raw.as_ref();
                if raw.trim() != raw {
                    return Err($crate::domain::InvalidId { kind: $label });
                }
                ::uuid::Uuid::parse_str(raw)
                    .map(Self)
                    .map_err(|_| $crate::domain::InvalidId { kind: $label })
            }

            /// Generate a new random identifier.
            #[must_use]
            pub fn random() -> Self {
                Self(::uuid::Uuid::new_v4())
            }

            /// Wrap an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: ::uuid::Uuid) -> Self {
                Self(uuid)
            }

            /// Access the underlying UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> &::uuid::Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.hyphenated().fmt(f)
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::domain::InvalidId;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                Self::new(raw).map_err(serde::de::Error::custom)
            }
        }
    };
}

define_id!(
    /// Stable user identifier.
    UserId,
    "user id"
);
define_id!(
    /// Identifier of a child profile.
    ChildId,
    "child id"
);
define_id!(
    /// Identifier of a logged book.
    BookId,
    "book id"
);
define_id!(
    /// Identifier of a sharing grant.
    PermissionId,
    "permission id"
);
define_id!(
    /// Identifier of a pending invitation row.
    InvitationId,
    "invitation id"
);
