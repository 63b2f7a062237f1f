//! Sharing grants and the child access rules.
//!
//! Owners always hold full rights. Other users only reach a child through a
//! [`Permission`] row; EDIT implies VIEW.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{ChildId, PermissionId, User, UserId};

/// Level of access granted on a child.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum PermissionType {
    /// Read the child and their books.
    View,
    /// Read and modify the child and their books.
    Edit,
}

impl PermissionType {
    /// Canonical storage and wire representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::View => "VIEW",
            Self::Edit => "EDIT",
        }
    }

    /// Whether holding `self` satisfies a `required` level.
    ///
    /// # Examples
    /// ```
    /// use booktracker::domain::PermissionType;
    ///
    /// assert!(PermissionType::Edit.satisfies(PermissionType::View));
    /// assert!(!PermissionType::View.satisfies(PermissionType::Edit));
    /// ```
    pub const fn satisfies(self, required: Self) -> bool {
        matches!((self, required), (Self::Edit, _) | (Self::View, Self::View))
    }
}

impl fmt::Display for PermissionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised for strings other than `VIEW` or `EDIT`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("permission type must be VIEW or EDIT")]
pub struct InvalidPermissionType;

impl FromStr for PermissionType {
    type Err = InvalidPermissionType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "VIEW" => Ok(Self::View),
            "EDIT" => Ok(Self::Edit),
            _ => Err(InvalidPermissionType),
        }
    }
}

/// A grant of access on one child to one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permission {
    pub id: PermissionId,
    pub user_id: UserId,
    pub child_id: ChildId,
    pub permission_type: PermissionType,
    pub created_at: DateTime<Utc>,
}

/// A permission together with the grantee's account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionWithGrantee {
    pub permission: Permission,
    pub grantee: User,
}

/// What an operation demands of the requester.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessRequirement {
    View,
    Edit,
    Owner,
}

/// Requester's relationship to a child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildAccess {
    Owner,
    Granted(PermissionType),
    Denied,
}

impl ChildAccess {
    /// Derive access from the child's owner and the requester's grant, if any.
    ///
    /// # Examples
    /// ```
    /// use booktracker::domain::{ChildAccess, PermissionType, UserId};
    ///
    /// let owner = UserId::random();
    /// let other = UserId::random();
    /// assert_eq!(ChildAccess::resolve(&owner, &owner, None), ChildAccess::Owner);
    /// assert_eq!(
    ///     ChildAccess::resolve(&owner, &other, Some(PermissionType::View)),
    ///     ChildAccess::Granted(PermissionType::View)
    /// );
    /// assert_eq!(ChildAccess::resolve(&owner, &other, None), ChildAccess::Denied);
    /// ```
    pub fn resolve(owner: &UserId, requester: &UserId, grant: Option<PermissionType>) -> Self {
        if owner == requester {
            return Self::Owner;
        }
        grant.map_or(Self::Denied, Self::Granted)
    }

    /// Whether this access level satisfies `requirement`.
    pub const fn allows(self, requirement: AccessRequirement) -> bool {
        match (self, requirement) {
            (Self::Owner, _) => true,
            (Self::Granted(held), AccessRequirement::View) => {
                held.satisfies(PermissionType::View)
            }
            (Self::Granted(held), AccessRequirement::Edit) => {
                held.satisfies(PermissionType::Edit)
            }
            (Self::Granted(_), AccessRequirement::Owner) | (Self::Denied, _) => false,
        }
    }

    /// Effective permission, with owners reported as EDIT.
    pub const fn effective(self) -> Option<PermissionType> {
        match self {
            Self::Owner => Some(PermissionType::Edit),
            Self::Granted(held) => Some(held),
            Self::Denied => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ChildAccess::Owner, AccessRequirement::View, true)]
    #[case(ChildAccess::Owner, AccessRequirement::Edit, true)]
    #[case(ChildAccess::Owner, AccessRequirement::Owner, true)]
    #[case(ChildAccess::Granted(PermissionType::Edit), AccessRequirement::View, true)]
    #[case(ChildAccess::Granted(PermissionType::Edit), AccessRequirement::Edit, true)]
    #[case(ChildAccess::Granted(PermissionType::Edit), AccessRequirement::Owner, false)]
    #[case(ChildAccess::Granted(PermissionType::View), AccessRequirement::View, true)]
    #[case(ChildAccess::Granted(PermissionType::View), AccessRequirement::Edit, false)]
    #[case(ChildAccess::Granted(PermissionType::View), AccessRequirement::Owner, false)]
    #[case(ChildAccess::Denied, AccessRequirement::View, false)]
    fn access_matrix(
        #[case] access: ChildAccess,
        #[case] requirement: AccessRequirement,
        #[case] allowed: bool,
    ) {
        assert_eq!(access.allows(requirement), allowed);
    }

    #[rstest]
    fn owner_wins_over_stale_grant() {
        let owner = UserId::random();
        assert_eq!(
            ChildAccess::resolve(&owner, &owner, Some(PermissionType::View)),
            ChildAccess::Owner
        );
    }

    #[rstest]
    #[case("VIEW", Ok(PermissionType::View))]
    #[case("EDIT", Ok(PermissionType::Edit))]
    #[case("view", Err(InvalidPermissionType))]
    #[case("ADMIN", Err(InvalidPermissionType))]
    fn parses_storage_form(
        #[case] raw: &str,
        #[case] expected: Result<PermissionType, InvalidPermissionType>,
    ) {
        assert_eq!(raw.parse::<PermissionType>(), expected);
    }

    #[rstest]
    fn serialises_upper_case() {
        let json = serde_json::to_string(&PermissionType::Edit).expect("serialise");
        assert_eq!(json, "\"EDIT\"");
    }
}
