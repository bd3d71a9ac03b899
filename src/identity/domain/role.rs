//! Global account roles.

use super::ParseUserRoleError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Global role held by every user account.
///
/// The global role decides which accounts a user may manage and caps the
/// membership roles the user may hold on any board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Unrestricted account. Never assignable through ordinary calls.
    SuperAdmin,
    /// Administrator. Manages every account except super admins.
    Admin,
    /// Support agent.
    Agent,
    /// End customer.
    Customer,
}

impl UserRole {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SuperAdmin => "super_admin",
            Self::Admin => "admin",
            Self::Agent => "agent",
            Self::Customer => "customer",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for UserRole {
    type Error = ParseUserRoleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "super_admin" => Ok(Self::SuperAdmin),
            "admin" => Ok(Self::Admin),
            "agent" => Ok(Self::Agent),
            "customer" => Ok(Self::Customer),
            _ => Err(ParseUserRoleError(value.to_owned())),
        }
    }
}

/// Role accepted from callers when creating or updating an account.
///
/// There is deliberately no super-admin variant; see
/// [`crate::authz::role_matrix::map_role`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignableRole {
    /// Administrator.
    Admin,
    /// Support agent.
    Agent,
    /// End customer.
    Customer,
}
