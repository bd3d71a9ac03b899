//! Per-board membership roles.

use super::ParseMembershipRoleError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role a user holds on one board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipRole {
    /// Read-only access.
    Viewer,
    /// May create and edit tickets and moderate comments.
    Editor,
    /// May create and edit tickets and be assigned to them.
    Agent,
    /// Full control over the board and its memberships.
    Owner,
}

impl MembershipRole {
    /// Every membership role, lowest privilege first.
    pub const ALL: [Self; 4] = [Self::Viewer, Self::Editor, Self::Agent, Self::Owner];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Viewer => "viewer",
            Self::Editor => "editor",
            Self::Agent => "agent",
            Self::Owner => "owner",
        }
    }

    /// Returns `true` for [`MembershipRole::Owner`].
    #[must_use]
    pub const fn is_owner(self) -> bool {
        matches!(self, Self::Owner)
    }
}

impl fmt::Display for MembershipRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for MembershipRole {
    type Error = ParseMembershipRoleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "viewer" => Ok(Self::Viewer),
            "editor" => Ok(Self::Editor),
            "agent" => Ok(Self::Agent),
            "owner" => Ok(Self::Owner),
            _ => Err(ParseMembershipRoleError(value.to_owned())),
        }
    }
}
