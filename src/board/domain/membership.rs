//! Board membership entity.

use super::{BoardId, MembershipId, MembershipRole};
use crate::identity::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// A user's role on one board. At most one exists per board and user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardMembership {
    id: MembershipId,
    board_id: BoardId,
    user_id: UserId,
    role: MembershipRole,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted membership.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedMembershipData {
    /// Persisted identifier.
    pub id: MembershipId,
    /// Persisted board.
    pub board_id: BoardId,
    /// Persisted member.
    pub user_id: UserId,
    /// Persisted role.
    pub role: MembershipRole,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted last-modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl BoardMembership {
    /// Creates a membership.
    #[must_use]
    pub fn new(
        board_id: BoardId,
        user_id: UserId,
        role: MembershipRole,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            id: MembershipId::new(),
            board_id,
            user_id,
            role,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a membership from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedMembershipData) -> Self {
        Self {
            id: data.id,
            board_id: data.board_id,
            user_id: data.user_id,
            role: data.role,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the membership identifier.
    #[must_use]
    pub const fn id(&self) -> MembershipId {
        self.id
    }

    /// Returns the board.
    #[must_use]
    pub const fn board_id(&self) -> BoardId {
        self.board_id
    }

    /// Returns the member.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the membership role.
    #[must_use]
    pub const fn role(&self) -> MembershipRole {
        self.role
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last-modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Replaces the role.
    pub fn change_role(&mut self, role: MembershipRole, clock: &impl Clock) {
        self.role = role;
        self.updated_at = clock.utc();
    }
}
