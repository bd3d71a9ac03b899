//! Board aggregate root.

use super::{BoardCode, BoardDomainError, BoardId, BoardStatus};
use crate::identity::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Board aggregate. Tickets and memberships hang off a board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    id: BoardId,
    code: BoardCode,
    name: String,
    description: String,
    created_by: UserId,
    status: BoardStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedBoardData {
    /// Persisted identifier.
    pub id: BoardId,
    /// Persisted code.
    pub code: BoardCode,
    /// Persisted name.
    pub name: String,
    /// Persisted description.
    pub description: String,
    /// Persisted creator.
    pub created_by: UserId,
    /// Persisted status.
    pub status: BoardStatus,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted last-modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Board {
    /// Longest accepted board name, in characters.
    pub const MAX_NAME_LEN: usize = 255;

    /// Creates a new active board.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyName`] when the name is blank and
    /// [`BoardDomainError::NameTooLong`] when it exceeds
    /// [`Self::MAX_NAME_LEN`].
    pub fn new(
        code: BoardCode,
        name: &str,
        description: &str,
        created_by: UserId,
        clock: &impl Clock,
    ) -> Result<Self, BoardDomainError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(BoardDomainError::EmptyName);
        }
        check_name_length(trimmed)?;
        let timestamp = clock.utc();
        Ok(Self {
            id: BoardId::new(),
            code,
            name: trimmed.to_owned(),
            description: description.trim().to_owned(),
            created_by,
            status: BoardStatus::Active,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a board from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedBoardData) -> Self {
        Self {
            id: data.id,
            code: data.code,
            name: data.name,
            description: data.description,
            created_by: data.created_by,
            status: data.status,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the board identifier.
    #[must_use]
    pub const fn id(&self) -> BoardId {
        self.id
    }

    /// Returns the board code.
    #[must_use]
    pub const fn code(&self) -> &BoardCode {
        &self.code
    }

    /// Returns the board name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the board description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the user who created the board.
    #[must_use]
    pub const fn created_by(&self) -> UserId {
        self.created_by
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> BoardStatus {
        self.status
    }

    /// Returns `true` when the board accepts mutations.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.status.is_active()
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

    /// Replaces the name when `name` is non-blank and differs.
    ///
    /// Returns `true` when the board changed.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::NameTooLong`] when the new name exceeds
    /// [`Self::MAX_NAME_LEN`].
    pub fn rename(&mut self, name: &str, clock: &impl Clock) -> Result<bool, BoardDomainError> {
        let trimmed = name.trim();
        if trimmed.is_empty() || trimmed == self.name {
            return Ok(false);
        }
        check_name_length(trimmed)?;
        trimmed.clone_into(&mut self.name);
        self.touch(clock);
        Ok(true)
    }

    /// Replaces the description when `description` is non-blank and differs.
    ///
    /// Returns `true` when the board changed.
    pub fn describe(&mut self, description: &str, clock: &impl Clock) -> bool {
        let trimmed = description.trim();
        if trimmed.is_empty() || trimmed == self.description {
            return false;
        }
        trimmed.clone_into(&mut self.description);
        self.touch(clock);
        true
    }

    /// Moves the board to [`BoardStatus::Inactive`].
    ///
    /// Returns `false` when the board was already inactive.
    pub fn deactivate(&mut self, clock: &impl Clock) -> bool {
        if !self.is_active() {
            return false;
        }
        self.status = BoardStatus::Inactive;
        self.touch(clock);
        true
    }

    /// Moves the board back to [`BoardStatus::Active`].
    ///
    /// Returns `false` when the board was already active.
    pub fn reactivate(&mut self, clock: &impl Clock) -> bool {
        if self.is_active() {
            return false;
        }
        self.status = BoardStatus::Active;
        self.touch(clock);
        true
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

fn check_name_length(name: &str) -> Result<(), BoardDomainError> {
    if name.chars().count() > Board::MAX_NAME_LEN {
        return Err(BoardDomainError::NameTooLong {
            max: Board::MAX_NAME_LEN,
        });
    }
    Ok(())
}
