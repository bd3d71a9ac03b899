//! Ticket aggregate root.

use super::{TicketDomainError, TicketId, TicketNumber, TicketPriority, TicketStatus};
use crate::board::domain::BoardId;
use crate::identity::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// A unit of support work on a board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    id: TicketId,
    board_id: BoardId,
    number: TicketNumber,
    title: String,
    description: String,
    reporter_id: UserId,
    created_by: UserId,
    assignee_id: Option<UserId>,
    status: TicketStatus,
    priority: TicketPriority,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for opening a ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTicket {
    /// Owning board.
    pub board_id: BoardId,
    /// Sequence number allocated by storage.
    pub number: TicketNumber,
    /// Title; must not be blank.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Creator, who is also the initial reporter.
    pub created_by: UserId,
    /// Initial assignee.
    pub assignee_id: Option<UserId>,
    /// Initial status.
    pub status: TicketStatus,
    /// Initial priority.
    pub priority: TicketPriority,
}

/// Parameter object for reconstructing a persisted ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTicketData {
    /// Persisted identifier.
    pub id: TicketId,
    /// Persisted board.
    pub board_id: BoardId,
    /// Persisted sequence number.
    pub number: TicketNumber,
    /// Persisted title.
    pub title: String,
    /// Persisted description.
    pub description: String,
    /// Persisted reporter.
    pub reporter_id: UserId,
    /// Persisted creator.
    pub created_by: UserId,
    /// Persisted assignee.
    pub assignee_id: Option<UserId>,
    /// Persisted status.
    pub status: TicketStatus,
    /// Persisted priority.
    pub priority: TicketPriority,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted last-modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Ticket {
    /// Longest accepted title, in characters.
    pub const MAX_TITLE_LEN: usize = 255;

    /// Opens a ticket reported by its creator.
    ///
    /// # Errors
    ///
    /// Returns [`TicketDomainError::EmptyTitle`] when the title is blank and
    /// [`TicketDomainError::TitleTooLong`] when it exceeds
    /// [`Self::MAX_TITLE_LEN`].
    pub fn new(input: NewTicket, clock: &impl Clock) -> Result<Self, TicketDomainError> {
        let title = input.title.trim();
        if title.is_empty() {
            return Err(TicketDomainError::EmptyTitle);
        }
        check_title_length(title)?;
        let timestamp = clock.utc();
        Ok(Self {
            id: TicketId::new(),
            board_id: input.board_id,
            number: input.number,
            title: title.to_owned(),
            description: input.description.trim().to_owned(),
            reporter_id: input.created_by,
            created_by: input.created_by,
            assignee_id: input.assignee_id,
            status: input.status,
            priority: input.priority,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a ticket from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTicketData) -> Self {
        Self {
            id: data.id,
            board_id: data.board_id,
            number: data.number,
            title: data.title,
            description: data.description,
            reporter_id: data.reporter_id,
            created_by: data.created_by,
            assignee_id: data.assignee_id,
            status: data.status,
            priority: data.priority,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the ticket identifier.
    #[must_use]
    pub const fn id(&self) -> TicketId {
        self.id
    }

    /// Returns the owning board.
    #[must_use]
    pub const fn board_id(&self) -> BoardId {
        self.board_id
    }

    /// Returns the per-board sequence number.
    #[must_use]
    pub const fn number(&self) -> TicketNumber {
        self.number
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the reporter.
    #[must_use]
    pub const fn reporter_id(&self) -> UserId {
        self.reporter_id
    }

    /// Returns the creator.
    #[must_use]
    pub const fn created_by(&self) -> UserId {
        self.created_by
    }

    /// Returns the assignee, if any.
    #[must_use]
    pub const fn assignee_id(&self) -> Option<UserId> {
        self.assignee_id
    }

    /// Returns the workflow status.
    #[must_use]
    pub const fn status(&self) -> TicketStatus {
        self.status
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> TicketPriority {
        self.priority
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

    /// Replaces the title when `title` is non-blank and different.
    ///
    /// # Errors
    ///
    /// Returns [`TicketDomainError::TitleTooLong`] when the new title
    /// exceeds [`Self::MAX_TITLE_LEN`].
    pub fn retitle(&mut self, title: &str, clock: &impl Clock) -> Result<bool, TicketDomainError> {
        let trimmed = title.trim();
        if trimmed.is_empty() || trimmed == self.title {
            return Ok(false);
        }
        check_title_length(trimmed)?;
        trimmed.clone_into(&mut self.title);
        self.touch(clock);
        Ok(true)
    }

    /// Replaces the description when `description` is non-blank and
    /// different once trimmed.
    pub fn describe(&mut self, description: &str, clock: &impl Clock) -> bool {
        let trimmed = description.trim();
        if trimmed.is_empty() || trimmed == self.description {
            return false;
        }
        trimmed.clone_into(&mut self.description);
        self.touch(clock);
        true
    }

    /// Moves the ticket to `status`. Returns the previous status on change.
    pub fn change_status(
        &mut self,
        status: TicketStatus,
        clock: &impl Clock,
    ) -> Option<TicketStatus> {
        if status == self.status {
            return None;
        }
        let previous = std::mem::replace(&mut self.status, status);
        self.touch(clock);
        Some(previous)
    }

    /// Sets the priority. Returns the previous priority on change.
    pub fn change_priority(
        &mut self,
        priority: TicketPriority,
        clock: &impl Clock,
    ) -> Option<TicketPriority> {
        if priority == self.priority {
            return None;
        }
        let previous = std::mem::replace(&mut self.priority, priority);
        self.touch(clock);
        Some(previous)
    }

    /// Hands the ticket to a new reporter. Returns the previous reporter on
    /// change.
    pub fn change_reporter(&mut self, reporter: UserId, clock: &impl Clock) -> Option<UserId> {
        if reporter == self.reporter_id {
            return None;
        }
        let previous = std::mem::replace(&mut self.reporter_id, reporter);
        self.touch(clock);
        Some(previous)
    }

    /// Assigns the ticket, or clears the assignee with `None`. Returns the
    /// previous assignee on change.
    pub fn assign(
        &mut self,
        assignee: Option<UserId>,
        clock: &impl Clock,
    ) -> Option<Option<UserId>> {
        if assignee == self.assignee_id {
            return None;
        }
        let previous = std::mem::replace(&mut self.assignee_id, assignee);
        self.touch(clock);
        Some(previous)
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

fn check_title_length(title: &str) -> Result<(), TicketDomainError> {
    if title.chars().count() > Ticket::MAX_TITLE_LEN {
        return Err(TicketDomainError::TitleTooLong {
            max: Ticket::MAX_TITLE_LEN,
        });
    }
    Ok(())
}
