//! Audit trail of ticket changes.

use super::{HistoryEntryId, ParseHistoryActionError, TicketId};
use crate::identity::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of change recorded in a ticket's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryAction {
    /// The workflow status changed.
    StatusChanged,
    /// The priority changed.
    PriorityChanged,
    /// The assignee was set, replaced or cleared.
    AssigneeChanged,
    /// The reporter changed.
    ReporterChanged,
    /// A comment was posted.
    CommentAdded,
}

impl HistoryAction {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StatusChanged => "status_changed",
            Self::PriorityChanged => "priority_changed",
            Self::AssigneeChanged => "assignee_changed",
            Self::ReporterChanged => "reporter_changed",
            Self::CommentAdded => "comment_added",
        }
    }
}

impl fmt::Display for HistoryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for HistoryAction {
    type Error = ParseHistoryActionError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "status_changed" => Ok(Self::StatusChanged),
            "priority_changed" => Ok(Self::PriorityChanged),
            "assignee_changed" => Ok(Self::AssigneeChanged),
            "reporter_changed" => Ok(Self::ReporterChanged),
            "comment_added" => Ok(Self::CommentAdded),
            _ => Err(ParseHistoryActionError(value.to_owned())),
        }
    }
}

/// One recorded change. Values are stored in their display form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketHistoryEntry {
    id: HistoryEntryId,
    ticket_id: TicketId,
    actor_id: UserId,
    action: HistoryAction,
    old_value: Option<String>,
    new_value: Option<String>,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted history entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedHistoryData {
    /// Persisted identifier.
    pub id: HistoryEntryId,
    /// Persisted ticket.
    pub ticket_id: TicketId,
    /// User who made the change.
    pub actor_id: UserId,
    /// Persisted action.
    pub action: HistoryAction,
    /// Value before the change.
    pub old_value: Option<String>,
    /// Value after the change.
    pub new_value: Option<String>,
    /// Persisted timestamp.
    pub created_at: DateTime<Utc>,
}

impl TicketHistoryEntry {
    /// Records a change from `old_value` to `new_value`.
    #[must_use]
    pub fn record(
        ticket_id: TicketId,
        actor_id: UserId,
        action: HistoryAction,
        old_value: Option<String>,
        new_value: Option<String>,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: HistoryEntryId::new(),
            ticket_id,
            actor_id,
            action,
            old_value,
            new_value,
            created_at: clock.utc(),
        }
    }

    /// Reconstructs an entry from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedHistoryData) -> Self {
        Self {
            id: data.id,
            ticket_id: data.ticket_id,
            actor_id: data.actor_id,
            action: data.action,
            old_value: data.old_value,
            new_value: data.new_value,
            created_at: data.created_at,
        }
    }

    /// Returns the entry identifier.
    #[must_use]
    pub const fn id(&self) -> HistoryEntryId {
        self.id
    }

    /// Returns the ticket.
    #[must_use]
    pub const fn ticket_id(&self) -> TicketId {
        self.ticket_id
    }

    /// Returns the user who made the change.
    #[must_use]
    pub const fn actor_id(&self) -> UserId {
        self.actor_id
    }

    /// Returns the kind of change.
    #[must_use]
    pub const fn action(&self) -> HistoryAction {
        self.action
    }

    /// Returns the value before the change.
    #[must_use]
    pub fn old_value(&self) -> Option<&str> {
        self.old_value.as_deref()
    }

    /// Returns the value after the change.
    #[must_use]
    pub fn new_value(&self) -> Option<&str> {
        self.new_value.as_deref()
    }

    /// Returns when the change happened.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
