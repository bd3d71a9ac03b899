//! Ticket workflow statuses and priorities.

use super::{ParseTicketPriorityError, ParseTicketStatusError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Workflow status of a ticket. Any status may follow any other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    /// Not yet triaged.
    #[default]
    Backlog,
    /// Triaged and waiting for work.
    Open,
    /// Being worked on.
    InProgress,
    /// Waiting on something outside the ticket.
    Blocked,
    /// Resolved.
    Closed,
    /// Closed without resolution.
    WontDo,
}

impl TicketStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Backlog => "backlog",
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Blocked => "blocked",
            Self::Closed => "closed",
            Self::WontDo => "wont_do",
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TicketStatus {
    type Error = ParseTicketStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "backlog" => Ok(Self::Backlog),
            "open" => Ok(Self::Open),
            "in_progress" => Ok(Self::InProgress),
            "blocked" => Ok(Self::Blocked),
            "closed" => Ok(Self::Closed),
            "wont_do" => Ok(Self::WontDo),
            _ => Err(ParseTicketStatusError(value.to_owned())),
        }
    }
}

/// Urgency of a ticket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketPriority {
    /// Default priority.
    #[default]
    Low,
    /// Needs attention soon.
    Medium,
    /// Needs attention now.
    High,
    /// Service is impaired.
    Critical,
}

impl TicketPriority {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for TicketPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TicketPriority {
    type Error = ParseTicketPriorityError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            _ => Err(ParseTicketPriorityError(value.to_owned())),
        }
    }
}
