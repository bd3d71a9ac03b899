//! Ticket comments.

use super::{CommentId, TicketDomainError, TicketId};
use crate::identity::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// A comment left on a ticket by a board member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketComment {
    id: CommentId,
    ticket_id: TicketId,
    author_id: UserId,
    text: String,
    edited: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedCommentData {
    /// Persisted identifier.
    pub id: CommentId,
    /// Persisted ticket.
    pub ticket_id: TicketId,
    /// Persisted author.
    pub author_id: UserId,
    /// Persisted text.
    pub text: String,
    /// Whether the text was changed after posting.
    pub edited: bool,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted last-modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl TicketComment {
    /// Posts a comment.
    ///
    /// # Errors
    ///
    /// Returns [`TicketDomainError::EmptyComment`] when `text` is blank.
    pub fn new(
        ticket_id: TicketId,
        author_id: UserId,
        text: &str,
        clock: &impl Clock,
    ) -> Result<Self, TicketDomainError> {
        let body = non_blank(text)?;
        let timestamp = clock.utc();
        Ok(Self {
            id: CommentId::new(),
            ticket_id,
            author_id,
            text: body,
            edited: false,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a comment from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedCommentData) -> Self {
        Self {
            id: data.id,
            ticket_id: data.ticket_id,
            author_id: data.author_id,
            text: data.text,
            edited: data.edited,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the comment identifier.
    #[must_use]
    pub const fn id(&self) -> CommentId {
        self.id
    }

    /// Returns the ticket the comment belongs to.
    #[must_use]
    pub const fn ticket_id(&self) -> TicketId {
        self.ticket_id
    }

    /// Returns the author.
    #[must_use]
    pub const fn author_id(&self) -> UserId {
        self.author_id
    }

    /// Returns `true` when `user_id` wrote the comment.
    #[must_use]
    pub fn is_authored_by(&self, user_id: UserId) -> bool {
        self.author_id == user_id
    }

    /// Returns the text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns `true` once the text has been edited.
    #[must_use]
    pub const fn edited(&self) -> bool {
        self.edited
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

    /// Replaces the text and marks the comment as edited.
    ///
    /// # Errors
    ///
    /// Returns [`TicketDomainError::EmptyComment`] when `text` is blank.
    pub fn edit(&mut self, text: &str, clock: &impl Clock) -> Result<(), TicketDomainError> {
        self.text = non_blank(text)?;
        self.edited = true;
        self.updated_at = clock.utc();
        Ok(())
    }
}

fn non_blank(text: &str) -> Result<String, TicketDomainError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(TicketDomainError::EmptyComment);
    }
    Ok(trimmed.to_owned())
}
