//! Repository port for tickets and everything hanging off them.
//!
//! Comments and history entries share the ticket port so that a change and
//! the history entries describing it are written atomically.

use crate::board::domain::BoardId;
use crate::paging::{Page, PageRequest};
use crate::ticket::domain::{
    CommentId, Ticket, TicketComment, TicketHistoryEntry, TicketId, TicketNumber,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for ticket repository operations.
pub type TicketRepositoryResult<T> = Result<T, TicketRepositoryError>;

/// Ticket persistence contract.
#[async_trait]
pub trait TicketRepository: Send + Sync {
    /// Returns the number the next ticket on `board_id` should use.
    ///
    /// Two concurrent callers may receive the same number; [`Self::store`]
    /// rejects the second insert.
    async fn next_number(&self, board_id: BoardId) -> TicketRepositoryResult<TicketNumber>;

    /// Stores a new ticket.
    ///
    /// # Errors
    ///
    /// Returns [`TicketRepositoryError::DuplicateNumber`] when the board
    /// already has a ticket with the same number.
    async fn store(&self, ticket: &Ticket) -> TicketRepositoryResult<()>;

    /// Persists ticket changes and their history entries in one unit of
    /// work.
    ///
    /// # Errors
    ///
    /// Returns [`TicketRepositoryError::TicketNotFound`] when the ticket does
    /// not exist.
    async fn update(
        &self,
        ticket: &Ticket,
        history: &[TicketHistoryEntry],
    ) -> TicketRepositoryResult<()>;

    /// Finds a ticket on a board. Tickets on other boards are not returned.
    async fn find(
        &self,
        board_id: BoardId,
        ticket_id: TicketId,
    ) -> TicketRepositoryResult<Option<Ticket>>;

    /// Returns one page of a board's tickets ordered by number.
    async fn list(
        &self,
        board_id: BoardId,
        page: PageRequest,
    ) -> TicketRepositoryResult<Page<Ticket>>;

    /// Stores a new comment and its history entry in one unit of work.
    ///
    /// # Errors
    ///
    /// Returns [`TicketRepositoryError::TicketNotFound`] when the ticket does
    /// not exist.
    async fn add_comment(
        &self,
        comment: &TicketComment,
        entry: &TicketHistoryEntry,
    ) -> TicketRepositoryResult<()>;

    /// Persists an edited comment.
    ///
    /// # Errors
    ///
    /// Returns [`TicketRepositoryError::CommentNotFound`] when the comment
    /// does not exist.
    async fn update_comment(&self, comment: &TicketComment) -> TicketRepositoryResult<()>;

    /// Deletes a comment.
    ///
    /// # Errors
    ///
    /// Returns [`TicketRepositoryError::CommentNotFound`] when the comment
    /// does not exist.
    async fn delete_comment(&self, id: CommentId) -> TicketRepositoryResult<()>;

    /// Finds a comment on a ticket. Comments on other tickets are not
    /// returned.
    async fn find_comment(
        &self,
        ticket_id: TicketId,
        comment_id: CommentId,
    ) -> TicketRepositoryResult<Option<TicketComment>>;

    /// Returns one page of a ticket's comments, oldest first.
    async fn list_comments(
        &self,
        ticket_id: TicketId,
        page: PageRequest,
    ) -> TicketRepositoryResult<Page<TicketComment>>;

    /// Returns one page of a ticket's history, oldest first.
    async fn list_history(
        &self,
        ticket_id: TicketId,
        page: PageRequest,
    ) -> TicketRepositoryResult<Page<TicketHistoryEntry>>;
}

/// Errors returned by ticket repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TicketRepositoryError {
    /// The board already has a ticket with this number.
    #[error("ticket number {number} is already used on board {board_id}")]
    DuplicateNumber {
        /// Board identifier.
        board_id: BoardId,
        /// Conflicting number.
        number: TicketNumber,
    },

    /// The ticket was not found.
    #[error("ticket not found: {0}")]
    TicketNotFound(TicketId),

    /// The comment was not found.
    #[error("comment not found: {0}")]
    CommentNotFound(CommentId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TicketRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
