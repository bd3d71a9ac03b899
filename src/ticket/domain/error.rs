//! Error types for ticket domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing ticket domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TicketDomainError {
    /// The ticket title is empty after trimming.
    #[error("ticket title must not be empty")]
    EmptyTitle,

    /// The ticket title exceeds the stored column width.
    #[error("ticket title must be at most {max} characters")]
    TitleTooLong {
        /// Maximum accepted length in characters.
        max: usize,
    },

    /// The comment text is empty after trimming.
    #[error("comment text must not be empty")]
    EmptyComment,

    /// A ticket number was zero or negative.
    #[error("ticket numbers start at 1, got {0}")]
    InvalidNumber(i64),
}

/// Error returned while parsing ticket statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown ticket status: {0}")]
pub struct ParseTicketStatusError(pub String);

/// Error returned while parsing ticket priorities from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown ticket priority: {0}")]
pub struct ParseTicketPriorityError(pub String);

/// Error returned while parsing history actions from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown history action: {0}")]
pub struct ParseHistoryActionError(pub String);
