//! Error types for board domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing board domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BoardDomainError {
    /// The board code is not exactly four ASCII alphanumeric characters.
    #[error("invalid board code '{0}', expected 4 alphanumeric characters")]
    InvalidCode(String),

    /// The board name is empty after trimming.
    #[error("board name must not be empty")]
    EmptyName,

    /// The board name exceeds the stored column width.
    #[error("board name must be at most {max} characters")]
    NameTooLong {
        /// Maximum accepted length in characters.
        max: usize,
    },
}

/// Error returned while parsing board statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown board status: {0}")]
pub struct ParseBoardStatusError(pub String);

/// Error returned while parsing membership roles from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown membership role: {0}")]
pub struct ParseMembershipRoleError(pub String);
