//! Error types for user domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing user domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserDomainError {
    /// The email address is not of the form `local@domain`.
    #[error("invalid email address '{0}'")]
    InvalidEmail(String),

    /// The full name is empty after trimming.
    #[error("full name must not be empty")]
    EmptyFullName,

    /// The full name exceeds the stored column width.
    #[error("full name must be at most {max} characters")]
    FullNameTooLong {
        /// Maximum accepted length in characters.
        max: usize,
    },

    /// The password is empty.
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Error returned while parsing a global role from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown user role: {0}")]
pub struct ParseUserRoleError(pub String);

/// Error returned while parsing a user status from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown user status: {0}")]
pub struct ParseUserStatusError(pub String);
