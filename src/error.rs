//! Service-level error taxonomy shared by every orchestrator.
//!
//! Rule violations, repository failures and domain validation errors are all
//! folded into [`ServiceError`], which has exactly five kinds. Transport
//! layers map [`ErrorKind`] to status codes; message text is diagnostic only.

use crate::authz::RuleViolation;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Result type returned by service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Coarse classification used for status selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The addressed entity does not exist.
    NotFound,
    /// A uniqueness constraint would be violated.
    Conflict,
    /// The caller's global or membership role does not allow the action.
    PermissionDenied,
    /// A business invariant forbids the action in the current state.
    InvalidState,
    /// Persistence or infrastructure failure.
    Storage,
}

/// Entity addressed by a [`ServiceError::NotFound`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    /// A user account.
    User,
    /// A board.
    Board,
    /// A board membership.
    Membership,
    /// A ticket.
    Ticket,
    /// A ticket comment.
    Comment,
}

impl Entity {
    /// Returns a lowercase display name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Board => "board",
            Self::Membership => "membership",
            Self::Ticket => "ticket",
            Self::Comment => "comment",
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed failure returned by every orchestrator operation.
#[derive(Debug, Clone, Error)]
pub enum ServiceError {
    /// The addressed entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of entity that was looked up.
        entity: Entity,
        /// Identifier that was looked up.
        id: String,
    },

    /// A uniqueness constraint would be violated.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The caller is not allowed to perform the action.
    #[error("permission denied: '{role}' may not {action}")]
    PermissionDenied {
        /// Role (global or membership) the decision was based on.
        role: String,
        /// Action that was attempted.
        action: String,
    },

    /// A business invariant forbids the action.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Persistence failure. The cause is kept for logs but never rendered.
    #[error("storage operation failed")]
    Storage(Arc<dyn std::error::Error + Send + Sync>),
}

impl ServiceError {
    /// Builds a not-found error for the given entity and identifier.
    pub fn not_found(entity: Entity, id: impl fmt::Display) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Builds a permission error carrying the role and attempted action.
    pub fn permission_denied(role: impl fmt::Display, action: impl Into<String>) -> Self {
        Self::PermissionDenied {
            role: role.to_string(),
            action: action.into(),
        }
    }

    /// Wraps a persistence failure, logging the underlying cause.
    pub fn storage(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        tracing::error!(error = %err, "storage operation failed");
        Self::Storage(Arc::new(err))
    }

    /// Returns the coarse kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::PermissionDenied { .. } => ErrorKind::PermissionDenied,
            Self::InvalidState(_) => ErrorKind::InvalidState,
            Self::Storage(_) => ErrorKind::Storage,
        }
    }
}

impl From<RuleViolation> for ServiceError {
    fn from(violation: RuleViolation) -> Self {
        tracing::warn!(%violation, "request rejected by rule");
        match violation {
            RuleViolation::PermissionDenied { role, action } => {
                Self::PermissionDenied { role, action }
            }
            RuleViolation::InvalidState(reason) => Self::InvalidState(reason),
            RuleViolation::Conflict(reason) => Self::Conflict(reason),
        }
    }
}
