//! Outcome type shared by every rule.

use std::fmt;
use thiserror::Error;

/// Result returned by rule functions.
pub type RuleResult = Result<(), RuleViolation>;

/// Reason a rule rejected an action.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RuleViolation {
    /// The role the decision was based on does not permit the action.
    #[error("'{role}' may not {action}")]
    PermissionDenied {
        /// Global or membership role of the evaluated user.
        role: String,
        /// Attempted action.
        action: String,
    },

    /// A business invariant forbids the action.
    #[error("{0}")]
    InvalidState(String),

    /// The action would break a uniqueness constraint.
    #[error("{0}")]
    Conflict(String),
}

impl RuleViolation {
    /// Builds a [`RuleViolation::PermissionDenied`].
    pub fn denied(role: impl fmt::Display, action: impl Into<String>) -> Self {
        Self::PermissionDenied {
            role: role.to_string(),
            action: action.into(),
        }
    }

    /// Builds a [`RuleViolation::InvalidState`].
    pub fn invalid_state(reason: impl Into<String>) -> Self {
        Self::InvalidState(reason.into())
    }

    /// Builds a [`RuleViolation::Conflict`].
    pub fn conflict(reason: impl Into<String>) -> Self {
        Self::Conflict(reason.into())
    }
}
