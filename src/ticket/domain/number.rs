//! Per-board ticket sequence numbers.

use super::TicketDomainError;
use crate::board::domain::BoardCode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of a ticket in its board's sequence, starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketNumber(u32);

impl TicketNumber {
    /// Number of the first ticket on a board.
    pub const FIRST: Self = Self(1);

    /// Wraps a stored number.
    ///
    /// # Errors
    ///
    /// Returns [`TicketDomainError::InvalidNumber`] for values below 1 or
    /// above `u32::MAX`.
    pub fn new(value: i64) -> Result<Self, TicketDomainError> {
        match u32::try_from(value) {
            Ok(number) if number > 0 => Ok(Self(number)),
            _ => Err(TicketDomainError::InvalidNumber(value)),
        }
    }

    /// Returns the number that follows this one, saturating at `u32::MAX`.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Returns the raw number.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Formats the human-facing code, e.g. `SUPP-12`.
    #[must_use]
    pub fn code_on(self, board: &BoardCode) -> String {
        format!("{board}-{}", self.0)
    }
}

impl fmt::Display for TicketNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
