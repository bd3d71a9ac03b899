//! Board codes.

use super::BoardDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Globally unique, four-character board code such as `ABCD`.
///
/// Codes are ASCII alphanumeric and stored uppercase, so `abcd` and `ABCD`
/// name the same board.
///
/// # Examples
///
/// ```
/// use helpdesk::board::domain::BoardCode;
///
/// let code = BoardCode::new(" hd01 ").expect("valid code");
/// assert_eq!(code.as_str(), "HD01");
/// assert!(BoardCode::new("TOOLONG").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BoardCode(String);

impl BoardCode {
    /// Required code length.
    pub const LENGTH: usize = 4;

    /// Parses and normalizes a board code.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::InvalidCode`] when the trimmed value is not
    /// exactly [`Self::LENGTH`] ASCII alphanumeric characters.
    pub fn new(value: impl AsRef<str>) -> Result<Self, BoardDomainError> {
        let raw = value.as_ref();
        let trimmed = raw.trim();
        if trimmed.len() != Self::LENGTH || !trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(BoardDomainError::InvalidCode(raw.to_owned()));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// Returns the normalized code.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BoardCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for BoardCode {
    type Error = BoardDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BoardCode> for String {
    fn from(value: BoardCode) -> Self {
        value.0
    }
}
