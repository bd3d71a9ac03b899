//! Normalized email addresses.

use super::UserDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Email address, trimmed and lowercased.
///
/// Validation is structural only: one `@` with a non-empty local part and a
/// domain containing a dot, and no whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Longest accepted address, in characters.
    pub const MAX_LEN: usize = 320;

    /// Parses and normalizes an email address.
    ///
    /// # Errors
    ///
    /// Returns [`UserDomainError::InvalidEmail`] when the value is not of the
    /// form `local@domain.tld` or is longer than [`Self::MAX_LEN`].
    pub fn new(value: impl AsRef<str>) -> Result<Self, UserDomainError> {
        let raw = value.as_ref();
        let normalized = raw.trim().to_lowercase();
        let invalid = || UserDomainError::InvalidEmail(raw.to_owned());

        if normalized.chars().count() > Self::MAX_LEN
            || normalized.chars().any(char::is_whitespace)
        {
            return Err(invalid());
        }
        let (local, domain) = normalized.split_once('@').ok_or_else(invalid)?;
        let domain_ok = !domain.contains('@')
            && domain
                .split_once('.')
                .is_some_and(|(head, tail)| !head.is_empty() && !tail.is_empty())
            && !domain.ends_with('.');
        if local.is_empty() || !domain_ok {
            return Err(invalid());
        }
        Ok(Self(normalized))
    }

    /// Returns the normalized address.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = UserDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}
