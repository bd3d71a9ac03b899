//! Password hashing port.
//!
//! The algorithm is an adapter concern; services only hash on account
//! creation and verify on behalf of the external identity layer.

use std::sync::Arc;
use thiserror::Error;

/// Hashes and verifies plaintext passwords.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Hashes `plaintext` into a self-describing digest.
    ///
    /// # Errors
    ///
    /// Returns [`PasswordHashError`] when hashing fails.
    fn hash(&self, plaintext: &str) -> Result<String, PasswordHashError>;

    /// Returns `true` when `plaintext` matches `digest`.
    ///
    /// # Errors
    ///
    /// Returns [`PasswordHashError`] when `digest` cannot be parsed.
    fn verify(&self, plaintext: &str, digest: &str) -> Result<bool, PasswordHashError>;
}

/// Failure inside a password hashing adapter.
#[derive(Debug, Clone, Error)]
#[error("password hashing failed: {0}")]
pub struct PasswordHashError(Arc<dyn std::error::Error + Send + Sync>);

impl PasswordHashError {
    /// Wraps an adapter failure.
    pub fn new(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self(Arc::new(err))
    }
}
