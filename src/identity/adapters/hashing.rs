//! Argon2id adapter for the password hashing port.
//!
//! Digests use the PHC string format, so the algorithm parameters and salt
//! travel with the hash and verification needs no extra configuration.

use crate::identity::ports::{PasswordHashError, PasswordHasher};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, SaltString};
use argon2::{Algorithm, Argon2, Params, PasswordHasher as _, PasswordVerifier as _, Version};

/// Argon2id password hasher.
pub struct Argon2PasswordHasher {
    argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
    /// Creates a hasher with the crate's default Argon2id parameters.
    #[must_use]
    pub fn new() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }

    /// Creates a hasher with explicit cost parameters.
    ///
    /// `memory_kib` is the memory cost, `iterations` the time cost and
    /// `parallelism` the lane count.
    ///
    /// # Errors
    ///
    /// Returns [`PasswordHashError`] when the parameters are out of range.
    pub fn with_params(
        memory_kib: u32,
        iterations: u32,
        parallelism: u32,
    ) -> Result<Self, PasswordHashError> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(PasswordHashError::new)?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }
}

impl Default for Argon2PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, plaintext: &str) -> Result<String, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        let digest = self
            .argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(PasswordHashError::new)?;
        Ok(digest.to_string())
    }

    fn verify(&self, plaintext: &str, digest: &str) -> Result<bool, PasswordHashError> {
        let parsed = PasswordHash::new(digest).map_err(PasswordHashError::new)?;
        match self.argon2.verify_password(plaintext.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(err) => Err(PasswordHashError::new(err)),
        }
    }
}
