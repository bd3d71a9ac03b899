//! Port contracts for user accounts.

pub mod password;
pub mod repository;

pub use password::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use password::MockPasswordHasher;
pub use repository::{UserFilter, UserRepository, UserRepositoryError, UserRepositoryResult};
