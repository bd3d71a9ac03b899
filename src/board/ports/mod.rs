//! Port contracts for boards and memberships.

pub mod repository;

pub use repository::{BoardRepository, BoardRepositoryError, BoardRepositoryResult};
