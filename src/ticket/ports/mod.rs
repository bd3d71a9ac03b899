//! Port contracts for tickets, comments and history.

pub mod repository;

pub use repository::{TicketRepository, TicketRepositoryError, TicketRepositoryResult};
