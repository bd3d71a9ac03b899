//! User accounts and their global roles.
//!
//! Accounts carry the global role axis (SuperAdmin, Admin, Agent, Customer)
//! that gates user management and caps which membership roles a user may
//! hold on a board. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
