//! Helpdesk: authorization and orchestration core for support ticketing.
//!
//! Every mutation is gated by two independent axes: the account's global
//! role and the membership role the account holds on the board being
//! touched. Pure rule functions decide; services load state through
//! repository ports, apply the rules and persist the outcome.
//!
//! # Architecture
//!
//! Helpdesk follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (in-memory, `PostgreSQL`,
//!   Argon2)
//!
//! # Modules
//!
//! - [`authz`]: Pure authorization rules
//! - [`identity`]: User accounts and password hashing
//! - [`board`]: Boards, memberships and super-admin synchronization
//! - [`ticket`]: Tickets, comments and change history
//! - [`context`], [`error`], [`paging`]: Types shared by every service
//! - [`config`], [`telemetry`], [`postgres`]: Runtime wiring

pub mod authz;
pub mod board;
pub mod config;
pub mod context;
pub mod error;
pub mod identity;
pub mod paging;
pub mod postgres;
pub mod telemetry;
pub mod ticket;

#[cfg(test)]
mod test_support;
