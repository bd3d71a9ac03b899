//! Application services for tickets and comments.
//!
//! Every [`TicketService`] operation re-reads the requester's membership,
//! account status and board status from storage before acting.

mod access;
mod comments;
mod error;
mod tickets;

pub use tickets::{CreateTicketRequest, TicketService, UpdateTicketRequest};
