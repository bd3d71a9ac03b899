//! Tickets, their comments and their change history.
//!
//! Tickets are numbered per board. Who may open, edit, report or take a
//! ticket depends on the membership role each user holds on that board at
//! the moment of the call.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
