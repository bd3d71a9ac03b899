//! In-memory adapters for tickets.

mod ticket;

pub use ticket::InMemoryTicketRepository;
