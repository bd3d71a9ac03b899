//! `PostgreSQL` adapters for ticket persistence.

mod models;
mod repository;
mod schema;

pub use repository::PostgresTicketRepository;
