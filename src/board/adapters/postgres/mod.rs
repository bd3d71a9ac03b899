//! `PostgreSQL` adapters for board and membership persistence.

mod models;
mod repository;
mod schema;

pub use repository::PostgresBoardRepository;
