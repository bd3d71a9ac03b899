//! In-memory adapters for boards.

mod board;

pub use board::InMemoryBoardRepository;
