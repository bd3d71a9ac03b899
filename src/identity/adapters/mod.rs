//! Adapter implementations for user account ports.

pub mod hashing;
pub mod memory;
pub mod postgres;
