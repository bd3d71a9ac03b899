//! Application services for user accounts.

mod accounts;
mod error;

pub use accounts::{CreateUserRequest, UpdateUserRequest, UserService};
