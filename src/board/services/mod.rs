//! Application services for boards and memberships.
//!
//! [`BoardService`] operations are split by concern: board lifecycle in
//! `board`, membership management in `membership` and super-admin
//! reconciliation in `sync`.

mod board;
mod error;
mod membership;
mod sync;

pub use board::{BoardService, CreateBoardRequest, UpdateBoardRequest};
pub use membership::CreateMembershipRequest;
pub use sync::SyncReport;
