//! Domain model for boards and their memberships.

mod board;
mod code;
mod error;
mod ids;
mod membership;
mod role;
mod status;

pub use board::{Board, PersistedBoardData};
pub use code::BoardCode;
pub use error::{BoardDomainError, ParseBoardStatusError, ParseMembershipRoleError};
pub use ids::{BoardId, MembershipId};
pub use membership::{BoardMembership, PersistedMembershipData};
pub use role::MembershipRole;
pub use status::BoardStatus;
