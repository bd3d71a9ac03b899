//! Mapping of board failures onto the service error taxonomy.

use crate::board::domain::BoardDomainError;
use crate::board::ports::BoardRepositoryError;
use crate::error::{Entity, ServiceError};

impl From<BoardRepositoryError> for ServiceError {
    fn from(err: BoardRepositoryError) -> Self {
        match err {
            BoardRepositoryError::DuplicateBoardCode(code) => {
                Self::Conflict(format!("board code '{code}' is already in use"))
            }
            BoardRepositoryError::DuplicateMembership { board_id, user_id } => Self::Conflict(
                format!("user {user_id} is already a member of board {board_id}"),
            ),
            BoardRepositoryError::BoardNotFound(id) => Self::not_found(Entity::Board, id),
            BoardRepositoryError::MembershipNotFound(id) => {
                Self::not_found(Entity::Membership, id)
            }
            BoardRepositoryError::Persistence(_) => Self::storage(err),
        }
    }
}

impl From<BoardDomainError> for ServiceError {
    fn from(err: BoardDomainError) -> Self {
        Self::InvalidState(err.to_string())
    }
}
