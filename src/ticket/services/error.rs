//! Mapping of ticket failures onto the service error taxonomy.

use crate::error::{Entity, ServiceError};
use crate::ticket::domain::TicketDomainError;
use crate::ticket::ports::TicketRepositoryError;

impl From<TicketRepositoryError> for ServiceError {
    fn from(err: TicketRepositoryError) -> Self {
        match err {
            TicketRepositoryError::DuplicateNumber { board_id, number } => Self::Conflict(
                format!("ticket number {number} was taken concurrently on board {board_id}"),
            ),
            TicketRepositoryError::TicketNotFound(id) => Self::not_found(Entity::Ticket, id),
            TicketRepositoryError::CommentNotFound(id) => Self::not_found(Entity::Comment, id),
            TicketRepositoryError::Persistence(_) => Self::storage(err),
        }
    }
}

impl From<TicketDomainError> for ServiceError {
    fn from(err: TicketDomainError) -> Self {
        Self::InvalidState(err.to_string())
    }
}
