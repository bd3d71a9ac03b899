//! Live membership resolution shared by ticket and comment operations.

use super::TicketService;
use crate::board::{
    domain::{Board, BoardId, BoardMembership},
    ports::BoardRepository,
};
use crate::context::RequestContext;
use crate::error::{Entity, ServiceError, ServiceResult};
use crate::identity::{domain::UserId, ports::UserRepository};
use crate::ticket::{
    domain::{Ticket, TicketId},
    ports::TicketRepository,
};
use mockable::Clock;
use tracing::warn;

/// The requester's standing on a board, read fresh for one call.
pub(super) struct BoardAccess {
    pub(super) membership: BoardMembership,
    pub(super) board: Board,
}

impl<U, B, T, C> TicketService<U, B, T, C>
where
    U: UserRepository,
    B: BoardRepository,
    T: TicketRepository,
    C: Clock + Send + Sync,
{
    /// Resolves the requester's membership and checks that both the
    /// requester and the board are active.
    pub(super) async fn requester_access(
        &self,
        ctx: &RequestContext,
        board_id: BoardId,
    ) -> ServiceResult<BoardAccess> {
        let membership = self
            .live_member(board_id, ctx.user_id(), &format!("access board {board_id}"))
            .await?;
        let board = self.boards.find_board(board_id).await?.ok_or_else(|| {
            warn!(%board_id, "board does not exist");
            ServiceError::not_found(Entity::Board, board_id)
        })?;
        if !board.is_active() {
            warn!(%board_id, "board is inactive");
            return Err(ServiceError::InvalidState(format!(
                "board {} is inactive",
                board.code()
            )));
        }
        Ok(BoardAccess { membership, board })
    }

    /// Resolves the membership of `user_id` and checks the account is
    /// active. Missing memberships and inactive accounts are both
    /// permission failures.
    pub(super) async fn live_member(
        &self,
        board_id: BoardId,
        user_id: UserId,
        action: &str,
    ) -> ServiceResult<BoardMembership> {
        let membership = self
            .boards
            .find_membership(board_id, user_id)
            .await?
            .ok_or_else(|| {
                warn!(%user_id, "user has no membership on board");
                ServiceError::permission_denied("non-member", action)
            })?;
        match self.users.find_by_id(user_id).await? {
            Some(user) if user.is_active() => Ok(membership),
            Some(user) => {
                warn!(%user_id, "user account is inactive");
                Err(ServiceError::permission_denied(user.status(), action))
            }
            None => {
                warn!(%user_id, "member account does not exist");
                Err(ServiceError::permission_denied("unknown user", action))
            }
        }
    }

    pub(super) async fn load_ticket(
        &self,
        board_id: BoardId,
        ticket_id: TicketId,
    ) -> ServiceResult<Ticket> {
        self.tickets
            .find(board_id, ticket_id)
            .await?
            .ok_or_else(|| {
                warn!(%ticket_id, "ticket does not exist on board");
                ServiceError::not_found(Entity::Ticket, ticket_id)
            })
    }
}
