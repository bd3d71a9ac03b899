//! Comment orchestration on tickets.

use super::TicketService;
use crate::authz::comment_rules::{can_delete, can_edit};
use crate::board::{domain::BoardId, ports::BoardRepository};
use crate::context::RequestContext;
use crate::error::{Entity, ServiceError, ServiceResult};
use crate::identity::ports::UserRepository;
use crate::paging::{Page, PageRequest};
use crate::ticket::{
    domain::{CommentId, HistoryAction, TicketComment, TicketHistoryEntry, TicketId},
    ports::TicketRepository,
};
use mockable::Clock;
use tracing::{info, instrument, warn};

impl<U, B, T, C> TicketService<U, B, T, C>
where
    U: UserRepository,
    B: BoardRepository,
    T: TicketRepository,
    C: Clock + Send + Sync,
{
    /// Posts a comment on a ticket. Any active member may comment.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] when the ticket is not on the
    /// board and [`ServiceError::InvalidState`] for blank text.
    #[instrument(skip_all, fields(request_id = %ctx.request_id(), requester = %ctx.user_id(), board_id = %board_id, ticket_id = %ticket_id))]
    pub async fn add_comment(
        &self,
        ctx: &RequestContext,
        board_id: BoardId,
        ticket_id: TicketId,
        text: &str,
    ) -> ServiceResult<TicketComment> {
        self.requester_access(ctx, board_id).await?;
        self.load_ticket(board_id, ticket_id).await?;

        let comment = TicketComment::new(ticket_id, ctx.user_id(), text, &*self.clock)?;
        let entry = TicketHistoryEntry::record(
            ticket_id,
            ctx.user_id(),
            HistoryAction::CommentAdded,
            None,
            Some(comment.id().to_string()),
            &*self.clock,
        );
        self.tickets.add_comment(&comment, &entry).await?;
        info!(comment_id = %comment.id(), "comment added");
        Ok(comment)
    }

    /// Returns one page of a ticket's comments, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] when the ticket is not on the
    /// board.
    #[instrument(skip_all, fields(request_id = %ctx.request_id(), requester = %ctx.user_id(), board_id = %board_id, ticket_id = %ticket_id))]
    pub async fn list_comments(
        &self,
        ctx: &RequestContext,
        board_id: BoardId,
        ticket_id: TicketId,
        page: PageRequest,
    ) -> ServiceResult<Page<TicketComment>> {
        self.requester_access(ctx, board_id).await?;
        self.load_ticket(board_id, ticket_id).await?;
        Ok(self.tickets.list_comments(ticket_id, page).await?)
    }

    /// Replaces a comment's text. Only the author may edit.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] when the ticket or comment does
    /// not exist and [`ServiceError::PermissionDenied`] when the requester
    /// did not write the comment.
    #[instrument(skip_all, fields(request_id = %ctx.request_id(), requester = %ctx.user_id(), board_id = %board_id, comment_id = %comment_id))]
    pub async fn update_comment(
        &self,
        ctx: &RequestContext,
        board_id: BoardId,
        ticket_id: TicketId,
        comment_id: CommentId,
        text: &str,
    ) -> ServiceResult<TicketComment> {
        self.requester_access(ctx, board_id).await?;
        self.load_ticket(board_id, ticket_id).await?;
        let mut comment = self.load_comment(ticket_id, comment_id).await?;
        can_edit(comment.is_authored_by(ctx.user_id()))?;

        comment.edit(text, &*self.clock)?;
        self.tickets.update_comment(&comment).await?;
        info!("comment edited");
        Ok(comment)
    }

    /// Deletes a comment. Authors, owners and editors may delete.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] when the ticket or comment does
    /// not exist and [`ServiceError::PermissionDenied`] when the requester
    /// is neither the author nor a moderating member.
    #[instrument(skip_all, fields(request_id = %ctx.request_id(), requester = %ctx.user_id(), board_id = %board_id, comment_id = %comment_id))]
    pub async fn delete_comment(
        &self,
        ctx: &RequestContext,
        board_id: BoardId,
        ticket_id: TicketId,
        comment_id: CommentId,
    ) -> ServiceResult<()> {
        let access = self.requester_access(ctx, board_id).await?;
        self.load_ticket(board_id, ticket_id).await?;
        let comment = self.load_comment(ticket_id, comment_id).await?;
        can_delete(
            access.membership.role(),
            comment.is_authored_by(ctx.user_id()),
        )?;

        self.tickets.delete_comment(comment_id).await?;
        info!("comment deleted");
        Ok(())
    }

    async fn load_comment(
        &self,
        ticket_id: TicketId,
        comment_id: CommentId,
    ) -> ServiceResult<TicketComment> {
        self.tickets
            .find_comment(ticket_id, comment_id)
            .await?
            .ok_or_else(|| {
                warn!("comment does not exist on ticket");
                ServiceError::not_found(Entity::Comment, comment_id)
            })
    }
}
