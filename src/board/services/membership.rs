//! Membership management on a board.

use super::BoardService;
use crate::authz::membership_rules::{
    can_create_membership, can_have_membership_role, can_remove_membership,
    can_remove_membership_considering_last_owner, can_update_membership,
};
use crate::board::{
    domain::{BoardId, BoardMembership, MembershipRole},
    ports::BoardRepository,
};
use crate::context::RequestContext;
use crate::error::{Entity, ServiceError, ServiceResult};
use crate::identity::{
    domain::{User, UserId, UserRole},
    ports::UserRepository,
};
use crate::paging::{Page, PageRequest};
use mockable::Clock;
use tracing::{info, instrument, warn};

/// Request payload for adding a member to a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreateMembershipRequest {
    user_id: UserId,
    role: MembershipRole,
}

impl CreateMembershipRequest {
    /// Creates a request granting `role` to `user_id`.
    ///
    /// Super admins are always granted [`MembershipRole::Owner`] regardless
    /// of `role`.
    #[must_use]
    pub const fn new(user_id: UserId, role: MembershipRole) -> Self {
        Self { user_id, role }
    }
}

impl<U, B, C> BoardService<U, B, C>
where
    U: UserRepository,
    B: BoardRepository,
    C: Clock + Send + Sync,
{
    /// Returns one page of a board's memberships.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::PermissionDenied`] when the requester is not
    /// a member of the board.
    #[instrument(skip_all, fields(request_id = %ctx.request_id(), requester = %ctx.user_id(), board_id = %board_id))]
    pub async fn list_memberships(
        &self,
        ctx: &RequestContext,
        board_id: BoardId,
        page: PageRequest,
    ) -> ServiceResult<Page<BoardMembership>> {
        self.requester_membership(ctx, board_id).await?;
        Ok(self.boards.list_memberships(board_id, page).await?)
    }

    /// Adds a user to a board.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::PermissionDenied`] when the requester is not
    /// an active owner or the target's global role caps the requested
    /// membership role, [`ServiceError::NotFound`] when the target user does
    /// not exist and [`ServiceError::Conflict`] when the target is already a
    /// member.
    #[instrument(skip_all, fields(request_id = %ctx.request_id(), requester = %ctx.user_id(), board_id = %board_id, user_id = %request.user_id))]
    pub async fn create_membership(
        &self,
        ctx: &RequestContext,
        board_id: BoardId,
        request: CreateMembershipRequest,
    ) -> ServiceResult<BoardMembership> {
        let requester = self.active_requester_membership(ctx, board_id).await?;
        can_create_membership(requester.role())?;

        let target = self.load_user(request.user_id).await?;
        if self
            .boards
            .find_membership(board_id, target.id())
            .await?
            .is_some()
        {
            warn!("target already holds a membership");
            return Err(ServiceError::Conflict(format!(
                "user {} is already a member of board {board_id}",
                target.id()
            )));
        }

        let role = granted_role(&target, request.role)?;
        let membership = BoardMembership::new(board_id, target.id(), role, &*self.clock);
        self.boards.add_membership(&membership).await?;
        info!(membership_id = %membership.id(), %role, "membership created");
        Ok(membership)
    }

    /// Changes the role of an existing member.
    ///
    /// Super admins always keep the owner role, whatever role is requested.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::PermissionDenied`] when the requester is not
    /// an active owner or the target's global role caps `role`, and
    /// [`ServiceError::NotFound`] when the target user or membership does
    /// not exist.
    #[instrument(skip_all, fields(request_id = %ctx.request_id(), requester = %ctx.user_id(), board_id = %board_id, user_id = %user_id))]
    pub async fn update_membership(
        &self,
        ctx: &RequestContext,
        board_id: BoardId,
        user_id: UserId,
        role: MembershipRole,
    ) -> ServiceResult<BoardMembership> {
        let requester = self.active_requester_membership(ctx, board_id).await?;
        can_update_membership(requester.role())?;

        let target = self.load_user(user_id).await?;
        let mut membership = self.load_membership(board_id, user_id).await?;
        let granted = granted_role(&target, role)?;

        membership.change_role(granted, &*self.clock);
        self.boards.update_membership(&membership).await?;
        info!(membership_id = %membership.id(), role = %granted, "membership updated");
        Ok(membership)
    }

    /// Removes a member from a board, refusing to remove the last owner.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::PermissionDenied`] when the requester is not
    /// an active owner, [`ServiceError::NotFound`] when the membership does
    /// not exist and [`ServiceError::InvalidState`] when it is the board's
    /// only owner.
    #[instrument(skip_all, fields(request_id = %ctx.request_id(), requester = %ctx.user_id(), board_id = %board_id, user_id = %user_id))]
    pub async fn remove_membership(
        &self,
        ctx: &RequestContext,
        board_id: BoardId,
        user_id: UserId,
    ) -> ServiceResult<()> {
        let requester = self.active_requester_membership(ctx, board_id).await?;
        can_remove_membership(requester.role())?;

        let membership = self.load_membership(board_id, user_id).await?;
        let owner_count = self.boards.count_owners(board_id).await?;
        can_remove_membership_considering_last_owner(membership.role(), owner_count)?;

        self.boards.remove_membership(membership.id()).await?;
        info!(membership_id = %membership.id(), "membership removed");
        Ok(())
    }

    async fn load_membership(
        &self,
        board_id: BoardId,
        user_id: UserId,
    ) -> ServiceResult<BoardMembership> {
        self.boards
            .find_membership(board_id, user_id)
            .await?
            .ok_or_else(|| {
                warn!("membership does not exist");
                ServiceError::not_found(Entity::Membership, format!("{board_id}/{user_id}"))
            })
    }
}

/// Resolves the role a user may hold; super admins are always owners.
fn granted_role(target: &User, requested: MembershipRole) -> ServiceResult<MembershipRole> {
    if target.role() == UserRole::SuperAdmin {
        return Ok(MembershipRole::Owner);
    }
    can_have_membership_role(target.role(), requested)?;
    Ok(requested)
}
