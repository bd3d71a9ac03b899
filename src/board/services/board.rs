//! Board lifecycle orchestration.

use crate::authz::membership_rules::{
    board_with_code_exists, can_create_board, can_deactivate_board, can_update_board,
};
use crate::board::{
    domain::{Board, BoardCode, BoardId, BoardMembership, MembershipRole},
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
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Request payload for creating a board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateBoardRequest {
    code: String,
    name: String,
    description: String,
}

impl CreateBoardRequest {
    /// Creates a request with every required field.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Request payload for updating a board.
///
/// Name and description are replaced only when non-blank and different.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateBoardRequest {
    name: Option<String>,
    description: Option<String>,
    reactivate: bool,
}

impl UpdateBoardRequest {
    /// Creates an empty update.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a new name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets a new description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Moves an inactive board back to active.
    #[must_use]
    pub const fn reactivate(mut self) -> Self {
        self.reactivate = true;
        self
    }
}

/// Board and membership orchestration service.
#[derive(Clone)]
pub struct BoardService<U, B, C>
where
    U: UserRepository,
    B: BoardRepository,
    C: Clock + Send + Sync,
{
    pub(super) users: Arc<U>,
    pub(super) boards: Arc<B>,
    pub(super) clock: Arc<C>,
}

impl<U, B, C> BoardService<U, B, C>
where
    U: UserRepository,
    B: BoardRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new board service.
    #[must_use]
    pub const fn new(users: Arc<U>, boards: Arc<B>, clock: Arc<C>) -> Self {
        Self {
            users,
            boards,
            clock,
        }
    }

    /// Creates a board owned by the requester and every active super admin.
    ///
    /// The board and all initial owner memberships are written in one unit
    /// of work, so a failed call leaves no board behind.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] when the requester does not exist,
    /// [`ServiceError::PermissionDenied`] when the requester is inactive or
    /// not an admin, [`ServiceError::InvalidState`] for a malformed code or
    /// blank name and [`ServiceError::Conflict`] when the code is taken.
    #[instrument(skip_all, fields(request_id = %ctx.request_id(), requester = %ctx.user_id()))]
    pub async fn create_board(
        &self,
        ctx: &RequestContext,
        request: CreateBoardRequest,
    ) -> ServiceResult<Board> {
        let creator = self.load_user(ctx.user_id()).await?;
        require_active(&creator, "create board")?;
        can_create_board(creator.role())?;

        let code = BoardCode::new(&request.code)?;
        board_with_code_exists(&code, self.boards.code_exists(&code).await?)?;

        let board = Board::new(
            code,
            &request.name,
            &request.description,
            creator.id(),
            &*self.clock,
        )?;
        let super_admins = self.users.list_active_by_role(UserRole::SuperAdmin).await?;
        let owners: Vec<BoardMembership> = std::iter::once(creator.id())
            .chain(
                super_admins
                    .iter()
                    .map(User::id)
                    .filter(|id| *id != creator.id()),
            )
            .map(|user_id| {
                BoardMembership::new(board.id(), user_id, MembershipRole::Owner, &*self.clock)
            })
            .collect();
        self.boards.create_with_owners(&board, &owners).await?;
        info!(
            board_id = %board.id(),
            code = %board.code(),
            owners = owners.len(),
            "board created"
        );
        Ok(board)
    }

    /// Returns a board the requester is a member of.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::PermissionDenied`] when the requester has no
    /// membership, whether or not the board exists.
    #[instrument(skip_all, fields(request_id = %ctx.request_id(), requester = %ctx.user_id(), board_id = %board_id))]
    pub async fn get_board(&self, ctx: &RequestContext, board_id: BoardId) -> ServiceResult<Board> {
        self.requester_membership(ctx, board_id).await?;
        self.load_board(board_id).await
    }

    /// Returns one page of boards the requester is a member of.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Storage`] when the listing fails.
    #[instrument(skip_all, fields(request_id = %ctx.request_id(), requester = %ctx.user_id()))]
    pub async fn list_boards(
        &self,
        ctx: &RequestContext,
        page: PageRequest,
    ) -> ServiceResult<Page<Board>> {
        Ok(self
            .boards
            .list_boards_for_member(ctx.user_id(), page)
            .await?)
    }

    /// Updates a board's name or description, or reactivates it.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::PermissionDenied`] when the requester is not
    /// an active owner of the board and [`ServiceError::NotFound`] when the
    /// board does not exist.
    #[instrument(skip_all, fields(request_id = %ctx.request_id(), requester = %ctx.user_id(), board_id = %board_id))]
    pub async fn update_board(
        &self,
        ctx: &RequestContext,
        board_id: BoardId,
        request: UpdateBoardRequest,
    ) -> ServiceResult<Board> {
        let membership = self.active_requester_membership(ctx, board_id).await?;
        can_update_board(membership.role())?;
        let mut board = self.load_board(board_id).await?;

        let clock = &*self.clock;
        let renamed = request
            .name
            .map(|name| board.rename(&name, clock))
            .transpose()?
            .unwrap_or(false);
        let described = request
            .description
            .is_some_and(|description| board.describe(&description, clock));
        let reactivated = request.reactivate && board.reactivate(clock);

        if renamed || described || reactivated {
            self.boards.update_board(&board).await?;
            info!(renamed, described, reactivated, "board updated");
        }
        Ok(board)
    }

    /// Deactivates a board. Deactivating an inactive board changes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::PermissionDenied`] when the requester is not
    /// an active owner of the board and [`ServiceError::NotFound`] when the
    /// board does not exist.
    #[instrument(skip_all, fields(request_id = %ctx.request_id(), requester = %ctx.user_id(), board_id = %board_id))]
    pub async fn deactivate_board(
        &self,
        ctx: &RequestContext,
        board_id: BoardId,
    ) -> ServiceResult<Board> {
        let membership = self.active_requester_membership(ctx, board_id).await?;
        can_deactivate_board(membership.role())?;
        let mut board = self.load_board(board_id).await?;

        if !board.deactivate(&*self.clock) {
            info!("board already inactive; nothing to do");
            return Ok(board);
        }
        self.boards.update_board(&board).await?;
        info!("board deactivated");
        Ok(board)
    }

    /// Loads the requester's membership on a board.
    ///
    /// A missing membership is reported as a permission failure so that
    /// non-members cannot probe for board existence.
    pub(super) async fn requester_membership(
        &self,
        ctx: &RequestContext,
        board_id: BoardId,
    ) -> ServiceResult<BoardMembership> {
        self.boards
            .find_membership(board_id, ctx.user_id())
            .await?
            .ok_or_else(|| {
                warn!("requester has no membership on board");
                ServiceError::permission_denied("non-member", format!("access board {board_id}"))
            })
    }

    /// Loads the requester's membership and checks the requester is active.
    pub(super) async fn active_requester_membership(
        &self,
        ctx: &RequestContext,
        board_id: BoardId,
    ) -> ServiceResult<BoardMembership> {
        let membership = self.requester_membership(ctx, board_id).await?;
        let requester = self.load_user(ctx.user_id()).await?;
        require_active(&requester, &format!("modify board {board_id}"))?;
        Ok(membership)
    }

    pub(super) async fn load_board(&self, board_id: BoardId) -> ServiceResult<Board> {
        self.boards.find_board(board_id).await?.ok_or_else(|| {
            warn!(%board_id, "board does not exist");
            ServiceError::not_found(Entity::Board, board_id)
        })
    }

    pub(super) async fn load_user(&self, user_id: UserId) -> ServiceResult<User> {
        self.users.find_by_id(user_id).await?.ok_or_else(|| {
            warn!(%user_id, "user does not exist");
            ServiceError::not_found(Entity::User, user_id)
        })
    }
}

fn require_active(user: &User, action: &str) -> ServiceResult<()> {
    if user.is_active() {
        return Ok(());
    }
    warn!(user_id = %user.id(), "inactive user attempted a mutation");
    Err(ServiceError::permission_denied(user.status(), action))
}
