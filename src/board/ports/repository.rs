//! Repository port for boards and their memberships.
//!
//! Boards and memberships share one port so that a board and its first
//! owner, or a batch of super-admin memberships, are written atomically.

use crate::board::domain::{Board, BoardCode, BoardId, BoardMembership, MembershipId};
use crate::identity::domain::UserId;
use crate::paging::{Page, PageRequest};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for board repository operations.
pub type BoardRepositoryResult<T> = Result<T, BoardRepositoryError>;

/// Board and membership persistence contract.
#[async_trait]
pub trait BoardRepository: Send + Sync {
    /// Stores a new board together with its initial owner memberships in
    /// one unit of work. Nothing is written when any insert fails.
    ///
    /// # Errors
    ///
    /// Returns [`BoardRepositoryError::DuplicateBoardCode`] when the code is
    /// taken and [`BoardRepositoryError::DuplicateMembership`] when `owners`
    /// names the same user twice.
    async fn create_with_owners(
        &self,
        board: &Board,
        owners: &[BoardMembership],
    ) -> BoardRepositoryResult<()>;

    /// Persists changes to an existing board.
    ///
    /// # Errors
    ///
    /// Returns [`BoardRepositoryError::BoardNotFound`] when the board does
    /// not exist.
    async fn update_board(&self, board: &Board) -> BoardRepositoryResult<()>;

    /// Finds a board by identifier.
    async fn find_board(&self, id: BoardId) -> BoardRepositoryResult<Option<Board>>;

    /// Returns `true` when a board uses `code`.
    async fn code_exists(&self, code: &BoardCode) -> BoardRepositoryResult<bool>;

    /// Returns one page of boards on which `user_id` holds a membership,
    /// ordered by code.
    async fn list_boards_for_member(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> BoardRepositoryResult<Page<Board>>;

    /// Finds the membership of `user_id` on `board_id`.
    async fn find_membership(
        &self,
        board_id: BoardId,
        user_id: UserId,
    ) -> BoardRepositoryResult<Option<BoardMembership>>;

    /// Returns every membership on a board.
    async fn memberships_for_board(
        &self,
        board_id: BoardId,
    ) -> BoardRepositoryResult<Vec<BoardMembership>>;

    /// Returns one page of memberships on a board, oldest first.
    async fn list_memberships(
        &self,
        board_id: BoardId,
        page: PageRequest,
    ) -> BoardRepositoryResult<Page<BoardMembership>>;

    /// Stores a new membership.
    ///
    /// # Errors
    ///
    /// Returns [`BoardRepositoryError::DuplicateMembership`] when the user
    /// already holds a membership on the board.
    async fn add_membership(&self, membership: &BoardMembership) -> BoardRepositoryResult<()>;

    /// Persists a membership role change.
    ///
    /// # Errors
    ///
    /// Returns [`BoardRepositoryError::MembershipNotFound`] when the
    /// membership does not exist.
    async fn update_membership(&self, membership: &BoardMembership) -> BoardRepositoryResult<()>;

    /// Deletes a membership.
    ///
    /// # Errors
    ///
    /// Returns [`BoardRepositoryError::MembershipNotFound`] when the
    /// membership does not exist.
    async fn remove_membership(&self, id: MembershipId) -> BoardRepositoryResult<()>;

    /// Counts owner memberships on a board.
    async fn count_owners(&self, board_id: BoardId) -> BoardRepositoryResult<u64>;

    /// Inserts and updates memberships in one unit of work.
    ///
    /// # Errors
    ///
    /// Fails without applying any change when an insert duplicates an
    /// existing membership or an update targets a missing one.
    async fn apply_membership_changes(
        &self,
        inserts: &[BoardMembership],
        updates: &[BoardMembership],
    ) -> BoardRepositoryResult<()>;
}

/// Errors returned by board repository implementations.
#[derive(Debug, Clone, Error)]
pub enum BoardRepositoryError {
    /// Another board already uses the code.
    #[error("duplicate board code: {0}")]
    DuplicateBoardCode(BoardCode),

    /// The user already holds a membership on the board.
    #[error("user {user_id} is already a member of board {board_id}")]
    DuplicateMembership {
        /// Board identifier.
        board_id: BoardId,
        /// Member identifier.
        user_id: UserId,
    },

    /// The board was not found.
    #[error("board not found: {0}")]
    BoardNotFound(BoardId),

    /// The membership was not found.
    #[error("membership not found: {0}")]
    MembershipNotFound(MembershipId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl BoardRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
