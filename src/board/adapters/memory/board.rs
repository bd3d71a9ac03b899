//! In-memory repository for boards and memberships.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::board::{
    domain::{Board, BoardCode, BoardId, BoardMembership, MembershipId},
    ports::{BoardRepository, BoardRepositoryError, BoardRepositoryResult},
};
use crate::identity::domain::UserId;
use crate::paging::{Page, PageRequest};

/// Thread-safe in-memory board repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBoardRepository {
    state: Arc<RwLock<InMemoryBoardState>>,
}

#[derive(Debug, Default)]
struct InMemoryBoardState {
    boards: HashMap<BoardId, Board>,
    code_index: HashMap<BoardCode, BoardId>,
    memberships: HashMap<MembershipId, BoardMembership>,
    member_index: HashMap<(BoardId, UserId), MembershipId>,
}

impl InMemoryBoardState {
    fn check_insertable(&self, membership: &BoardMembership) -> BoardRepositoryResult<()> {
        let key = (membership.board_id(), membership.user_id());
        if self.member_index.contains_key(&key) || self.memberships.contains_key(&membership.id())
        {
            return Err(BoardRepositoryError::DuplicateMembership {
                board_id: membership.board_id(),
                user_id: membership.user_id(),
            });
        }
        Ok(())
    }

    fn check_batch(&self, batch: &[BoardMembership]) -> BoardRepositoryResult<()> {
        let mut seen = HashSet::new();
        for membership in batch {
            self.check_insertable(membership)?;
            if !seen.insert((membership.board_id(), membership.user_id())) {
                return Err(BoardRepositoryError::DuplicateMembership {
                    board_id: membership.board_id(),
                    user_id: membership.user_id(),
                });
            }
        }
        Ok(())
    }

    fn insert_membership(&mut self, membership: &BoardMembership) {
        self.member_index.insert(
            (membership.board_id(), membership.user_id()),
            membership.id(),
        );
        self.memberships.insert(membership.id(), membership.clone());
    }

    fn board_memberships(&self, board_id: BoardId) -> Vec<BoardMembership> {
        let mut found: Vec<BoardMembership> = self
            .memberships
            .values()
            .filter(|m| m.board_id() == board_id)
            .cloned()
            .collect();
        found.sort_by_key(|m| (m.created_at(), m.id()));
        found
    }
}

impl InMemoryBoardRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> BoardRepositoryResult<RwLockReadGuard<'_, InMemoryBoardState>> {
        self.state.read().map_err(|err| {
            BoardRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> BoardRepositoryResult<RwLockWriteGuard<'_, InMemoryBoardState>> {
        self.state.write().map_err(|err| {
            BoardRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

#[async_trait]
impl BoardRepository for InMemoryBoardRepository {
    async fn create_with_owners(
        &self,
        board: &Board,
        owners: &[BoardMembership],
    ) -> BoardRepositoryResult<()> {
        let mut state = self.write()?;
        if state.code_index.contains_key(board.code()) {
            return Err(BoardRepositoryError::DuplicateBoardCode(board.code().clone()));
        }
        state.check_batch(owners)?;

        state.code_index.insert(board.code().clone(), board.id());
        state.boards.insert(board.id(), board.clone());
        for owner in owners {
            state.insert_membership(owner);
        }
        Ok(())
    }

    async fn update_board(&self, board: &Board) -> BoardRepositoryResult<()> {
        let mut state = self.write()?;
        let slot = state
            .boards
            .get_mut(&board.id())
            .ok_or(BoardRepositoryError::BoardNotFound(board.id()))?;
        *slot = board.clone();
        Ok(())
    }

    async fn find_board(&self, id: BoardId) -> BoardRepositoryResult<Option<Board>> {
        Ok(self.read()?.boards.get(&id).cloned())
    }

    async fn code_exists(&self, code: &BoardCode) -> BoardRepositoryResult<bool> {
        Ok(self.read()?.code_index.contains_key(code))
    }

    async fn list_boards_for_member(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> BoardRepositoryResult<Page<Board>> {
        let state = self.read()?;
        let mut boards: Vec<Board> = state
            .member_index
            .keys()
            .filter(|(_, member)| *member == user_id)
            .filter_map(|(board_id, _)| state.boards.get(board_id).cloned())
            .collect();
        boards.sort_by(|a, b| a.code().as_str().cmp(b.code().as_str()));
        Ok(page.slice(&boards))
    }

    async fn find_membership(
        &self,
        board_id: BoardId,
        user_id: UserId,
    ) -> BoardRepositoryResult<Option<BoardMembership>> {
        let state = self.read()?;
        Ok(state
            .member_index
            .get(&(board_id, user_id))
            .and_then(|id| state.memberships.get(id))
            .cloned())
    }

    async fn memberships_for_board(
        &self,
        board_id: BoardId,
    ) -> BoardRepositoryResult<Vec<BoardMembership>> {
        Ok(self.read()?.board_memberships(board_id))
    }

    async fn list_memberships(
        &self,
        board_id: BoardId,
        page: PageRequest,
    ) -> BoardRepositoryResult<Page<BoardMembership>> {
        Ok(page.slice(&self.read()?.board_memberships(board_id)))
    }

    async fn add_membership(&self, membership: &BoardMembership) -> BoardRepositoryResult<()> {
        let mut state = self.write()?;
        state.check_insertable(membership)?;
        state.insert_membership(membership);
        Ok(())
    }

    async fn update_membership(&self, membership: &BoardMembership) -> BoardRepositoryResult<()> {
        let mut state = self.write()?;
        let slot = state
            .memberships
            .get_mut(&membership.id())
            .ok_or(BoardRepositoryError::MembershipNotFound(membership.id()))?;
        *slot = membership.clone();
        Ok(())
    }

    async fn remove_membership(&self, id: MembershipId) -> BoardRepositoryResult<()> {
        let mut state = self.write()?;
        let removed = state
            .memberships
            .remove(&id)
            .ok_or(BoardRepositoryError::MembershipNotFound(id))?;
        state
            .member_index
            .remove(&(removed.board_id(), removed.user_id()));
        Ok(())
    }

    async fn count_owners(&self, board_id: BoardId) -> BoardRepositoryResult<u64> {
        let state = self.read()?;
        let owners = state
            .memberships
            .values()
            .filter(|m| m.board_id() == board_id && m.role().is_owner())
            .count();
        Ok(owners as u64)
    }

    async fn apply_membership_changes(
        &self,
        inserts: &[BoardMembership],
        updates: &[BoardMembership],
    ) -> BoardRepositoryResult<()> {
        let mut state = self.write()?;
        state.check_batch(inserts)?;
        if let Some(missing) = updates
            .iter()
            .find(|m| !state.memberships.contains_key(&m.id()))
        {
            return Err(BoardRepositoryError::MembershipNotFound(missing.id()));
        }

        for membership in inserts {
            state.insert_membership(membership);
        }
        for membership in updates {
            state.memberships.insert(membership.id(), membership.clone());
        }
        Ok(())
    }
}
