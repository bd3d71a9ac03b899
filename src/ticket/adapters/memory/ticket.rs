//! In-memory repository for tickets, comments and history.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::board::domain::BoardId;
use crate::paging::{Page, PageRequest};
use crate::ticket::{
    domain::{
        CommentId, HistoryEntryId, Ticket, TicketComment, TicketHistoryEntry, TicketId,
        TicketNumber,
    },
    ports::{TicketRepository, TicketRepositoryError, TicketRepositoryResult},
};

/// Thread-safe in-memory ticket repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTicketRepository {
    state: Arc<RwLock<InMemoryTicketState>>,
}

#[derive(Debug, Default)]
struct InMemoryTicketState {
    tickets: HashMap<TicketId, Ticket>,
    number_index: HashMap<(BoardId, TicketNumber), TicketId>,
    comments: HashMap<CommentId, TicketComment>,
    history: HashMap<HistoryEntryId, TicketHistoryEntry>,
}

impl InMemoryTicketState {
    fn require_ticket(&self, id: TicketId) -> TicketRepositoryResult<()> {
        if self.tickets.contains_key(&id) {
            return Ok(());
        }
        Err(TicketRepositoryError::TicketNotFound(id))
    }

    fn record(&mut self, entry: &TicketHistoryEntry) {
        self.history.insert(entry.id(), entry.clone());
    }
}

impl InMemoryTicketRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> TicketRepositoryResult<RwLockReadGuard<'_, InMemoryTicketState>> {
        self.state.read().map_err(|err| {
            TicketRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> TicketRepositoryResult<RwLockWriteGuard<'_, InMemoryTicketState>> {
        self.state.write().map_err(|err| {
            TicketRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

#[async_trait]
impl TicketRepository for InMemoryTicketRepository {
    async fn next_number(&self, board_id: BoardId) -> TicketRepositoryResult<TicketNumber> {
        let state = self.read()?;
        let highest = state
            .number_index
            .keys()
            .filter(|(board, _)| *board == board_id)
            .map(|(_, number)| *number)
            .max();
        Ok(highest.map_or(TicketNumber::FIRST, TicketNumber::next))
    }

    async fn store(&self, ticket: &Ticket) -> TicketRepositoryResult<()> {
        let mut state = self.write()?;
        let key = (ticket.board_id(), ticket.number());
        if state.number_index.contains_key(&key) {
            return Err(TicketRepositoryError::DuplicateNumber {
                board_id: ticket.board_id(),
                number: ticket.number(),
            });
        }
        state.number_index.insert(key, ticket.id());
        state.tickets.insert(ticket.id(), ticket.clone());
        Ok(())
    }

    async fn update(
        &self,
        ticket: &Ticket,
        history: &[TicketHistoryEntry],
    ) -> TicketRepositoryResult<()> {
        let mut state = self.write()?;
        state.require_ticket(ticket.id())?;
        state.tickets.insert(ticket.id(), ticket.clone());
        for entry in history {
            state.record(entry);
        }
        Ok(())
    }

    async fn find(
        &self,
        board_id: BoardId,
        ticket_id: TicketId,
    ) -> TicketRepositoryResult<Option<Ticket>> {
        Ok(self
            .read()?
            .tickets
            .get(&ticket_id)
            .filter(|ticket| ticket.board_id() == board_id)
            .cloned())
    }

    async fn list(
        &self,
        board_id: BoardId,
        page: PageRequest,
    ) -> TicketRepositoryResult<Page<Ticket>> {
        let state = self.read()?;
        let mut tickets: Vec<Ticket> = state
            .tickets
            .values()
            .filter(|ticket| ticket.board_id() == board_id)
            .cloned()
            .collect();
        tickets.sort_by_key(Ticket::number);
        Ok(page.slice(&tickets))
    }

    async fn add_comment(
        &self,
        comment: &TicketComment,
        entry: &TicketHistoryEntry,
    ) -> TicketRepositoryResult<()> {
        let mut state = self.write()?;
        state.require_ticket(comment.ticket_id())?;
        state.comments.insert(comment.id(), comment.clone());
        state.record(entry);
        Ok(())
    }

    async fn update_comment(&self, comment: &TicketComment) -> TicketRepositoryResult<()> {
        let mut state = self.write()?;
        let slot = state
            .comments
            .get_mut(&comment.id())
            .ok_or(TicketRepositoryError::CommentNotFound(comment.id()))?;
        *slot = comment.clone();
        Ok(())
    }

    async fn delete_comment(&self, id: CommentId) -> TicketRepositoryResult<()> {
        self.write()?
            .comments
            .remove(&id)
            .map(|_| ())
            .ok_or(TicketRepositoryError::CommentNotFound(id))
    }

    async fn find_comment(
        &self,
        ticket_id: TicketId,
        comment_id: CommentId,
    ) -> TicketRepositoryResult<Option<TicketComment>> {
        Ok(self
            .read()?
            .comments
            .get(&comment_id)
            .filter(|comment| comment.ticket_id() == ticket_id)
            .cloned())
    }

    async fn list_comments(
        &self,
        ticket_id: TicketId,
        page: PageRequest,
    ) -> TicketRepositoryResult<Page<TicketComment>> {
        let state = self.read()?;
        let mut comments: Vec<TicketComment> = state
            .comments
            .values()
            .filter(|comment| comment.ticket_id() == ticket_id)
            .cloned()
            .collect();
        comments.sort_by_key(|c| (c.created_at(), c.id()));
        Ok(page.slice(&comments))
    }

    async fn list_history(
        &self,
        ticket_id: TicketId,
        page: PageRequest,
    ) -> TicketRepositoryResult<Page<TicketHistoryEntry>> {
        let state = self.read()?;
        let mut entries: Vec<TicketHistoryEntry> = state
            .history
            .values()
            .filter(|entry| entry.ticket_id() == ticket_id)
            .cloned()
            .collect();
        entries.sort_by_key(|e| (e.created_at(), e.id()));
        Ok(page.slice(&entries))
    }
}
