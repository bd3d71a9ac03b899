//! Ticket lifecycle orchestration.

use crate::authz::ticket_rules::{
    can_be_assigned, can_be_reporter, can_create_ticket, can_edit_ticket,
};
use crate::board::{domain::BoardId, ports::BoardRepository};
use crate::context::RequestContext;
use crate::error::ServiceResult;
use crate::identity::{domain::UserId, ports::UserRepository};
use crate::paging::{Page, PageRequest};
use crate::ticket::{
    domain::{
        HistoryAction, NewTicket, Ticket, TicketHistoryEntry, TicketId, TicketPriority,
        TicketStatus,
    },
    ports::TicketRepository,
};
use mockable::Clock;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Request payload for opening a ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTicketRequest {
    title: String,
    description: String,
    assignee: Option<UserId>,
    status: TicketStatus,
    priority: TicketPriority,
}

impl CreateTicketRequest {
    /// Creates a request for an unassigned, low-priority backlog ticket.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            assignee: None,
            status: TicketStatus::default(),
            priority: TicketPriority::default(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Assigns the ticket on creation.
    #[must_use]
    pub const fn with_assignee(mut self, assignee: UserId) -> Self {
        self.assignee = Some(assignee);
        self
    }

    /// Sets the initial status.
    #[must_use]
    pub const fn with_status(mut self, status: TicketStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the initial priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TicketPriority) -> Self {
        self.priority = priority;
        self
    }
}

/// Request payload for editing a ticket. Omitted fields stay unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateTicketRequest {
    title: Option<String>,
    description: Option<String>,
    status: Option<TicketStatus>,
    priority: Option<TicketPriority>,
    reporter: Option<UserId>,
    // `Some(None)` clears the assignee.
    assignee: Option<Option<UserId>>,
}

impl UpdateTicketRequest {
    /// Creates an empty update.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a new title. Blank titles are ignored.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets a new description. Blank descriptions are ignored.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Moves the ticket to `status`.
    #[must_use]
    pub const fn with_status(mut self, status: TicketStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TicketPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Hands the ticket to another reporter.
    #[must_use]
    pub const fn with_reporter(mut self, reporter: UserId) -> Self {
        self.reporter = Some(reporter);
        self
    }

    /// Assigns the ticket to `assignee`.
    #[must_use]
    pub const fn assign_to(mut self, assignee: UserId) -> Self {
        self.assignee = Some(Some(assignee));
        self
    }

    /// Clears the assignee.
    #[must_use]
    pub const fn unassign(mut self) -> Self {
        self.assignee = Some(None);
        self
    }
}

/// Ticket, comment and history orchestration service.
#[derive(Clone)]
pub struct TicketService<U, B, T, C>
where
    U: UserRepository,
    B: BoardRepository,
    T: TicketRepository,
    C: Clock + Send + Sync,
{
    pub(super) users: Arc<U>,
    pub(super) boards: Arc<B>,
    pub(super) tickets: Arc<T>,
    pub(super) clock: Arc<C>,
}

impl<U, B, T, C> TicketService<U, B, T, C>
where
    U: UserRepository,
    B: BoardRepository,
    T: TicketRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new ticket service.
    #[must_use]
    pub const fn new(users: Arc<U>, boards: Arc<B>, tickets: Arc<T>, clock: Arc<C>) -> Self {
        Self {
            users,
            boards,
            tickets,
            clock,
        }
    }

    /// Opens a ticket reported by the requester.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::ServiceError::PermissionDenied`] when the
    /// requester is not an active editing member or the assignee may not
    /// take tickets, [`crate::error::ServiceError::InvalidState`] for an
    /// inactive board or blank title and
    /// [`crate::error::ServiceError::Conflict`] when a concurrent create
    /// took the same number.
    #[instrument(skip_all, fields(request_id = %ctx.request_id(), requester = %ctx.user_id(), board_id = %board_id))]
    pub async fn create_ticket(
        &self,
        ctx: &RequestContext,
        board_id: BoardId,
        request: CreateTicketRequest,
    ) -> ServiceResult<Ticket> {
        let access = self.requester_access(ctx, board_id).await?;
        can_create_ticket(access.membership.role())?;

        if let Some(assignee) = request.assignee {
            let membership = self
                .live_member(board_id, assignee, "be assigned a ticket")
                .await?;
            can_be_assigned(membership.role())?;
        }

        let number = self.tickets.next_number(board_id).await?;
        let ticket = Ticket::new(
            NewTicket {
                board_id,
                number,
                title: request.title,
                description: request.description,
                created_by: ctx.user_id(),
                assignee_id: request.assignee,
                status: request.status,
                priority: request.priority,
            },
            &*self.clock,
        )?;
        self.tickets.store(&ticket).await?;
        info!(
            ticket_id = %ticket.id(),
            code = %number.code_on(access.board.code()),
            "ticket created"
        );
        Ok(ticket)
    }

    /// Returns a ticket on a board the requester is an active member of.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::ServiceError::NotFound`] when the ticket is
    /// not on the board.
    #[instrument(skip_all, fields(request_id = %ctx.request_id(), requester = %ctx.user_id(), board_id = %board_id, ticket_id = %ticket_id))]
    pub async fn get_ticket(
        &self,
        ctx: &RequestContext,
        board_id: BoardId,
        ticket_id: TicketId,
    ) -> ServiceResult<Ticket> {
        self.requester_access(ctx, board_id).await?;
        self.load_ticket(board_id, ticket_id).await
    }

    /// Returns one page of a board's tickets, ordered by number.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::ServiceError::PermissionDenied`] when the
    /// requester is not an active member.
    #[instrument(skip_all, fields(request_id = %ctx.request_id(), requester = %ctx.user_id(), board_id = %board_id))]
    pub async fn list_tickets(
        &self,
        ctx: &RequestContext,
        board_id: BoardId,
        page: PageRequest,
    ) -> ServiceResult<Page<Ticket>> {
        self.requester_access(ctx, board_id).await?;
        Ok(self.tickets.list(board_id, page).await?)
    }

    /// Edits a ticket and records every tracked change in its history.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::ServiceError::NotFound`] when the ticket is
    /// not on the board and
    /// [`crate::error::ServiceError::PermissionDenied`] when the requester
    /// may not edit or a new reporter or assignee is not eligible.
    #[instrument(skip_all, fields(request_id = %ctx.request_id(), requester = %ctx.user_id(), board_id = %board_id, ticket_id = %ticket_id))]
    pub async fn update_ticket(
        &self,
        ctx: &RequestContext,
        board_id: BoardId,
        ticket_id: TicketId,
        request: UpdateTicketRequest,
    ) -> ServiceResult<Ticket> {
        let access = self.requester_access(ctx, board_id).await?;
        let mut ticket = self.load_ticket(board_id, ticket_id).await?;
        can_edit_ticket(access.membership.role())?;

        let UpdateTicketRequest {
            title,
            description,
            status,
            priority,
            reporter,
            assignee,
        } = request;
        let clock = &*self.clock;
        let mut changes = Changes::new(ticket_id, ctx.user_id(), clock);
        if let Some(new_title) = title {
            changes.touched |= ticket.retitle(&new_title, clock)?;
        }
        if let Some(new_description) = description {
            changes.touched |= ticket.describe(&new_description, clock);
        }
        if let Some(new_status) = status
            && let Some(old) = ticket.change_status(new_status, clock)
        {
            changes.record(HistoryAction::StatusChanged, Some(old), Some(new_status));
        }
        if let Some(new_priority) = priority
            && let Some(old) = ticket.change_priority(new_priority, clock)
        {
            changes.record(HistoryAction::PriorityChanged, Some(old), Some(new_priority));
        }
        if let Some(new_reporter) = reporter {
            self.change_reporter(&mut ticket, new_reporter, &mut changes)
                .await?;
        }
        if let Some(new_assignee) = assignee {
            self.change_assignee(&mut ticket, new_assignee, &mut changes)
                .await?;
        }

        if !changes.touched {
            debug!("ticket unchanged");
            return Ok(ticket);
        }
        self.tickets.update(&ticket, &changes.history).await?;
        info!(history_entries = changes.history.len(), "ticket updated");
        Ok(ticket)
    }

    /// Returns one page of a ticket's change history, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::ServiceError::NotFound`] when the ticket is
    /// not on the board.
    #[instrument(skip_all, fields(request_id = %ctx.request_id(), requester = %ctx.user_id(), board_id = %board_id, ticket_id = %ticket_id))]
    pub async fn list_history(
        &self,
        ctx: &RequestContext,
        board_id: BoardId,
        ticket_id: TicketId,
        page: PageRequest,
    ) -> ServiceResult<Page<TicketHistoryEntry>> {
        self.requester_access(ctx, board_id).await?;
        self.load_ticket(board_id, ticket_id).await?;
        Ok(self.tickets.list_history(ticket_id, page).await?)
    }

    async fn change_reporter(
        &self,
        ticket: &mut Ticket,
        reporter: UserId,
        changes: &mut Changes<'_, C>,
    ) -> ServiceResult<()> {
        let membership = self
            .live_member(ticket.board_id(), reporter, "report a ticket")
            .await?;
        can_be_reporter(membership.role())?;
        if let Some(old) = ticket.change_reporter(reporter, changes.clock) {
            changes.record(HistoryAction::ReporterChanged, Some(old), Some(reporter));
        }
        Ok(())
    }

    async fn change_assignee(
        &self,
        ticket: &mut Ticket,
        assignee: Option<UserId>,
        changes: &mut Changes<'_, C>,
    ) -> ServiceResult<()> {
        if let Some(user_id) = assignee {
            let membership = self
                .live_member(ticket.board_id(), user_id, "be assigned a ticket")
                .await?;
            can_be_assigned(membership.role())?;
        }
        if let Some(old) = ticket.assign(assignee, changes.clock) {
            changes.record(HistoryAction::AssigneeChanged, old, assignee);
        }
        Ok(())
    }
}

/// Accumulates history entries while a ticket is edited.
struct Changes<'a, C> {
    ticket_id: TicketId,
    actor_id: UserId,
    clock: &'a C,
    history: Vec<TicketHistoryEntry>,
    touched: bool,
}

impl<'a, C: Clock> Changes<'a, C> {
    const fn new(ticket_id: TicketId, actor_id: UserId, clock: &'a C) -> Self {
        Self {
            ticket_id,
            actor_id,
            clock,
            history: Vec::new(),
            touched: false,
        }
    }

    fn record<V: ToString>(&mut self, action: HistoryAction, old: Option<V>, new: Option<V>) {
        self.history.push(TicketHistoryEntry::record(
            self.ticket_id,
            self.actor_id,
            action,
            old.map(|value| value.to_string()),
            new.map(|value| value.to_string()),
            self.clock,
        ));
        self.touched = true;
    }
}
