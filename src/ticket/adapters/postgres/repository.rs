//! `PostgreSQL` repository implementation for tickets.

use super::{
    models::{CommentRow, HistoryRow, TicketRow},
    schema::{ticket_comments, ticket_history, tickets},
};
use crate::board::domain::BoardId;
use crate::identity::domain::UserId;
use crate::paging::{Page, PageRequest};
use crate::postgres::{
    PgPool, from_sql_count, get_conn_with, run_blocking_with, to_sql_count, violates_constraint,
};
use crate::ticket::{
    domain::{
        CommentId, HistoryAction, HistoryEntryId, PersistedCommentData, PersistedHistoryData,
        PersistedTicketData, Ticket, TicketComment, TicketHistoryEntry, TicketId, TicketNumber,
        TicketPriority, TicketStatus,
    },
    ports::{TicketRepository, TicketRepositoryError, TicketRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

const NUMBER_UNIQUE: &str = "idx_tickets_board_number_unique";

/// `PostgreSQL`-backed ticket repository.
#[derive(Debug, Clone)]
pub struct PostgresTicketRepository {
    pool: PgPool,
}

impl PostgresTicketRepository {
    /// Creates a new repository from a connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TicketRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TicketRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        run_blocking_with(
            move || {
                let mut connection = get_conn_with(&pool, TicketRepositoryError::persistence)?;
                f(&mut connection)
            },
            TicketRepositoryError::persistence,
        )
        .await
    }
}

impl From<DieselError> for TicketRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl TicketRepository for PostgresTicketRepository {
    async fn next_number(&self, board_id: BoardId) -> TicketRepositoryResult<TicketNumber> {
        self.run_blocking(move |connection| {
            let highest = tickets::table
                .filter(tickets::board_id.eq(board_id.into_inner()))
                .select(diesel::dsl::max(tickets::number))
                .first::<Option<i64>>(connection)?;
            highest.map_or(Ok(TicketNumber::FIRST), |value| {
                TicketNumber::new(value)
                    .map(TicketNumber::next)
                    .map_err(TicketRepositoryError::persistence)
            })
        })
        .await
    }

    async fn store(&self, ticket: &Ticket) -> TicketRepositoryResult<()> {
        let row = to_ticket_row(ticket);
        let board_id = ticket.board_id();
        let number = ticket.number();
        self.run_blocking(move |connection| {
            diesel::insert_into(tickets::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                        if violates_constraint(info.as_ref(), NUMBER_UNIQUE) =>
                    {
                        TicketRepositoryError::DuplicateNumber { board_id, number }
                    }
                    _ => TicketRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(
        &self,
        ticket: &Ticket,
        history: &[TicketHistoryEntry],
    ) -> TicketRepositoryResult<()> {
        let row = to_ticket_row(ticket);
        let ticket_id = ticket.id();
        let history_rows: Vec<HistoryRow> = history.iter().map(to_history_row).collect();
        self.run_blocking(move |connection| {
            connection.transaction::<_, TicketRepositoryError, _>(|tx| {
                let updated = diesel::update(tickets::table.filter(tickets::id.eq(row.id)))
                    .set(&row)
                    .execute(tx)?;
                if updated == 0 {
                    return Err(TicketRepositoryError::TicketNotFound(ticket_id));
                }
                if !history_rows.is_empty() {
                    diesel::insert_into(ticket_history::table)
                        .values(&history_rows)
                        .execute(tx)?;
                }
                Ok(())
            })
        })
        .await
    }

    async fn find(
        &self,
        board_id: BoardId,
        ticket_id: TicketId,
    ) -> TicketRepositoryResult<Option<Ticket>> {
        self.run_blocking(move |connection| {
            let row = tickets::table
                .filter(tickets::id.eq(ticket_id.into_inner()))
                .filter(tickets::board_id.eq(board_id.into_inner()))
                .select(TicketRow::as_select())
                .first::<TicketRow>(connection)
                .optional()?;
            row.map(row_to_ticket).transpose()
        })
        .await
    }

    async fn list(
        &self,
        board_id: BoardId,
        page: PageRequest,
    ) -> TicketRepositoryResult<Page<Ticket>> {
        let board = board_id.into_inner();
        self.run_blocking(move |connection| {
            let total = tickets::table
                .filter(tickets::board_id.eq(board))
                .count()
                .get_result::<i64>(connection)?;
            let rows = tickets::table
                .filter(tickets::board_id.eq(board))
                .order(tickets::number.asc())
                .offset(to_sql_count(page.offset()))
                .limit(to_sql_count(page.limit()))
                .select(TicketRow::as_select())
                .load::<TicketRow>(connection)?;
            let items = rows
                .into_iter()
                .map(row_to_ticket)
                .collect::<TicketRepositoryResult<Vec<_>>>()?;
            Ok(Page::new(items, from_sql_count(total), page))
        })
        .await
    }

    async fn add_comment(
        &self,
        comment: &TicketComment,
        entry: &TicketHistoryEntry,
    ) -> TicketRepositoryResult<()> {
        let comment_row = to_comment_row(comment);
        let history_row = to_history_row(entry);
        let ticket_id = comment.ticket_id();
        self.run_blocking(move |connection| {
            connection.transaction::<_, TicketRepositoryError, _>(|tx| {
                diesel::insert_into(ticket_comments::table)
                    .values(&comment_row)
                    .execute(tx)
                    .map_err(|err| match err {
                        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
                            TicketRepositoryError::TicketNotFound(ticket_id)
                        }
                        _ => TicketRepositoryError::persistence(err),
                    })?;
                diesel::insert_into(ticket_history::table)
                    .values(&history_row)
                    .execute(tx)?;
                Ok(())
            })
        })
        .await
    }

    async fn update_comment(&self, comment: &TicketComment) -> TicketRepositoryResult<()> {
        let row = to_comment_row(comment);
        let comment_id = comment.id();
        self.run_blocking(move |connection| {
            let updated =
                diesel::update(ticket_comments::table.filter(ticket_comments::id.eq(row.id)))
                    .set(&row)
                    .execute(connection)?;
            if updated == 0 {
                return Err(TicketRepositoryError::CommentNotFound(comment_id));
            }
            Ok(())
        })
        .await
    }

    async fn delete_comment(&self, id: CommentId) -> TicketRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(
                ticket_comments::table.filter(ticket_comments::id.eq(id.into_inner())),
            )
            .execute(connection)?;
            if deleted == 0 {
                return Err(TicketRepositoryError::CommentNotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_comment(
        &self,
        ticket_id: TicketId,
        comment_id: CommentId,
    ) -> TicketRepositoryResult<Option<TicketComment>> {
        self.run_blocking(move |connection| {
            let row = ticket_comments::table
                .filter(ticket_comments::id.eq(comment_id.into_inner()))
                .filter(ticket_comments::ticket_id.eq(ticket_id.into_inner()))
                .select(CommentRow::as_select())
                .first::<CommentRow>(connection)
                .optional()?;
            Ok(row.map(row_to_comment))
        })
        .await
    }

    async fn list_comments(
        &self,
        ticket_id: TicketId,
        page: PageRequest,
    ) -> TicketRepositoryResult<Page<TicketComment>> {
        let ticket = ticket_id.into_inner();
        self.run_blocking(move |connection| {
            let total = ticket_comments::table
                .filter(ticket_comments::ticket_id.eq(ticket))
                .count()
                .get_result::<i64>(connection)?;
            let rows = ticket_comments::table
                .filter(ticket_comments::ticket_id.eq(ticket))
                .order((ticket_comments::created_at.asc(), ticket_comments::id.asc()))
                .offset(to_sql_count(page.offset()))
                .limit(to_sql_count(page.limit()))
                .select(CommentRow::as_select())
                .load::<CommentRow>(connection)?;
            let items = rows.into_iter().map(row_to_comment).collect();
            Ok(Page::new(items, from_sql_count(total), page))
        })
        .await
    }

    async fn list_history(
        &self,
        ticket_id: TicketId,
        page: PageRequest,
    ) -> TicketRepositoryResult<Page<TicketHistoryEntry>> {
        let ticket = ticket_id.into_inner();
        self.run_blocking(move |connection| {
            let total = ticket_history::table
                .filter(ticket_history::ticket_id.eq(ticket))
                .count()
                .get_result::<i64>(connection)?;
            let rows = ticket_history::table
                .filter(ticket_history::ticket_id.eq(ticket))
                .order((ticket_history::created_at.asc(), ticket_history::id.asc()))
                .offset(to_sql_count(page.offset()))
                .limit(to_sql_count(page.limit()))
                .select(HistoryRow::as_select())
                .load::<HistoryRow>(connection)?;
            let items = rows
                .into_iter()
                .map(row_to_history)
                .collect::<TicketRepositoryResult<Vec<_>>>()?;
            Ok(Page::new(items, from_sql_count(total), page))
        })
        .await
    }
}

fn to_ticket_row(ticket: &Ticket) -> TicketRow {
    TicketRow {
        id: ticket.id().into_inner(),
        board_id: ticket.board_id().into_inner(),
        number: i64::from(ticket.number().get()),
        title: ticket.title().to_owned(),
        description: ticket.description().to_owned(),
        reporter_id: ticket.reporter_id().into_inner(),
        created_by: ticket.created_by().into_inner(),
        assignee_id: ticket.assignee_id().map(UserId::into_inner),
        status: ticket.status().as_str().to_owned(),
        priority: ticket.priority().as_str().to_owned(),
        created_at: ticket.created_at(),
        updated_at: ticket.updated_at(),
    }
}

fn row_to_ticket(row: TicketRow) -> TicketRepositoryResult<Ticket> {
    let number = TicketNumber::new(row.number).map_err(TicketRepositoryError::persistence)?;
    let status =
        TicketStatus::try_from(row.status.as_str()).map_err(TicketRepositoryError::persistence)?;
    let priority = TicketPriority::try_from(row.priority.as_str())
        .map_err(TicketRepositoryError::persistence)?;
    Ok(Ticket::from_persisted(PersistedTicketData {
        id: TicketId::from_uuid(row.id),
        board_id: BoardId::from_uuid(row.board_id),
        number,
        title: row.title,
        description: row.description,
        reporter_id: UserId::from_uuid(row.reporter_id),
        created_by: UserId::from_uuid(row.created_by),
        assignee_id: row.assignee_id.map(UserId::from_uuid),
        status,
        priority,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}

fn to_comment_row(comment: &TicketComment) -> CommentRow {
    CommentRow {
        id: comment.id().into_inner(),
        ticket_id: comment.ticket_id().into_inner(),
        user_id: comment.author_id().into_inner(),
        text: comment.text().to_owned(),
        edited: comment.edited(),
        created_at: comment.created_at(),
        updated_at: comment.updated_at(),
    }
}

fn row_to_comment(row: CommentRow) -> TicketComment {
    TicketComment::from_persisted(PersistedCommentData {
        id: CommentId::from_uuid(row.id),
        ticket_id: TicketId::from_uuid(row.ticket_id),
        author_id: UserId::from_uuid(row.user_id),
        text: row.text,
        edited: row.edited,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn to_history_row(entry: &TicketHistoryEntry) -> HistoryRow {
    HistoryRow {
        id: entry.id().into_inner(),
        ticket_id: entry.ticket_id().into_inner(),
        user_id: entry.actor_id().into_inner(),
        action: entry.action().as_str().to_owned(),
        old_value: entry.old_value().map(str::to_owned),
        new_value: entry.new_value().map(str::to_owned),
        created_at: entry.created_at(),
    }
}

fn row_to_history(row: HistoryRow) -> TicketRepositoryResult<TicketHistoryEntry> {
    let action = HistoryAction::try_from(row.action.as_str())
        .map_err(TicketRepositoryError::persistence)?;
    Ok(TicketHistoryEntry::from_persisted(PersistedHistoryData {
        id: HistoryEntryId::from_uuid(row.id),
        ticket_id: TicketId::from_uuid(row.ticket_id),
        actor_id: UserId::from_uuid(row.user_id),
        action,
        old_value: row.old_value,
        new_value: row.new_value,
        created_at: row.created_at,
    }))
}
