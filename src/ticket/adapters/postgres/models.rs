//! Diesel row models for ticket persistence.

use super::schema::{ticket_comments, ticket_history, tickets};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Ticket row, used for reads, inserts and updates.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = tickets)]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TicketRow {
    /// Ticket identifier.
    pub id: uuid::Uuid,
    /// Owning board.
    pub board_id: uuid::Uuid,
    /// Per-board number.
    pub number: i64,
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Reporter.
    pub reporter_id: uuid::Uuid,
    /// Creator.
    pub created_by: uuid::Uuid,
    /// Assignee; `None` clears the column on update.
    pub assignee_id: Option<uuid::Uuid>,
    /// Workflow status.
    pub status: String,
    /// Priority.
    pub priority: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Comment row, used for reads, inserts and updates.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = ticket_comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CommentRow {
    /// Comment identifier.
    pub id: uuid::Uuid,
    /// Ticket identifier.
    pub ticket_id: uuid::Uuid,
    /// Author.
    pub user_id: uuid::Uuid,
    /// Text.
    pub text: String,
    /// Edited flag.
    pub edited: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// History row. Entries are never updated.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = ticket_history)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct HistoryRow {
    /// Entry identifier.
    pub id: uuid::Uuid,
    /// Ticket identifier.
    pub ticket_id: uuid::Uuid,
    /// Actor.
    pub user_id: uuid::Uuid,
    /// Action name.
    pub action: String,
    /// Old value.
    pub old_value: Option<String>,
    /// New value.
    pub new_value: Option<String>,
    /// Timestamp.
    pub created_at: DateTime<Utc>,
}
