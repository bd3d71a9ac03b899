//! Diesel row models for board persistence.

use super::schema::{board_memberships, boards};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Board row, used for reads, inserts and updates.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = boards)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct BoardRow {
    /// Board identifier.
    pub id: uuid::Uuid,
    /// Board code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Creating user.
    pub created_by: uuid::Uuid,
    /// Lifecycle status.
    pub status: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Membership row, used for reads, inserts and updates.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = board_memberships)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MembershipRow {
    /// Membership identifier.
    pub id: uuid::Uuid,
    /// Board identifier.
    pub board_id: uuid::Uuid,
    /// Member identifier.
    pub user_id: uuid::Uuid,
    /// Membership role.
    pub role: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
