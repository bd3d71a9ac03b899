//! Diesel row models for user persistence.

use super::schema::users;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for user records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    /// Account identifier.
    pub id: uuid::Uuid,
    /// Normalized email.
    pub email: String,
    /// Password hash.
    pub password_hash: String,
    /// Display name.
    pub full_name: String,
    /// Global role.
    pub role: String,
    /// Account status.
    pub status: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert and update model for user records.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = users)]
pub struct NewUserRow {
    /// Account identifier.
    pub id: uuid::Uuid,
    /// Normalized email.
    pub email: String,
    /// Password hash.
    pub password_hash: String,
    /// Display name.
    pub full_name: String,
    /// Global role.
    pub role: String,
    /// Account status.
    pub status: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
