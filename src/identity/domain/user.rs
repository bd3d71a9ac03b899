//! User aggregate root.

use super::{EmailAddress, UserDomainError, UserId, UserRole, UserStatus};
use chrono::{DateTime, Utc};
use mockable::Clock;

/// User account aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    email: EmailAddress,
    password_hash: String,
    full_name: String,
    role: UserRole,
    status: UserStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Input for registering a new account.
///
/// The password must already be hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Normalized email address.
    pub email: EmailAddress,
    /// Encoded password hash.
    pub password_hash: String,
    /// Display name.
    pub full_name: String,
    /// Global role.
    pub role: UserRole,
}

/// Parameter object for reconstructing a persisted user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedUserData {
    /// Persisted identifier.
    pub id: UserId,
    /// Persisted email address.
    pub email: EmailAddress,
    /// Persisted password hash.
    pub password_hash: String,
    /// Persisted display name.
    pub full_name: String,
    /// Persisted global role.
    pub role: UserRole,
    /// Persisted status.
    pub status: UserStatus,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted last-modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Longest accepted full name, in characters.
    pub const MAX_FULL_NAME_LEN: usize = 255;

    /// Creates a new active account.
    ///
    /// # Errors
    ///
    /// Returns [`UserDomainError::EmptyFullName`] when the name is blank and
    /// [`UserDomainError::FullNameTooLong`] when it exceeds
    /// [`Self::MAX_FULL_NAME_LEN`].
    pub fn new(input: NewUser, clock: &impl Clock) -> Result<Self, UserDomainError> {
        let full_name = normalize_full_name(&input.full_name)?;
        let timestamp = clock.utc();
        Ok(Self {
            id: UserId::new(),
            email: input.email,
            password_hash: input.password_hash,
            full_name,
            role: input.role,
            status: UserStatus::Active,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a user from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedUserData) -> Self {
        Self {
            id: data.id,
            email: data.email,
            password_hash: data.password_hash,
            full_name: data.full_name,
            role: data.role,
            status: data.status,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the account identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the normalized email address.
    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Returns the encoded password hash.
    #[must_use]
    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    /// Returns the display name.
    #[must_use]
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Returns the global role.
    #[must_use]
    pub const fn role(&self) -> UserRole {
        self.role
    }

    /// Returns the account status.
    #[must_use]
    pub const fn status(&self) -> UserStatus {
        self.status
    }

    /// Returns `true` when the account may act.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last-modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Replaces the email address.
    pub fn change_email(&mut self, email: EmailAddress, clock: &impl Clock) {
        self.email = email;
        self.touch(clock);
    }

    /// Replaces the display name.
    ///
    /// # Errors
    ///
    /// Returns [`UserDomainError::EmptyFullName`] when the name is blank.
    pub fn rename(&mut self, full_name: &str, clock: &impl Clock) -> Result<(), UserDomainError> {
        self.full_name = normalize_full_name(full_name)?;
        self.touch(clock);
        Ok(())
    }

    /// Replaces the global role. Authorization happens before this call.
    pub fn change_role(&mut self, role: UserRole, clock: &impl Clock) {
        self.role = role;
        self.touch(clock);
    }

    /// Marks the account inactive.
    pub fn deactivate(&mut self, clock: &impl Clock) {
        self.status = UserStatus::Inactive;
        self.touch(clock);
    }

    /// Marks the account active.
    pub fn activate(&mut self, clock: &impl Clock) {
        self.status = UserStatus::Active;
        self.touch(clock);
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

fn normalize_full_name(value: &str) -> Result<String, UserDomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(UserDomainError::EmptyFullName);
    }
    if trimmed.chars().count() > User::MAX_FULL_NAME_LEN {
        return Err(UserDomainError::FullNameTooLong {
            max: User::MAX_FULL_NAME_LEN,
        });
    }
    Ok(trimmed.to_owned())
}
