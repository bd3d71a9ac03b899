//! Repository port for user account persistence and lookup.

use crate::identity::domain::{EmailAddress, User, UserId, UserRole, UserStatus};
use crate::paging::{Page, PageRequest};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for user repository operations.
pub type UserRepositoryResult<T> = Result<T, UserRepositoryError>;

/// Optional criteria for listing users.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserFilter {
    /// Only return users with this global role.
    pub role: Option<UserRole>,
    /// Only return users with this status.
    pub status: Option<UserStatus>,
}

impl UserFilter {
    /// Restricts the listing to one global role.
    #[must_use]
    pub const fn with_role(mut self, role: UserRole) -> Self {
        self.role = Some(role);
        self
    }

    /// Restricts the listing to one status.
    #[must_use]
    pub const fn with_status(mut self, status: UserStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Returns `true` when `user` satisfies every criterion.
    #[must_use]
    pub fn matches(&self, user: &User) -> bool {
        self.role.is_none_or(|role| user.role() == role)
            && self.status.is_none_or(|status| user.status() == status)
    }
}

/// User persistence contract.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Stores a new user.
    ///
    /// # Errors
    ///
    /// Returns [`UserRepositoryError::DuplicateEmail`] when the email is
    /// taken or [`UserRepositoryError::DuplicateUser`] when the identifier
    /// exists.
    async fn store(&self, user: &User) -> UserRepositoryResult<()>;

    /// Persists changes to an existing user.
    ///
    /// # Errors
    ///
    /// Returns [`UserRepositoryError::NotFound`] when the user does not exist
    /// or [`UserRepositoryError::DuplicateEmail`] when the new email belongs
    /// to another account.
    async fn update(&self, user: &User) -> UserRepositoryResult<()>;

    /// Finds a user by identifier.
    async fn find_by_id(&self, id: UserId) -> UserRepositoryResult<Option<User>>;

    /// Finds a user by normalized email.
    async fn find_by_email(&self, email: &EmailAddress) -> UserRepositoryResult<Option<User>>;

    /// Returns one page of users matching `filter`, ordered by email.
    async fn list(&self, filter: UserFilter, page: PageRequest) -> UserRepositoryResult<Page<User>>;

    /// Returns every active user holding `role`.
    async fn list_active_by_role(&self, role: UserRole) -> UserRepositoryResult<Vec<User>>;
}

/// Errors returned by user repository implementations.
#[derive(Debug, Clone, Error)]
pub enum UserRepositoryError {
    /// Another account already uses the email address.
    #[error("duplicate email: {0}")]
    DuplicateEmail(EmailAddress),

    /// A user with the same identifier already exists.
    #[error("duplicate user identifier: {0}")]
    DuplicateUser(UserId),

    /// The user was not found.
    #[error("user not found: {0}")]
    NotFound(UserId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl UserRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
