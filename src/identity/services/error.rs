//! Mapping of identity failures onto the service error taxonomy.

use crate::error::{Entity, ServiceError};
use crate::identity::domain::UserDomainError;
use crate::identity::ports::{PasswordHashError, UserRepositoryError};

impl From<UserRepositoryError> for ServiceError {
    fn from(err: UserRepositoryError) -> Self {
        match err {
            UserRepositoryError::DuplicateEmail(email) => {
                Self::Conflict(format!("email '{email}' is already in use"))
            }
            UserRepositoryError::DuplicateUser(id) => {
                Self::Conflict(format!("user {id} already exists"))
            }
            UserRepositoryError::NotFound(id) => Self::not_found(Entity::User, id),
            UserRepositoryError::Persistence(_) => Self::storage(err),
        }
    }
}

impl From<UserDomainError> for ServiceError {
    fn from(err: UserDomainError) -> Self {
        Self::InvalidState(err.to_string())
    }
}

impl From<PasswordHashError> for ServiceError {
    fn from(err: PasswordHashError) -> Self {
        Self::storage(err)
    }
}
