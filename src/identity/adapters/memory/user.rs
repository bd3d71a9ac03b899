//! In-memory repository for user accounts.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::identity::{
    domain::{EmailAddress, User, UserId, UserRole},
    ports::{UserFilter, UserRepository, UserRepositoryError, UserRepositoryResult},
};
use crate::paging::{Page, PageRequest};

/// Thread-safe in-memory user repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    state: Arc<RwLock<InMemoryUserState>>,
}

#[derive(Debug, Default)]
struct InMemoryUserState {
    users: HashMap<UserId, User>,
    email_index: HashMap<EmailAddress, UserId>,
}

impl InMemoryUserRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> UserRepositoryResult<RwLockReadGuard<'_, InMemoryUserState>> {
        self.state
            .read()
            .map_err(|err| UserRepositoryError::persistence(std::io::Error::other(err.to_string())))
    }

    fn write(&self) -> UserRepositoryResult<RwLockWriteGuard<'_, InMemoryUserState>> {
        self.state
            .write()
            .map_err(|err| UserRepositoryError::persistence(std::io::Error::other(err.to_string())))
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn store(&self, user: &User) -> UserRepositoryResult<()> {
        let mut state = self.write()?;
        if state.users.contains_key(&user.id()) {
            return Err(UserRepositoryError::DuplicateUser(user.id()));
        }
        if state.email_index.contains_key(user.email()) {
            return Err(UserRepositoryError::DuplicateEmail(user.email().clone()));
        }
        state.email_index.insert(user.email().clone(), user.id());
        state.users.insert(user.id(), user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> UserRepositoryResult<()> {
        let mut state = self.write()?;
        let previous_email = state
            .users
            .get(&user.id())
            .ok_or(UserRepositoryError::NotFound(user.id()))?
            .email()
            .clone();

        if let Some(owner) = state.email_index.get(user.email())
            && *owner != user.id()
        {
            return Err(UserRepositoryError::DuplicateEmail(user.email().clone()));
        }

        state.email_index.remove(&previous_email);
        state.email_index.insert(user.email().clone(), user.id());
        state.users.insert(user.id(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: UserId) -> UserRepositoryResult<Option<User>> {
        Ok(self.read()?.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> UserRepositoryResult<Option<User>> {
        let state = self.read()?;
        Ok(state
            .email_index
            .get(email)
            .and_then(|id| state.users.get(id))
            .cloned())
    }

    async fn list(&self, filter: UserFilter, page: PageRequest) -> UserRepositoryResult<Page<User>> {
        let state = self.read()?;
        let mut matching: Vec<User> = state
            .users
            .values()
            .filter(|user| filter.matches(user))
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.email().as_str().cmp(b.email().as_str()));
        Ok(page.slice(&matching))
    }

    async fn list_active_by_role(&self, role: UserRole) -> UserRepositoryResult<Vec<User>> {
        let state = self.read()?;
        let mut users: Vec<User> = state
            .users
            .values()
            .filter(|user| user.role() == role && user.is_active())
            .cloned()
            .collect();
        users.sort_by_key(User::id);
        Ok(users)
    }
}
