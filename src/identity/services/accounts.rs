//! User account orchestration.

use crate::authz::role_matrix::{
    can_create_user, can_deactivate_user, can_update_user, can_update_user_role, map_role,
};
use crate::context::RequestContext;
use crate::error::{Entity, ServiceError, ServiceResult};
use crate::identity::{
    domain::{AssignableRole, EmailAddress, NewUser, User, UserDomainError, UserId},
    ports::{PasswordHasher, UserFilter, UserRepository},
};
use crate::paging::{Page, PageRequest};
use mockable::Clock;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Request payload for creating an account.
#[derive(Clone, PartialEq, Eq)]
pub struct CreateUserRequest {
    email: String,
    password: String,
    full_name: String,
    role: AssignableRole,
}

impl CreateUserRequest {
    /// Creates a request with every required field.
    #[must_use]
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        full_name: impl Into<String>,
        role: AssignableRole,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            full_name: full_name.into(),
            role,
        }
    }
}

impl std::fmt::Debug for CreateUserRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateUserRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("full_name", &self.full_name)
            .field("role", &self.role)
            .finish()
    }
}

/// Request payload for updating an account. Omitted fields stay unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateUserRequest {
    email: Option<String>,
    full_name: Option<String>,
    role: Option<AssignableRole>,
    reactivate: bool,
}

impl UpdateUserRequest {
    /// Creates an empty update.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a new email address.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Sets a new display name.
    #[must_use]
    pub fn with_full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = Some(full_name.into());
        self
    }

    /// Sets a new global role.
    #[must_use]
    pub const fn with_role(mut self, role: AssignableRole) -> Self {
        self.role = Some(role);
        self
    }

    /// Reactivates an inactive account.
    #[must_use]
    pub const fn reactivate(mut self) -> Self {
        self.reactivate = true;
        self
    }
}

/// User account orchestration service.
#[derive(Clone)]
pub struct UserService<R, H, C>
where
    R: UserRepository,
    H: PasswordHasher,
    C: Clock + Send + Sync,
{
    users: Arc<R>,
    hasher: Arc<H>,
    clock: Arc<C>,
}

impl<R, H, C> UserService<R, H, C>
where
    R: UserRepository,
    H: PasswordHasher,
    C: Clock + Send + Sync,
{
    /// Creates a new user service.
    #[must_use]
    pub const fn new(users: Arc<R>, hasher: Arc<H>, clock: Arc<C>) -> Self {
        Self {
            users,
            hasher,
            clock,
        }
    }

    /// Creates an account on behalf of the requester.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Conflict`] when the email is taken,
    /// [`ServiceError::NotFound`] when the requester does not exist,
    /// [`ServiceError::PermissionDenied`] when the requester's role may not
    /// create the requested role and [`ServiceError::InvalidState`] for
    /// malformed input.
    #[instrument(skip_all, fields(request_id = %ctx.request_id(), requester = %ctx.user_id()))]
    pub async fn create_user(
        &self,
        ctx: &RequestContext,
        request: CreateUserRequest,
    ) -> ServiceResult<User> {
        let email = EmailAddress::new(&request.email)?;
        if self.users.find_by_email(&email).await?.is_some() {
            warn!(%email, "email already in use");
            return Err(ServiceError::Conflict(format!(
                "email '{email}' is already in use"
            )));
        }

        let requester = self.load_user(ctx.user_id()).await?;
        let role = map_role(request.role);
        can_create_user(requester.role(), role)?;

        if request.password.is_empty() {
            return Err(UserDomainError::EmptyPassword.into());
        }
        let password_hash = self.hasher.hash(&request.password)?;
        let user = User::new(
            NewUser {
                email,
                password_hash,
                full_name: request.full_name,
                role,
            },
            &*self.clock,
        )?;
        self.users.store(&user).await?;

        info!(user_id = %user.id(), %role, "user created");
        Ok(user)
    }

    /// Returns an account by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] when the account does not exist.
    #[instrument(skip_all, fields(request_id = %ctx.request_id(), requester = %ctx.user_id()))]
    pub async fn get_user(&self, ctx: &RequestContext, user_id: UserId) -> ServiceResult<User> {
        self.load_user(user_id).await
    }

    /// Returns one page of accounts matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Storage`] when the listing fails.
    #[instrument(skip_all, fields(request_id = %ctx.request_id(), requester = %ctx.user_id()))]
    pub async fn list_users(
        &self,
        ctx: &RequestContext,
        filter: UserFilter,
        page: PageRequest,
    ) -> ServiceResult<Page<User>> {
        Ok(self.users.list(filter, page).await?)
    }

    /// Updates an account on behalf of the requester.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] when the target or requester does
    /// not exist, [`ServiceError::PermissionDenied`] when the requester may
    /// not touch the target or assign the role, [`ServiceError::Conflict`]
    /// when the new email belongs to another account and
    /// [`ServiceError::InvalidState`] for malformed input.
    #[instrument(skip_all, fields(request_id = %ctx.request_id(), requester = %ctx.user_id(), user_id = %user_id))]
    pub async fn update_user(
        &self,
        ctx: &RequestContext,
        user_id: UserId,
        request: UpdateUserRequest,
    ) -> ServiceResult<User> {
        let mut user = self.load_user(user_id).await?;
        let requester = self.load_user(ctx.user_id()).await?;
        can_update_user(requester.role(), user.role())?;

        if let Some(raw_email) = request.email {
            let email = EmailAddress::new(&raw_email)?;
            if &email != user.email() {
                if let Some(owner) = self.users.find_by_email(&email).await?
                    && owner.id() != user.id()
                {
                    warn!(%email, "email already in use");
                    return Err(ServiceError::Conflict(format!(
                        "email '{email}' is already in use"
                    )));
                }
                user.change_email(email, &*self.clock);
            }
        }

        if let Some(full_name) = request.full_name {
            user.rename(&full_name, &*self.clock)?;
        }

        if let Some(assignable) = request.role {
            let role = map_role(assignable);
            can_update_user_role(requester.role(), user.role(), role)?;
            user.change_role(role, &*self.clock);
        }

        if request.reactivate && !user.is_active() {
            user.activate(&*self.clock);
        }

        self.users.update(&user).await?;
        info!("user updated");
        Ok(user)
    }

    /// Deactivates an account on behalf of the requester.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] when the target or requester does
    /// not exist and [`ServiceError::PermissionDenied`] when the requester
    /// may not deactivate the target.
    #[instrument(skip_all, fields(request_id = %ctx.request_id(), requester = %ctx.user_id(), user_id = %user_id))]
    pub async fn deactivate_user(&self, ctx: &RequestContext, user_id: UserId) -> ServiceResult<()> {
        let mut user = self.load_user(user_id).await?;
        let requester = self.load_user(ctx.user_id()).await?;
        can_deactivate_user(requester.role(), user.role())?;

        user.deactivate(&*self.clock);
        self.users.update(&user).await?;
        info!("user deactivated");
        Ok(())
    }

    async fn load_user(&self, user_id: UserId) -> ServiceResult<User> {
        self.users.find_by_id(user_id).await?.ok_or_else(|| {
            warn!(%user_id, "user does not exist");
            ServiceError::not_found(Entity::User, user_id)
        })
    }
}
