//! `PostgreSQL` repository implementation for user accounts.

use super::{
    models::{NewUserRow, UserRow},
    schema::users,
};
use crate::identity::{
    domain::{EmailAddress, PersistedUserData, User, UserId, UserRole, UserStatus},
    ports::{UserFilter, UserRepository, UserRepositoryError, UserRepositoryResult},
};
use crate::paging::{Page, PageRequest};
use crate::postgres::{
    PgPool, from_sql_count, get_conn_with, run_blocking_with, to_sql_count, violates_constraint,
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

const EMAIL_UNIQUE: &str = "idx_users_email_unique";

/// `PostgreSQL`-backed user repository.
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a new repository from a connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> UserRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> UserRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        run_blocking_with(
            move || {
                let mut connection = get_conn_with(&pool, UserRepositoryError::persistence)?;
                f(&mut connection)
            },
            UserRepositoryError::persistence,
        )
        .await
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn store(&self, user: &User) -> UserRepositoryResult<()> {
        let row = to_row(user);
        let user_id = user.id();
        let email = user.email().clone();
        self.run_blocking(move |connection| {
            diesel::insert_into(users::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| map_write_error(err, user_id, &email))?;
            Ok(())
        })
        .await
    }

    async fn update(&self, user: &User) -> UserRepositoryResult<()> {
        let row = to_row(user);
        let user_id = user.id();
        let email = user.email().clone();
        self.run_blocking(move |connection| {
            let updated = diesel::update(users::table.filter(users::id.eq(user_id.into_inner())))
                .set(&row)
                .execute(connection)
                .map_err(|err| map_write_error(err, user_id, &email))?;
            if updated == 0 {
                return Err(UserRepositoryError::NotFound(user_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: UserId) -> UserRepositoryResult<Option<User>> {
        self.run_blocking(move |connection| {
            let row = users::table
                .filter(users::id.eq(id.into_inner()))
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()
                .map_err(UserRepositoryError::persistence)?;
            row.map(row_to_user).transpose()
        })
        .await
    }

    async fn find_by_email(&self, email: &EmailAddress) -> UserRepositoryResult<Option<User>> {
        let lookup = email.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = users::table
                .filter(users::email.eq(lookup))
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()
                .map_err(UserRepositoryError::persistence)?;
            row.map(row_to_user).transpose()
        })
        .await
    }

    async fn list(&self, filter: UserFilter, page: PageRequest) -> UserRepositoryResult<Page<User>> {
        self.run_blocking(move |connection| {
            let total = filtered(filter)
                .count()
                .get_result::<i64>(connection)
                .map_err(UserRepositoryError::persistence)?;
            let rows = filtered(filter)
                .order(users::email.asc())
                .offset(to_sql_count(page.offset()))
                .limit(to_sql_count(page.limit()))
                .select(UserRow::as_select())
                .load::<UserRow>(connection)
                .map_err(UserRepositoryError::persistence)?;
            let items = rows
                .into_iter()
                .map(row_to_user)
                .collect::<UserRepositoryResult<Vec<_>>>()?;
            Ok(Page::new(items, from_sql_count(total), page))
        })
        .await
    }

    async fn list_active_by_role(&self, role: UserRole) -> UserRepositoryResult<Vec<User>> {
        self.run_blocking(move |connection| {
            let rows = users::table
                .filter(users::role.eq(role.as_str()))
                .filter(users::status.eq(UserStatus::Active.as_str()))
                .order(users::id.asc())
                .select(UserRow::as_select())
                .load::<UserRow>(connection)
                .map_err(UserRepositoryError::persistence)?;
            rows.into_iter().map(row_to_user).collect()
        })
        .await
    }
}

fn filtered(filter: UserFilter) -> users::BoxedQuery<'static, diesel::pg::Pg> {
    let mut query = users::table.into_boxed();
    if let Some(role) = filter.role {
        query = query.filter(users::role.eq(role.as_str()));
    }
    if let Some(status) = filter.status {
        query = query.filter(users::status.eq(status.as_str()));
    }
    query
}

fn map_write_error(err: DieselError, user_id: UserId, email: &EmailAddress) -> UserRepositoryError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
            if violates_constraint(info.as_ref(), EMAIL_UNIQUE) =>
        {
            UserRepositoryError::DuplicateEmail(email.clone())
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            UserRepositoryError::DuplicateUser(user_id)
        }
        _ => UserRepositoryError::persistence(err),
    }
}

fn to_row(user: &User) -> NewUserRow {
    NewUserRow {
        id: user.id().into_inner(),
        email: user.email().as_str().to_owned(),
        password_hash: user.password_hash().to_owned(),
        full_name: user.full_name().to_owned(),
        role: user.role().as_str().to_owned(),
        status: user.status().as_str().to_owned(),
        created_at: user.created_at(),
        updated_at: user.updated_at(),
    }
}

fn row_to_user(row: UserRow) -> UserRepositoryResult<User> {
    let email = EmailAddress::new(&row.email).map_err(UserRepositoryError::persistence)?;
    let role = UserRole::try_from(row.role.as_str()).map_err(UserRepositoryError::persistence)?;
    let status =
        UserStatus::try_from(row.status.as_str()).map_err(UserRepositoryError::persistence)?;
    Ok(User::from_persisted(PersistedUserData {
        id: UserId::from_uuid(row.id),
        email,
        password_hash: row.password_hash,
        full_name: row.full_name,
        role,
        status,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}
