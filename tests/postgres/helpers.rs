//! Shared test helpers for `PostgreSQL` integration tests.

use std::sync::Arc;

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use helpdesk::board::adapters::postgres::PostgresBoardRepository;
use helpdesk::board::services::BoardService;
use helpdesk::identity::{
    adapters::postgres::PostgresUserRepository,
    domain::{EmailAddress, NewUser, User, UserRole},
    ports::UserRepository,
};
use helpdesk::postgres::PgPool;
use helpdesk::ticket::{adapters::postgres::PostgresTicketRepository, services::TicketService};
use mockable::DefaultClock;
use pg_embedded_setup_unpriv::TestCluster;
use tokio::runtime::Runtime;

/// Boxed error used by fixture plumbing.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// SQL creating every helpdesk table.
pub const CREATE_SCHEMA_SQL: &str =
    include_str!("../../migrations/2026-10-01-000000_create_helpdesk_tables/up.sql");

/// Template database name for the pre-migrated schema.
pub const TEMPLATE_DB: &str = "helpdesk_test_template";

/// Creates a tokio runtime for driving async repositories from sync tests.
///
/// # Panics
///
/// Panics if the runtime cannot be built.
#[must_use]
pub fn test_runtime() -> Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to create test runtime")
}

/// Ensures the template database exists with the schema applied.
///
/// # Errors
///
/// Returns an error if template creation or migration fails.
pub fn ensure_template(cluster: &TestCluster) -> Result<(), BoxError> {
    cluster
        .ensure_template_exists(TEMPLATE_DB, |db_name| {
            let url = cluster.connection().database_url(db_name);
            let mut conn = PgConnection::establish(&url).map_err(|e| eyre::eyre!("{e}"))?;
            conn.batch_execute(CREATE_SCHEMA_SQL)
                .map_err(|e| eyre::eyre!("schema migration failed: {e}"))?;
            Ok(())
        })
        .map_err(|e| Box::new(e) as BoxError)?;
    Ok(())
}

/// Creates a database from the template and returns a small pool for it.
///
/// # Errors
///
/// Returns an error if database creation or pool construction fails.
pub fn setup_pool(cluster: &TestCluster, db_name: &str) -> Result<PgPool, BoxError> {
    cluster
        .create_database_from_template(db_name, TEMPLATE_DB)
        .map_err(|e| Box::new(e) as BoxError)?;
    let url = cluster.connection().database_url(db_name);
    let manager = ConnectionManager::<PgConnection>::new(url);
    let pool = Pool::builder()
        .max_size(2)
        .build(manager)
        .map_err(|e| Box::new(e) as BoxError)?;
    Ok(pool)
}

/// Guard that drops the test database even if the test panics.
pub struct CleanupGuard<'a> {
    cluster: &'a TestCluster,
    db_name: String,
}

impl<'a> CleanupGuard<'a> {
    /// Registers `db_name` for removal when the guard drops.
    #[must_use]
    pub const fn new(cluster: &'a TestCluster, db_name: String) -> Self {
        Self { cluster, db_name }
    }
}

impl Drop for CleanupGuard<'_> {
    fn drop(&mut self) {
        if let Err(err) = self.cluster.drop_database(self.db_name.as_str()) {
            tracing::warn!(db = %self.db_name, error = %err, "failed to drop test database");
        }
    }
}

/// Repositories and services sharing one freshly migrated database.
pub struct Stores {
    /// User repository.
    pub users: Arc<PostgresUserRepository>,
    /// Board repository.
    pub boards: Arc<PostgresBoardRepository>,
    /// Ticket repository.
    pub tickets: Arc<PostgresTicketRepository>,
}

impl Stores {
    /// Builds every repository over `pool`.
    #[must_use]
    pub fn new(pool: &PgPool) -> Self {
        Self {
            users: Arc::new(PostgresUserRepository::new(pool.clone())),
            boards: Arc::new(PostgresBoardRepository::new(pool.clone())),
            tickets: Arc::new(PostgresTicketRepository::new(pool.clone())),
        }
    }

    /// Board service over these repositories.
    #[must_use]
    pub fn board_service(
        &self,
    ) -> BoardService<PostgresUserRepository, PostgresBoardRepository, DefaultClock> {
        BoardService::new(
            Arc::clone(&self.users),
            Arc::clone(&self.boards),
            Arc::new(DefaultClock),
        )
    }

    /// Ticket service over these repositories.
    #[must_use]
    pub fn ticket_service(
        &self,
    ) -> TicketService<
        PostgresUserRepository,
        PostgresBoardRepository,
        PostgresTicketRepository,
        DefaultClock,
    > {
        TicketService::new(
            Arc::clone(&self.users),
            Arc::clone(&self.boards),
            Arc::clone(&self.tickets),
            Arc::new(DefaultClock),
        )
    }
}

/// Stores an active account directly.
///
/// # Errors
///
/// Returns an error if the account cannot be built or stored.
pub fn seed_user(
    rt: &Runtime,
    users: &PostgresUserRepository,
    email: &str,
    role: UserRole,
) -> Result<User, eyre::Report> {
    let user = User::new(
        NewUser {
            email: EmailAddress::new(email)?,
            password_hash: "$argon2id$seed".to_owned(),
            full_name: format!("Seed {role}"),
            role,
        },
        &DefaultClock,
    )?;
    rt.block_on(users.store(&user))?;
    Ok(user)
}
