//! Shared helpers for the Diesel-backed repository adapters.
//!
//! Diesel is synchronous, so every adapter offloads its work to a dedicated
//! blocking thread pool and maps pool and join failures into its own error
//! type.

use diesel::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError, PooledConnection};
use diesel::result::DatabaseErrorInformation;

/// `PostgreSQL` connection pool type shared by all adapters.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Pooled connection type for internal use.
pub(crate) type PooledConn = PooledConnection<ConnectionManager<PgConnection>>;

/// Runs a blocking task and maps join errors into the caller's error type.
pub(crate) async fn run_blocking_with<F, T, E, M>(f: F, map_err: M) -> Result<T, E>
where
    F: FnOnce() -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
    M: FnOnce(tokio::task::JoinError) -> E,
{
    tokio::task::spawn_blocking(f).await.map_err(map_err)?
}

/// Obtains a connection from the pool with a caller-provided error mapper.
pub(crate) fn get_conn_with<E, M>(pool: &PgPool, map_err: M) -> Result<PooledConn, E>
where
    M: FnOnce(PoolError) -> E,
{
    pool.get().map_err(map_err)
}

/// Returns `true` when a database error names the given constraint.
pub(crate) fn violates_constraint(info: &dyn DatabaseErrorInformation, constraint: &str) -> bool {
    info.constraint_name().is_some_and(|name| name == constraint)
}

/// Converts a page offset or limit into the `BIGINT` Diesel expects.
pub(crate) fn to_sql_count(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Converts a `COUNT(*)` result back into an unsigned total.
pub(crate) fn from_sql_count(value: i64) -> u64 {
    u64::try_from(value).unwrap_or_default()
}
