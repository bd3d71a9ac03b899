//! Runtime configuration loaded from the environment.
//!
//! # Environment Variables
//!
//! - `HELPDESK_DATABASE_URL`: `PostgreSQL` connection string (required)
//! - `HELPDESK_DB_POOL_SIZE`: maximum pooled connections (default: 10)
//! - `HELPDESK_LOG_FILTER`: `tracing` filter directive used when `RUST_LOG`
//!   is unset (default: `helpdesk=info`)
//! - `HELPDESK_LOG_FORMAT`: `compact` or `json` (default: `compact`)
//!
//! A `.env` file in the working directory is read first when present.

use crate::postgres::PgPool;
use diesel::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use std::env;
use thiserror::Error;

const DATABASE_URL: &str = "HELPDESK_DATABASE_URL";
const DB_POOL_SIZE: &str = "HELPDESK_DB_POOL_SIZE";
const LOG_FILTER: &str = "HELPDESK_LOG_FILTER";
const LOG_FORMAT: &str = "HELPDESK_LOG_FORMAT";

const DEFAULT_POOL_SIZE: u32 = 10;
const DEFAULT_LOG_FILTER: &str = "helpdesk=info";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required variable is not set.
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    /// A variable is set but cannot be parsed.
    #[error("invalid value '{value}' for {name}: {reason}")]
    Invalid {
        /// Variable name.
        name: &'static str,
        /// Raw value that failed to parse.
        value: String,
        /// Human-readable parse failure.
        reason: String,
    },

    /// The connection pool could not be built.
    #[error("failed to build database pool: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
}

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable single-line output.
    #[default]
    Compact,
    /// One JSON object per line.
    Json,
}

impl TryFrom<&str> for LogFormat {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            other => Err(format!("expected 'compact' or 'json', got '{other}'")),
        }
    }
}

/// Database settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Maximum number of pooled connections.
    pub pool_size: u32,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Fallback filter directive when `RUST_LOG` is unset.
    pub filter: String,
    /// Output format.
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_FILTER.to_owned(),
            format: LogFormat::default(),
        }
    }
}

/// Complete application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Database settings.
    pub database: DatabaseConfig,
    /// Logging settings.
    pub log: LogConfig,
}

impl AppConfig {
    /// Loads configuration from the process environment, reading `.env`
    /// first when present.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a required variable is missing or a
    /// value cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env file is the normal production case.
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            tracing::warn!(error = %err, "ignoring unreadable .env file");
        }
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a required variable is missing or a
    /// value cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let url = lookup(DATABASE_URL)
            .filter(|value| !value.trim().is_empty())
            .ok_or(ConfigError::Missing(DATABASE_URL))?;

        let pool_size = match lookup(DB_POOL_SIZE) {
            None => DEFAULT_POOL_SIZE,
            Some(raw) => parse_pool_size(&raw)?,
        };

        let filter = lookup(LOG_FILTER).unwrap_or_else(|| DEFAULT_LOG_FILTER.to_owned());
        let format = match lookup(LOG_FORMAT) {
            None => LogFormat::default(),
            Some(raw) => LogFormat::try_from(raw.as_str()).map_err(|reason| {
                ConfigError::Invalid {
                    name: LOG_FORMAT,
                    value: raw.clone(),
                    reason,
                }
            })?,
        };

        Ok(Self {
            database: DatabaseConfig { url, pool_size },
            log: LogConfig { filter, format },
        })
    }

    /// Builds the Diesel connection pool described by this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Pool`] when the pool cannot be created.
    pub fn build_pool(&self) -> Result<PgPool, ConfigError> {
        let manager = ConnectionManager::<PgConnection>::new(&self.database.url);
        let pool = Pool::builder()
            .max_size(self.database.pool_size)
            .build(manager)?;
        Ok(pool)
    }
}

fn parse_pool_size(raw: &str) -> Result<u32, ConfigError> {
    let invalid = |reason: String| ConfigError::Invalid {
        name: DB_POOL_SIZE,
        value: raw.to_owned(),
        reason,
    };
    let size = raw
        .trim()
        .parse::<u32>()
        .map_err(|err| invalid(err.to_string()))?;
    if size == 0 {
        return Err(invalid("pool size must be positive".to_owned()));
    }
    Ok(size)
}
