//! Structured logging setup.

use crate::config::{LogConfig, LogFormat};
use thiserror::Error;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Error returned when a global subscriber is already installed.
#[derive(Debug, Error)]
#[error("failed to install tracing subscriber: {0}")]
pub struct TelemetryError(#[from] tracing_subscriber::util::TryInitError);

/// Installs the global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over [`LogConfig::filter`].
///
/// # Errors
///
/// Returns [`TelemetryError`] if a global subscriber has already been set.
pub fn init(config: &LogConfig) -> Result<(), TelemetryError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.filter));

    let registry = tracing_subscriber::registry().with(filter);
    match config.format {
        LogFormat::Compact => registry
            .with(tracing_subscriber::fmt::layer().compact())
            .try_init()?,
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()?,
    }
    Ok(())
}
