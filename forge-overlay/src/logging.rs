//! Logging setup for hosts that embed the overlay hooks.
//!
//! The library itself only emits `tracing` events. Hosts that have no
//! subscriber of their own can call [`init_logging`] once at startup.

use std::path::Path;

use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LoggingConfig;

/// Errors that can occur while installing the subscriber.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The filter directive could not be parsed.
    #[error("Invalid log filter '{filter}': {reason}")]
    InvalidFilter { filter: String, reason: String },

    /// The log file path has no file name component.
    #[error("Invalid log file path: {0}")]
    InvalidFile(String),

    /// A global subscriber is already set.
    #[error("Logging is already initialized")]
    AlreadyInitialized,
}

/// Build the filter: `RUST_LOG` if set, otherwise the configured directive.
pub fn build_filter(config: &LoggingConfig) -> Result<EnvFilter, LoggingError> {
    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    select_filter(env.as_deref(), &config.filter)
}

/// A valid environment directive wins; an unset or unparsable one falls back
/// to `configured`.
fn select_filter(env: Option<&str>, configured: &str) -> Result<EnvFilter, LoggingError> {
    if let Some(filter) = env.and_then(|directive| EnvFilter::try_new(directive).ok()) {
        return Ok(filter);
    }
    EnvFilter::try_new(configured).map_err(|e| LoggingError::InvalidFilter {
        filter: configured.to_string(),
        reason: e.to_string(),
    })
}

/// Install a global subscriber writing to stderr and, optionally, a file.
///
/// Returns the file writer's guard when a file is configured; keep it alive
/// for as long as logs should be flushed.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>, LoggingError> {
    let filter = build_filter(config)?;

    let (file_layer, guard) = match &config.file {
        Some(path) => {
            let (directory, file_name) = split_log_path(path)?;
            let appender = tracing_appender::rolling::never(directory, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init()
        .map_err(|_| LoggingError::AlreadyInitialized)?;

    tracing::debug!(version = crate::VERSION, "Logging initialized");
    Ok(guard)
}

fn split_log_path(path: &Path) -> Result<(&Path, &std::ffi::OsStr), LoggingError> {
    let file_name = path
        .file_name()
        .ok_or_else(|| LoggingError::InvalidFile(path.display().to_string()))?;
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    Ok((directory, file_name))
}
