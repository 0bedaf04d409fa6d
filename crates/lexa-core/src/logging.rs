//! Logging setup.
//!
//! Logs go to a daily-rolling file under `${LEXA_HOME}/logs` so stdout stays
//! clean for streamed replies. The filter comes from the `LEXA_LOG`
//! environment variable (`info` by default).

use std::fs;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const LOG_FILTER_ENV: &str = "LEXA_LOG";

/// Initializes file logging.
///
/// Returns the worker guard; the caller must hold it for the lifetime of the
/// process or buffered lines are dropped on exit.
pub fn init() -> Result<WorkerGuard> {
    let dir = crate::config::paths::logs_dir();
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let file = tracing_appender::rolling::daily(&dir, "lexa.log");
    let (writer, guard) = tracing_appender::non_blocking(file);

    let filter =
        EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    // A second init in the same process (tests) is not an error.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init();

    Ok(guard)
}
