//! Logging - tracing subscriber setup
//!
//! Console output always; daily-rolling files when enabled. `RUST_LOG`
//! overrides the configured level.

use crate::constants::LOG_FILE_PREFIX;
use crate::domain::LoggingConfig;
use crate::error::{Error, Result};
use crate::helpers::{ensure_dir, get_or_create_data_dir, is_development};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Install the global subscriber
///
/// The returned guard flushes the file writer on drop and must live until
/// exit. Calling this twice is an error.
pub fn init_tracing(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let console = fmt::layer()
        .with_target(true)
        .with_file(is_development())
        .with_line_number(is_development())
        .with_filter(env_filter(&config.level))
        .boxed();
    let mut layers = vec![console];

    let guard = if config.file {
        let dir = match &config.directory {
            Some(dir) => ensure_dir(dir)?,
            None => ensure_dir(&get_or_create_data_dir()?.join("logs"))?,
        };
        let appender = tracing_appender::rolling::daily(&dir, LOG_FILE_PREFIX);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        layers.push(
            fmt::layer()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(env_filter(&config.level))
                .boxed(),
        );
        Some(guard)
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .map_err(|e| Error::Invalid {
            message: format!("Failed to install tracing subscriber: {e}"),
        })?;

    Ok(guard)
}
