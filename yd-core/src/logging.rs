//! Structured logging setup using the `tracing` ecosystem.
//!
//! Console output goes to stderr so that report rows printed on stdout stay
//! pipeable. A daily-rotated log file is written alongside.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter};

use crate::config::LoggingConfig;
use crate::error::YdResult;

const LOG_FILE_PREFIX: &str = "yandex-direct.log";

/// Guard that keeps the non-blocking log writer alive.
/// Drop this to flush and close the log file.
pub struct LogGuard {
    _guard: WorkerGuard,
}

fn env_filter(level: &str) -> EnvFilter {
    // RUST_LOG wins over the configured level when present.
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize the global tracing subscriber with console and file output.
///
/// `level` overrides `config.level` when given (the CLI's `--verbose`).
pub fn init_logging(
    config: &LoggingConfig,
    level: Option<&str>,
    log_dir: &Path,
) -> YdResult<LogGuard> {
    std::fs::create_dir_all(log_dir)?;

    let level = level.unwrap_or(&config.level);
    let (non_blocking, guard) =
        tracing_appender::non_blocking(rolling::daily(log_dir, LOG_FILE_PREFIX));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    if config.json_output {
        let file_layer = fmt::layer()
            .with_writer(non_blocking)
            .json()
            .with_target(true)
            .with_file(true)
            .with_line_number(true);

        let result = tracing_subscriber::registry()
            .with(env_filter(level))
            .with(console_layer)
            .with(file_layer)
            .try_init();
        report_existing_subscriber(result);
    } else {
        let file_layer = fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .with_line_number(true);

        let result = tracing_subscriber::registry()
            .with(env_filter(level))
            .with(console_layer)
            .with(file_layer)
            .try_init();
        report_existing_subscriber(result);
    }

    tracing::debug!("logging initialized at level={level}, dir={}", log_dir.display());

    Ok(LogGuard { _guard: guard })
}

/// Initialize a console-only logger, used when the log directory is unusable.
pub fn init_console_logging(level: &str) {
    let result = tracing_subscriber::registry()
        .with(env_filter(level))
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .try_init();
    report_existing_subscriber(result);
}

/// A global subscriber can only be set once per process; a later attempt
/// keeps the first one and notes it.
fn report_existing_subscriber(result: Result<(), TryInitError>) -> bool {
    match result {
        Ok(()) => true,
        Err(e) => {
            tracing::debug!("keeping the existing tracing subscriber: {e}");
            false
        }
    }
}
