//! Logging configuration and initialization.
//!
//! This module sets up the tracing subscriber based on the logging
//! section of [`RouterConfig`](crate::config::RouterConfig), supporting
//! stdout, stderr, and file output with configurable formats. Embedders
//! that install their own subscriber can skip this entirely; the crate
//! only emits `tracing` events.

use crate::config::{LogFormat, LoggingConfig};
use std::fs::OpenOptions;
use std::io;
use tracing::Level;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Initializes the logging system based on configuration.
///
/// Returns a guard that must be kept alive for the duration of the
/// program to ensure all logs are flushed.
///
/// # Arguments
///
/// * `config` - The logging configuration
/// * `level_override` - Optional level override from the environment
/// * `trace_deps` - If true, include verbose logging from dependencies
///
/// # Example
///
/// ```ignore
/// let config = LoggingConfig::default();
/// let _guard = init_logging(&config, None, false)?;
/// tracing::info!("Logging initialized");
/// ```
pub fn init_logging(
    config: &LoggingConfig,
    level_override: Option<String>,
    trace_deps: bool,
) -> io::Result<Option<WorkerGuard>> {
    let level = level_override
        .as_ref()
        .unwrap_or(&config.level)
        .to_lowercase();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| build_env_filter(&level, trace_deps));

    let (writer, guard): (NonBlocking, WorkerGuard) = match config.output.to_lowercase().as_str() {
        "stdout" => tracing_appender::non_blocking(io::stdout()),
        "stderr" => tracing_appender::non_blocking(io::stderr()),
        path => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            tracing_appender::non_blocking(file)
        }
    };

    match config.format {
        LogFormat::Json => {
            let layer = fmt::layer()
                .json()
                .with_writer(writer)
                .with_span_events(FmtSpan::CLOSE)
                .with_target(config.include_target);

            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .init();
        }
        LogFormat::Compact => {
            let layer = fmt::layer()
                .compact()
                .with_writer(writer)
                .with_target(config.include_target);

            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .init();
        }
        LogFormat::Pretty => {
            let layer = fmt::layer()
                .pretty()
                .with_writer(writer)
                .with_target(config.include_target);

            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .init();
        }
    }

    Ok(Some(guard))
}

/// Builds the default env filter for a level name.
///
/// Unless `trace_deps` is set, the directive is scoped to this crate so
/// dependency noise stays out of the output.
pub fn build_env_filter(level: &str, trace_deps: bool) -> EnvFilter {
    let level = match level {
        "trace" | "debug" | "info" | "warn" | "error" => level,
        _ => "info",
    };

    if trace_deps {
        EnvFilter::new(level)
    } else {
        EnvFilter::new(format!("pac_router={level}"))
    }
}

/// Parses a log level string to a tracing Level.
pub fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}
