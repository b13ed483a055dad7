//! # turnloop-logging
//!
//! Logging for the turnloop interaction loop.
//!
//! ## Key Types
//!
//! - [`Logger`] - A [`LoopObserver`](turnloop_core::LoopObserver) that renders loop events
//! - [`LogFormat`] - Output formats (Pretty, JSON, Compact)
//! - [`SessionFile`] - Per-run JSONL event log
//! - [`TurnloopConfig`] - `turnloop.toml` loading
//!
//! ## Log Formats
//!
//! - `Pretty` - Human-readable colored output
//! - `JSON` - Structured JSON lines
//! - `Compact` - Minimal text output

mod config;
mod logger;
mod session;

pub use config::{LoggingConfig, TurnloopConfig, CONFIG_FILE_NAME};
pub use logger::{LogFormat, Logger};
pub use session::{default_log_dir, SessionFile};

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize tracing for the application
pub fn init_tracing(level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json().with_target(false).with_writer(std::io::stderr))
                .init();
        }
        LogFormat::Pretty | LogFormat::Compact => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
                .init();
        }
    }
}

/// Initialize tracing with an additional daily-rolling JSON file in `dir`.
///
/// Keep the returned guard alive for as long as logs should be flushed.
pub fn init_tracing_with_file(level: &str, format: LogFormat, dir: &Path) -> WorkerGuard {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let (file_writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, "turnloop.log"));
    let file_layer = fmt::layer()
        .json()
        .with_ansi(false)
        .with_writer(file_writer)
        .boxed();

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(file_layer)
                .with(filter)
                .with(fmt::layer().json().with_target(false).with_writer(std::io::stderr))
                .init();
        }
        LogFormat::Pretty | LogFormat::Compact => {
            tracing_subscriber::registry()
                .with(file_layer)
                .with(filter)
                .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
                .init();
        }
    }

    guard
}
