//! Optional structured logging setup (spec's ambient stack, see
//! `SPEC_FULL.md`). This crate never initializes a global subscriber on
//! its own — it's a library, and the host owns that decision — but it
//! does ship the same daily-rolling-file setup the teacher's server
//! used, for hosts that want it out of the box.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Filtering level for [`open`], used when `GDBMI_LOG_LEVEL` (or
/// `RUST_LOG`) isn't set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Configuration for [`open`].
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: LogLevel,
}

impl Default for LogConfig {
    /// Reads `GDBMI_LOG_LEVEL`, falling back to `info` if unset or
    /// unrecognized.
    fn default() -> Self {
        let level = match std::env::var("GDBMI_LOG_LEVEL").as_deref() {
            Ok("trace") => LogLevel::Trace,
            Ok("debug") => LogLevel::Debug,
            Ok("warn") => LogLevel::Warn,
            Ok("error") => LogLevel::Error,
            _ => LogLevel::Info,
        };
        LogConfig { level }
    }
}

/// Initialize a global `tracing` subscriber that writes to a
/// daily-rolling file under `directory/file_name_prefix.<date>`.
/// `RUST_LOG` overrides `config.level` if present.
///
/// Returns a [`WorkerGuard`] that must be kept alive for the lifetime
/// of the process — dropping it flushes and detaches the background
/// writer thread.
pub fn open(directory: impl AsRef<Path>, file_name_prefix: &str, config: LogConfig) -> WorkerGuard {
    let file_appender = RollingFileAppender::new(Rotation::DAILY, directory, file_name_prefix);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::try_new(config.level.as_str()).unwrap_or_else(|_| EnvFilter::new("info")));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking))
        .init();

    guard
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn default_config_falls_back_to_info_without_env_var() {
        std::env::remove_var("GDBMI_LOG_LEVEL");
        assert_eq!(LogConfig::default().level.as_str(), "info");
    }
}
