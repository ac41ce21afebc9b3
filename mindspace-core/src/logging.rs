//! File logging for mindspace.
//!
//! Logs roll daily under `$XDG_STATE_HOME/mindspace/` as
//! `mindspace.YYYY-MM-DD.log`. `RUST_LOG` takes precedence over the
//! configured level.

use crate::config::{Config, LoggingConfig};
use crate::error::{Error, Result};
use std::path::Path;
use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Keeps the background log writer alive. Pending lines are flushed on drop.
pub struct LoggingGuard {
    _worker: WorkerGuard,
}

/// Install the global subscriber, writing to the XDG state directory.
pub fn init(config: &LoggingConfig) -> Result<LoggingGuard> {
    init_in(&Config::state_dir(), config)
}

/// Install the global subscriber, writing rolling log files to `dir`.
///
/// Fails if the configured level is not a level name, or if a global
/// subscriber is already installed in this process.
pub fn init_in(dir: &Path, config: &LoggingConfig) -> Result<LoggingGuard> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::default().add_directive(parse_level(&config.level)?.into()),
    };

    std::fs::create_dir_all(dir)?;
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("mindspace")
        .filename_suffix("log")
        .max_log_files(config.max_files.max(1))
        .build(dir)
        .map_err(|e| Error::Config(format!("cannot open log directory {}: {}", dir.display(), e)))?;
    let (writer, worker) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_file(true)
                .with_line_number(true),
        )
        .try_init()
        .map_err(|e| Error::Config(format!("log subscriber not installed: {}", e)))?;

    tracing::debug!(dir = %dir.display(), level = %config.level, "Logging started");
    Ok(LoggingGuard { _worker: worker })
}

/// Parse a configured level name such as `info` or `debug`.
fn parse_level(level: &str) -> Result<LevelFilter> {
    level
        .trim()
        .parse::<LevelFilter>()
        .map_err(|_| Error::Config(format!("unknown log level: {}", level)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug").unwrap(), LevelFilter::DEBUG);
        assert_eq!(parse_level(" warn ").unwrap(), LevelFilter::WARN);
        assert_eq!(parse_level("off").unwrap(), LevelFilter::OFF);

        let err = parse_level("loud").unwrap_err();
        assert!(err.to_string().contains("unknown log level: loud"));
    }

    #[test]
    fn test_second_init_is_reported() {
        let dir = TempDir::new().unwrap();
        let config = LoggingConfig::default();

        let _first = init_in(dir.path(), &config);
        let second = init_in(dir.path(), &config);
        let Err(err) = second else {
            panic!("a second subscriber must not install silently");
        };
        assert!(err.to_string().contains("log subscriber not installed"));
    }
}
