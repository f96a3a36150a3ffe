//! # Logger
//!
//! Installs the process-wide `tracing` subscriber used by every kiosk crate.
//!
//! * Console output is compact, colored on stdout or plain on stderr.
//! * An optional log directory adds a daily-rotated file sink behind a non-blocking writer.
//! * `RUST_LOG` directives are layered on top of the configured level.
//!
//! ## Example
//!
//! ```rust
//! use kiosk_logger::{LevelFilter, Logger};
//!
//! let _logger = Logger::builder()
//!     .name("kioskctl")
//!     .level(LevelFilter::DEBUG)
//!     .init()
//!     .unwrap();
//! ```

mod error;

pub use crate::error::{LoggerError, LoggerErrorExt};
pub use tracing::level_filters::LevelFilter;

use kiosk_domain::config::{LogLevel, LoggingConfig};
use std::fs;
use std::io;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const DEFAULT_NAME: &str = "kiosk";
const MAX_LOG_FILES: usize = 10;
const LOG_FILE_SUFFIX: &str = "log";

/// A builder for the global tracing subscriber.
#[derive(Debug)]
pub struct LoggerBuilder {
    name: String,
    level: LevelFilter,
    console: bool,
    stderr: bool,
    directory: Option<PathBuf>,
    json: bool,
    max_files: usize,
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_owned(),
            level: LevelFilter::INFO,
            console: true,
            stderr: false,
            directory: None,
            json: false,
            max_files: MAX_LOG_FILES,
        }
    }
}

impl LoggerBuilder {
    /// Prefix of the rolling log files (`<name>.<date>.log`).
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub const fn level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    #[must_use]
    pub const fn console(mut self, enabled: bool) -> Self {
        self.console = enabled;
        self
    }

    /// Sends console output to stderr, leaving stdout to the program.
    #[must_use]
    pub const fn stderr(mut self, enabled: bool) -> Self {
        self.stderr = enabled;
        self
    }

    /// Enables the file sink in `directory`, creating it on [`LoggerBuilder::init`].
    #[must_use]
    pub fn directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = Some(directory.into());
        self
    }

    /// Writes the file sink as JSON lines. Console output stays human readable.
    #[must_use]
    pub const fn json(mut self, enabled: bool) -> Self {
        self.json = enabled;
        self
    }

    #[must_use]
    pub const fn max_files(mut self, max: usize) -> Self {
        self.max_files = max;
        self
    }

    /// Applies the `[logging]` section of the application config.
    #[must_use]
    pub fn with_config(mut self, config: &LoggingConfig) -> Self {
        self.level = level_filter(config.level);
        self.directory.clone_from(&config.directory);
        self.json = config.json;
        self
    }

    /// Consumes the builder and installs the global subscriber.
    ///
    /// Keep the returned [`Logger`] alive until shutdown so buffered file output is flushed.
    ///
    /// # Errors
    /// * [`LoggerError::InvalidConfiguration`] when no sink is enabled or the settings are unusable.
    /// * [`LoggerError::Subscriber`] when a global subscriber is already installed.
    pub fn init(self) -> Result<Logger, LoggerError> {
        self.validate()?;

        let filter = EnvFilter::builder().with_default_directive(self.level.into()).from_env_lossy();
        let mut layers = Vec::new();

        if self.console {
            let console = layer().compact();
            layers.push(if self.stderr {
                console.with_writer(io::stderr).with_ansi(false).boxed()
            } else {
                console.with_ansi(true).boxed()
            });
        }

        let guard = match &self.directory {
            Some(directory) => {
                fs::create_dir_all(directory)
                    .context(format!("Creating log directory {}", directory.display()))?;

                let appender = RollingFileAppender::builder()
                    .rotation(Rotation::DAILY)
                    .filename_prefix(&self.name)
                    .filename_suffix(LOG_FILE_SUFFIX)
                    .max_log_files(self.max_files)
                    .build(directory)?;

                let (writer, guard) = tracing_appender::non_blocking(appender);
                let file_layer = layer().with_writer(writer).with_ansi(false);
                layers.push(if self.json { file_layer.json().boxed() } else { file_layer.boxed() });
                Some(guard)
            },
            None => None,
        };

        tracing_subscriber::registry().with(filter).with(layers).try_init()?;

        Ok(Logger { guard })
    }

    fn validate(&self) -> Result<(), LoggerError> {
        if self.name.trim().is_empty() {
            return Err(LoggerError::InvalidConfiguration {
                message: "Logger name cannot be empty".into(),
                context: None,
            });
        }
        if self.max_files == 0 {
            return Err(LoggerError::InvalidConfiguration {
                message: "max_files must be greater than zero".into(),
                context: None,
            });
        }
        if !self.console && self.directory.is_none() {
            return Err(LoggerError::InvalidConfiguration {
                message: "Enable console output or set a log directory".into(),
                context: None,
            });
        }
        Ok(())
    }
}

/// Handle to the installed logging system. Dropping it flushes the file sink.
#[must_use = "Dropping this handle stops the background log writer."]
#[derive(Debug)]
pub struct Logger {
    guard: Option<WorkerGuard>,
}

impl Logger {
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::default()
    }

    /// Whether a file sink (and its background writer) is active.
    #[must_use]
    pub const fn has_file_sink(&self) -> bool {
        self.guard.is_some()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.guard.is_some() {
            tracing::debug!("Flushing log file sink");
        }
    }
}

/// Maps the configured kiosk level onto a tracing filter.
#[must_use]
pub const fn level_filter(level: LogLevel) -> LevelFilter {
    match level {
        LogLevel::Debug => LevelFilter::DEBUG,
        LogLevel::Info => LevelFilter::INFO,
        LogLevel::Warning => LevelFilter::WARN,
        LogLevel::Error => LevelFilter::ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn builder_defaults_to_console_at_info() {
        let builder = Logger::builder();
        assert!(builder.console);
        assert!(!builder.stderr);
        assert_eq!(builder.level, LevelFilter::INFO);
        assert!(builder.directory.is_none());
        assert_eq!(builder.max_files, MAX_LOG_FILES);
    }

    #[test]
    fn with_config_applies_logging_section() {
        let config = LoggingConfig {
            level: LogLevel::Warning,
            directory: Some(PathBuf::from("/tmp/kiosk-logs")),
            json: true,
        };
        let builder = Logger::builder().with_config(&config);

        assert_eq!(builder.level, LevelFilter::WARN);
        assert_eq!(builder.directory.as_deref(), Some(PathBuf::from("/tmp/kiosk-logs").as_path()));
        assert!(builder.json);
    }

    #[test]
    #[serial]
    fn rejects_configuration_without_sinks() {
        let err = Logger::builder().console(false).init().unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    }

    #[test]
    fn rejects_blank_name_and_zero_retention() {
        assert!(Logger::builder().name("  ").validate().is_err());
        assert!(Logger::builder().max_files(0).validate().is_err());
    }
}
