//! Logging setup on top of the tracing ecosystem.
//!
//! The terminal UI owns stdout and the alternate screen, so by default events
//! are written only to a daily rolling file. With file logging disabled they
//! go to stderr instead, and the UI pauses them with [`pause_stderr`] while it
//! holds the screen.
//!
//! # Environment Variables
//!
//! - `PALAVER_LOG`: Filter directive (like `RUST_LOG`), e.g., `palaver_ui=debug`
//! - `PALAVER_LOG_FORMAT`: Output format: `pretty`, `json`, `compact`
//! - `PALAVER_LOG_DIR`: Directory for log files (default `~/.palaver/logs`)
//!
//! # Example
//!
//! ```no_run
//! use palaver_core::logging::{self, LoggingConfig};
//!
//! let _guard = logging::init_logging(Some(LoggingConfig::default()))?;
//! # Ok::<(), palaver_core::Error>(())
//! ```

use crate::Error;
use crate::config::{self, LoggingConfig as ConfigLoggingConfig};
use std::env;
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const ENV_LOG: &str = "PALAVER_LOG";
pub const ENV_LOG_FORMAT: &str = "PALAVER_LOG_FORMAT";
pub const ENV_LOG_DIR: &str = "PALAVER_LOG_DIR";

const LOG_FILE_PREFIX: &str = "palaver.log";

static STDERR_PAUSED: AtomicBool = AtomicBool::new(false);

/// Drop stderr events while `paused`; file output is unaffected
pub fn pause_stderr(paused: bool) {
    STDERR_PAUSED.store(paused, Ordering::Relaxed);
}

fn stderr_paused() -> bool {
    STDERR_PAUSED.load(Ordering::Relaxed)
}

fn stderr_open(_: &tracing::Metadata<'_>) -> bool {
    !stderr_paused()
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Pretty, human-readable output
    Pretty,
    /// JSON output (one line per event)
    #[default]
    Json,
    /// Compact, single-line output
    Compact,
}

impl LogFormat {
    pub const VALUES: &[LogFormat] = &[LogFormat::Pretty, LogFormat::Json, LogFormat::Compact];

    pub fn parse_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pretty" => Some(LogFormat::Pretty),
            "json" => Some(LogFormat::Json),
            "compact" => Some(LogFormat::Compact),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
            LogFormat::Compact => "compact",
        }
    }
}

/// Where events are written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogSink {
    Stderr,
    /// Daily rolling file in this directory; `None` uses the default location
    File(Option<PathBuf>),
}

/// Runtime logging settings resolved from the `[logging]` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Fallback filter directive when no env filter is set
    pub level: String,
    pub format: LogFormat,
    pub sink: LogSink,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: LogFormat::default(), sink: LogSink::File(None) }
    }
}

impl From<ConfigLoggingConfig> for LoggingConfig {
    fn from(config: ConfigLoggingConfig) -> Self {
        let format = LogFormat::parse_str(&config.format).unwrap_or_default();
        let sink = if config.file.enabled { LogSink::File(config.file.directory) } else { LogSink::Stderr };
        Self { level: config.level, format, sink }
    }
}

impl LoggingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_sink(mut self, sink: LogSink) -> Self {
        self.sink = sink;
        self
    }

    /// Filter directive: `PALAVER_LOG`, then `RUST_LOG`, then the configured level.
    fn filter_directive(&self, lookup: impl Fn(&str) -> Option<String>) -> String {
        lookup(ENV_LOG)
            .or_else(|| lookup("RUST_LOG"))
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| self.level.clone())
    }

    fn build_env_filter(&self) -> EnvFilter {
        let directive = self.filter_directive(|key| env::var(key).ok());
        EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("info"))
    }

    fn detect_format(&self, lookup: impl Fn(&str) -> Option<String>) -> LogFormat {
        lookup(ENV_LOG_FORMAT).and_then(|s| LogFormat::parse_str(&s)).unwrap_or(self.format)
    }

    fn resolve_log_dir(&self, lookup: impl Fn(&str) -> Option<String>) -> Result<PathBuf, Error> {
        if let Some(custom_dir) = lookup(ENV_LOG_DIR) {
            return Ok(PathBuf::from(custom_dir));
        }

        match &self.sink {
            LogSink::File(Some(dir)) => config::expand_home(dir),
            _ => Ok(config::palaver_home()?.join("logs")),
        }
    }
}

/// Install the global tracing subscriber.
///
/// The returned guard flushes the file writer on drop, so the caller must keep
/// it alive until the process exits. It is `None` when logging to stderr.
pub fn init_logging(config: Option<LoggingConfig>) -> Result<Option<WorkerGuard>, Error> {
    let config = config.unwrap_or_default();
    let env_lookup = |key: &str| env::var(key).ok();
    let env_filter = config.build_env_filter();
    let format = config.detect_format(env_lookup);

    let registry = Registry::default().with(env_filter);

    match &config.sink {
        LogSink::File(_) => {
            let log_dir = config.resolve_log_dir(env_lookup)?;
            std::fs::create_dir_all(&log_dir)
                .map_err(|e| Error::Config(format!("Failed to create log directory: {}", e)))?;

            let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            let result = match format {
                LogFormat::Pretty => registry
                    .with(fmt::layer().pretty().with_ansi(false).with_writer(non_blocking))
                    .try_init(),
                LogFormat::Json => registry.with(fmt::layer().json().with_writer(non_blocking)).try_init(),
                LogFormat::Compact => registry
                    .with(fmt::layer().compact().with_ansi(false).with_writer(non_blocking))
                    .try_init(),
            };
            result.map_err(|e| Error::Other(format!("Failed to install logger: {}", e)))?;
            Ok(Some(guard))
        }
        LogSink::Stderr => {
            let ansi = atty::is(atty::Stream::Stderr);
            let result = match format {
                LogFormat::Pretty => registry
                    .with(fmt::layer().pretty().with_writer(io::stderr.with_filter(stderr_open)).with_ansi(ansi))
                    .try_init(),
                LogFormat::Json => registry
                    .with(fmt::layer().json().with_writer(io::stderr.with_filter(stderr_open)))
                    .try_init(),
                LogFormat::Compact => registry
                    .with(fmt::layer().compact().with_writer(io::stderr.with_filter(stderr_open)).with_ansi(ansi))
                    .try_init(),
            };
            result.map_err(|e| Error::Other(format!("Failed to install logger: {}", e)))?;
            Ok(None)
        }
    }
}
