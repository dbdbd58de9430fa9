//! Logging setup on top of the tracing ecosystem.
//!
//! # Environment Variables
//!
//! - `INSHORT_LOG`: Filter directive (like `RUST_LOG`), e.g., `inshort_ui=debug`
//! - `INSHORT_LOG_FORMAT`: Output format for stderr: `pretty`, `json`, `compact`
//! - `INSHORT_LOG_DIR`: Directory for the rolling log file
//!
//! # Configuration
//!
//! ```toml
//! [logging]
//! level = "warn"
//! format = "pretty"
//! max_body_chars = 500
//!
//! [logging.file]
//! enabled = false
//! level = "debug"
//! ```
//!
//! The interactive client owns the terminal, so it calls [`LoggingConfig::without_stderr`]
//! and relies on the file sink alone.
//!
//! # Example
//!
//! ```no_run
//! use inshort_core::logging::{self, LoggingConfig};
//!
//! let _guard = logging::init_logging(Some(LoggingConfig::default().with_level("info")))?;
//! # Ok::<(), inshort_core::Error>(())
//! ```

use crate::Error;
use crate::config::{FileLoggingConfig, LoggingConfig as ConfigLoggingConfig};
use std::env;
use std::io;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Log output format for stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Pretty, human-readable output with colors (default for TTY)
    #[default]
    Pretty,
    /// JSON output (one line per event)
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

/// Runtime logging settings, built from the `[logging]` config section.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Default log level for stderr output.
    pub level: String,
    /// Output format for stderr.
    pub format: LogFormat,
    /// Whether events are written to stderr at all.
    pub stderr: bool,
    /// File logging configuration (optional).
    pub file: Option<FileLoggingConfig>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "warn".to_string(), format: LogFormat::default(), stderr: true, file: None }
    }
}

impl From<ConfigLoggingConfig> for LoggingConfig {
    fn from(config: ConfigLoggingConfig) -> Self {
        let format = LogFormat::parse_str(&config.format).unwrap_or_default();

        Self {
            level: config.level,
            format,
            stderr: true,
            file: if config.file.enabled { Some(config.file) } else { None },
        }
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

    pub fn with_file_logging(mut self, config: FileLoggingConfig) -> Self {
        self.file = Some(config);
        self
    }

    /// Route events only to the file sink, enabling it with defaults if needed.
    pub fn without_stderr(mut self) -> Self {
        self.stderr = false;
        if self.file.is_none() {
            self.file = Some(FileLoggingConfig { enabled: true, ..FileLoggingConfig::default() });
        }
        self
    }

    fn filter_directive(&self, fallback: &str) -> String {
        env::var("INSHORT_LOG")
            .ok()
            .or_else(|| env::var("RUST_LOG").ok())
            .unwrap_or_else(|| fallback.to_string())
    }

    fn is_tty() -> bool {
        atty::is(atty::Stream::Stderr)
    }

    /// Determine the appropriate format for stderr output.
    fn detect_format(&self) -> LogFormat {
        if let Ok(fmt_str) = env::var("INSHORT_LOG_FORMAT")
            && let Some(fmt) = LogFormat::parse_str(&fmt_str)
        {
            return fmt;
        }

        if self.format != LogFormat::Pretty {
            return self.format;
        }

        if Self::is_tty() { LogFormat::Pretty } else { LogFormat::Compact }
    }

    /// Get the log directory path.
    pub fn log_dir() -> Result<PathBuf, Error> {
        if let Ok(custom_dir) = env::var("INSHORT_LOG_DIR") {
            return Ok(PathBuf::from(custom_dir));
        }

        dirs::data_local_dir()
            .map(|dir| dir.join("inshort").join("logs"))
            .ok_or_else(|| Error::Config("could not determine a data directory for logs".to_string()))
    }
}

/// Keeps the non-blocking file writer alive; drop it on shutdown to flush.
#[derive(Default)]
pub struct LogGuard {
    _file: Option<WorkerGuard>,
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Initialize the global tracing subscriber.
///
/// Sets up an env-based filter, formatted stderr output (unless disabled) and an optional
/// daily-rolling JSON log file.
pub fn init_logging(config: Option<LoggingConfig>) -> Result<LogGuard, Error> {
    let config = config.unwrap_or_default();
    let mut layers: Vec<BoxedLayer> = Vec::new();
    let mut guard = LogGuard::default();

    if config.stderr {
        let filter = EnvFilter::new(config.filter_directive(&config.level));
        let layer: BoxedLayer = match config.detect_format() {
            LogFormat::Pretty => fmt::layer().pretty().with_writer(io::stderr).with_ansi(true).with_filter(filter).boxed(),
            LogFormat::Json => fmt::layer().json().with_writer(io::stderr).with_filter(filter).boxed(),
            LogFormat::Compact => fmt::layer().compact().with_writer(io::stderr).with_filter(filter).boxed(),
        };
        layers.push(layer);
    }

    if let Some(file_config) = &config.file {
        let log_dir = LoggingConfig::log_dir()?;
        std::fs::create_dir_all(&log_dir)
            .map_err(|e| Error::Config(format!("Failed to create log directory: {}", e)))?;

        let file_appender = tracing_appender::rolling::daily(log_dir, "inshort.log");
        let (non_blocking, worker_guard) = tracing_appender::non_blocking(file_appender);
        guard._file = Some(worker_guard);

        let filter = EnvFilter::new(config.filter_directive(&file_config.level));
        layers.push(fmt::layer().json().with_writer(non_blocking).with_filter(filter).boxed());
    }

    Registry::default()
        .with(layers)
        .try_init()
        .map_err(|e| Error::Config(format!("Failed to install tracing subscriber: {}", e)))?;

    Ok(guard)
}

/// Shorten a response body for inclusion in a log event.
pub fn redact_body(body: &str, max_chars: usize) -> String {
    let total = body.chars().count();
    if total <= max_chars {
        return body.to_string();
    }

    let mut truncated = body.chars().take(max_chars).collect::<String>();
    truncated.push_str(&format!("... ({} total chars)", total));
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_from_str() {
        assert_eq!(LogFormat::parse_str("pretty"), Some(LogFormat::Pretty));
        assert_eq!(LogFormat::parse_str("JSON"), Some(LogFormat::Json));
        assert_eq!(LogFormat::parse_str("compact"), Some(LogFormat::Compact));
        assert_eq!(LogFormat::parse_str("invalid"), None);
    }

    #[test]
    fn test_log_format_as_str() {
        for format in LogFormat::VALUES {
            assert_eq!(LogFormat::parse_str(format.as_str()), Some(*format));
        }
    }

    #[test]
    fn test_logging_config_default() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "warn");
        assert_eq!(config.format, LogFormat::Pretty);
        assert!(config.stderr);
        assert!(config.file.is_none());
    }

    #[test]
    fn test_logging_config_builder() {
        let config = LoggingConfig::new().with_level("debug").with_format(LogFormat::Json);
        assert_eq!(config.level, "debug");
        assert_eq!(config.format, LogFormat::Json);
    }

    #[test]
    fn test_without_stderr_enables_file() {
        let config = LoggingConfig::new().without_stderr();
        assert!(!config.stderr);
        let file = config.file.unwrap();
        assert!(file.enabled);
        assert_eq!(file.level, "debug");
    }

    #[test]
    fn test_without_stderr_keeps_existing_file_config() {
        let config = LoggingConfig::new()
            .with_file_logging(FileLoggingConfig { enabled: true, level: "trace".to_string() })
            .without_stderr();
        assert_eq!(config.file.unwrap().level, "trace");
    }

    #[test]
    fn test_from_config_section() {
        let section = ConfigLoggingConfig {
            level: "info".to_string(),
            format: "compact".to_string(),
            file: FileLoggingConfig { enabled: true, level: "debug".to_string() },
            max_body_chars: 100,
        };
        let config = LoggingConfig::from(section);
        assert_eq!(config.level, "info");
        assert_eq!(config.format, LogFormat::Compact);
        assert!(config.file.is_some());
    }

    #[test]
    fn test_from_config_section_disabled_file_and_bad_format() {
        let section = ConfigLoggingConfig { format: "fancy".to_string(), ..ConfigLoggingConfig::default() };
        let config = LoggingConfig::from(section);
        assert_eq!(config.format, LogFormat::Pretty);
        assert!(config.file.is_none());
    }

    #[test]
    fn test_redact_body_short() {
        assert_eq!(redact_body("{\"ok\":1}", 100), "{\"ok\":1}");
    }

    #[test]
    fn test_redact_body_truncates() {
        let redacted = redact_body("abcdefghijklmnopqrstuvwxyz", 10);
        assert!(redacted.starts_with("abcdefghij..."));
        assert!(redacted.contains("26 total chars"));
    }

    #[test]
    fn test_redact_body_counts_chars_not_bytes() {
        let body = "ééééé";
        assert_eq!(redact_body(body, 5), body);
    }
}
