//! Logging setup on top of the tracing ecosystem.
//!
//! # Environment Variables
//!
//! - `OLLAIX_LOG`: Filter directive (like `RUST_LOG`), e.g., `ollaix=debug`
//! - `OLLAIX_LOG_FORMAT`: Output format for stderr: `pretty`, `json`, `compact`
//! - `OLLAIX_LOG_DIR`: Directory for log files (default `~/.ollaix/logs/`)
//!
//! # Configuration
//!
//! ```toml
//! [logging]
//! level = "warn"
//! format = "pretty"
//!
//! [logging.file]
//! enabled = false
//! ```
//!
//! The terminal UI owns stderr while it runs, so it initializes logging with
//! stderr output disabled and the rolling file forced on.
//!
//! # Example
//!
//! ```no_run
//! use ollaix_core::logging;
//!
//! let _guard = logging::init_logging(None)?;
//! # Ok::<(), ollaix_core::Error>(())
//! ```

use crate::Error;
use crate::config::LoggingConfig as ConfigLoggingConfig;
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

/// Resolved logging options
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Default filter directive
    pub level: String,
    /// Output format for stderr
    pub format: LogFormat,
    /// Write JSON lines to a daily rolling file
    pub file: bool,
    /// Emit to stderr at all
    pub stderr: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "warn".to_string(), format: LogFormat::default(), file: false, stderr: true }
    }
}

impl From<ConfigLoggingConfig> for LoggingConfig {
    fn from(config: ConfigLoggingConfig) -> Self {
        let format = LogFormat::parse_str(&config.format).unwrap_or_default();
        Self { level: config.level, format, file: config.file.enabled, stderr: true }
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

    pub fn with_file_logging(mut self, enabled: bool) -> Self {
        self.file = enabled;
        self
    }

    /// File-only output, for when the terminal belongs to the UI
    pub fn for_tui(mut self) -> Self {
        self.stderr = false;
        self.file = true;
        self
    }

    fn build_env_filter(&self) -> EnvFilter {
        let filter = env::var("OLLAIX_LOG")
            .ok()
            .or_else(|| env::var("RUST_LOG").ok())
            .unwrap_or_else(|| self.level.clone());

        EnvFilter::try_new(&filter).unwrap_or_else(|_| EnvFilter::new("warn"))
    }

    fn is_tty() -> bool {
        atty::is(atty::Stream::Stderr)
    }

    /// `OLLAIX_LOG_FORMAT` wins, then the configured format on a TTY, compact otherwise
    fn detect_format(&self) -> LogFormat {
        if let Ok(fmt_str) = env::var("OLLAIX_LOG_FORMAT")
            && let Some(fmt) = LogFormat::parse_str(&fmt_str)
        {
            return fmt;
        }

        if Self::is_tty() { self.format } else { LogFormat::Compact }
    }

    /// Directory for rolling log files
    pub fn log_dir() -> Result<PathBuf, Error> {
        if let Ok(custom_dir) = env::var("OLLAIX_LOG_DIR") {
            return Ok(PathBuf::from(custom_dir));
        }

        let home = dirs::home_dir().ok_or_else(|| Error::Config("Could not determine home directory".to_string()))?;
        Ok(home.join(".ollaix").join("logs"))
    }
}

/// Install the global tracing subscriber.
///
/// The returned guard flushes the file writer on drop; hold it for the life
/// of the process.
pub fn init_logging(config: Option<LoggingConfig>) -> Result<Option<WorkerGuard>, Error> {
    let config = config.unwrap_or_default();
    let env_filter = config.build_env_filter();
    let format = config.detect_format();

    let stderr_layer = config.stderr.then(|| match format {
        LogFormat::Pretty => fmt::layer().pretty().with_writer(io::stderr).with_ansi(true).boxed(),
        LogFormat::Json => fmt::layer().json().with_writer(io::stderr).boxed(),
        LogFormat::Compact => fmt::layer().compact().with_writer(io::stderr).boxed(),
    });

    let (file_layer, guard) = if config.file {
        let log_dir = LoggingConfig::log_dir()?;
        std::fs::create_dir_all(&log_dir)
            .map_err(|e| Error::Config(format!("Failed to create log directory: {}", e)))?;

        let file_appender = tracing_appender::rolling::daily(log_dir, "ollaix.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        (Some(fmt::layer().json().with_writer(non_blocking).boxed()), Some(guard))
    } else {
        (None, None)
    };

    Registry::default()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| Error::Other(format!("Failed to install tracing subscriber: {}", e)))?;

    Ok(guard)
}

/// Shorten content for log fields, keeping a char boundary
pub fn truncate_for_log(content: &str, max_chars: usize) -> String {
    let total = content.chars().count();
    if total <= max_chars {
        return content.to_string();
    }

    let mut truncated: String = content.chars().take(max_chars).collect();
    truncated.push_str(&format!("... ({} total chars)", total));
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FileLoggingConfig;

    #[test]
    fn test_log_format_from_str() {
        assert_eq!(LogFormat::parse_str("pretty"), Some(LogFormat::Pretty));
        assert_eq!(LogFormat::parse_str("PRETTY"), Some(LogFormat::Pretty));
        assert_eq!(LogFormat::parse_str("json"), Some(LogFormat::Json));
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
        assert!(!config.file);
        assert!(config.stderr);
    }

    #[test]
    fn test_logging_config_builder() {
        let config = LoggingConfig::new().with_level("debug").with_format(LogFormat::Json).with_file_logging(true);
        assert_eq!(config.level, "debug");
        assert_eq!(config.format, LogFormat::Json);
        assert!(config.file);
    }

    #[test]
    fn test_logging_config_for_tui() {
        let config = LoggingConfig::new().for_tui();
        assert!(!config.stderr);
        assert!(config.file);
    }

    #[test]
    fn test_logging_config_from_file_config() {
        let config = LoggingConfig::from(ConfigLoggingConfig {
            level: "info".to_string(),
            format: "compact".to_string(),
            file: FileLoggingConfig { enabled: true },
        });
        assert_eq!(config.level, "info");
        assert_eq!(config.format, LogFormat::Compact);
        assert!(config.file);
    }

    #[test]
    fn test_truncate_for_log() {
        assert_eq!(truncate_for_log("short", 10), "short");

        let truncated = truncate_for_log("abcdefghijklmnopqrstuvwxyz", 10);
        assert!(truncated.starts_with("abcdefghij..."));
        assert!(truncated.contains("26 total chars"));

        assert!(truncate_for_log("éééé", 2).starts_with("éé..."));
    }
}
