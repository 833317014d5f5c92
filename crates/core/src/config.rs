use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::i18n::Locale;

/// Compile-time default model, set with `OLLAIX_DEFAULT_MODEL_ID` at build time
pub const BUILD_DEFAULT_MODEL_ID: Option<&str> = option_env!("OLLAIX_DEFAULT_MODEL_ID");

/// Default near-bottom threshold for the terminal transcript, in rows
pub const DEFAULT_SCROLL_THRESHOLD_ROWS: u32 = 4;

/// Transcript scrolling options
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ScrollConfig {
    /// Rows from the bottom under which the view keeps following new content
    #[serde(default = "default_scroll_threshold")]
    pub threshold: u32,
}

fn default_scroll_threshold() -> u32 {
    DEFAULT_SCROLL_THRESHOLD_ROWS
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self { threshold: default_scroll_threshold() }
    }
}

/// Update-available probing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct UpdateConfig {
    /// Run periodic update checks
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Seconds between checks
    #[serde(default = "default_update_interval")]
    pub interval_secs: u64,

    /// URL fetched to confirm the update source is reachable
    #[serde(default)]
    pub probe_url: Option<String>,
}

fn default_true() -> bool {
    true
}

fn default_update_interval() -> u64 {
    crate::update::DEFAULT_UPDATE_INTERVAL.as_secs()
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self { enabled: true, interval_secs: default_update_interval(), probe_url: None }
    }
}

impl UpdateConfig {
    pub fn interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.interval_secs)
    }
}

/// Rolling file output for logs
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct FileLoggingConfig {
    #[serde(default)]
    pub enabled: bool,
}

/// `[logging]` table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Filter directive used when `OLLAIX_LOG` and `RUST_LOG` are unset
    #[serde(default = "default_log_level")]
    pub level: String,

    /// `pretty`, `json` or `compact`
    #[serde(default = "default_log_format")]
    pub format: String,

    #[serde(default)]
    pub file: FileLoggingConfig,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level(), format: default_log_format(), file: FileLoggingConfig::default() }
    }
}

/// Root configuration structure for ollaix.toml
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Preferred model id; falls back to the build-time default
    #[serde(default)]
    pub default_model_id: Option<String>,

    /// UI locale tag (`en`, `fr`, `fr-FR`, ...)
    #[serde(default)]
    pub locale: Option<String>,

    #[serde(default)]
    pub scroll: ScrollConfig,

    #[serde(default)]
    pub update: UpdateConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML string
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let config: Config = toml::from_str(toml_str).map_err(|e| Error::Config(ConfigError::from(e).to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Configured model id, or the one baked in at build time
    pub fn default_model_id(&self) -> Option<&str> {
        self.default_model_id.as_deref().or(BUILD_DEFAULT_MODEL_ID)
    }

    /// Parsed locale; `en` when unset
    pub fn locale(&self) -> Result<Locale> {
        match &self.locale {
            Some(tag) => Ok(Locale::from_str(tag)?),
            None => Ok(Locale::default()),
        }
    }

    fn validate(&self) -> Result<()> {
        if let Some(tag) = &self.locale {
            Locale::from_str(tag).map_err(|_| Error::Config(ConfigError::InvalidLocale(tag.clone()).to_string()))?;
        }

        if self.update.enabled && self.update.interval_secs == 0 {
            return Err(Error::Config(ConfigError::InvalidInterval.to_string()));
        }

        if crate::logging::LogFormat::parse_str(&self.logging.format).is_none() {
            return Err(Error::Config(
                ConfigError::InvalidLogFormat(self.logging.format.clone()).to_string(),
            ));
        }

        if let Some(url) = &self.update.probe_url
            && !(url.starts_with("http://") || url.starts_with("https://"))
        {
            return Err(Error::Config(ConfigError::InvalidProbeUrl(url.clone()).to_string()));
        }

        Ok(())
    }

    /// Get example configuration (as a string)
    pub fn example() -> &'static str {
        r#"# Ollaix Configuration Example
# Copy this file to ~/.ollaix/ollaix.toml and customize as needed

# Model selected at startup when available (optional)
# default_model_id = "gemma3:latest"

# UI language: "en" or "fr"
locale = "en"

[scroll]
# Rows from the bottom under which the transcript keeps following new output
threshold = 4

[update]
# Periodically check whether a newer build is available
enabled = true
# Seconds between checks
interval_secs = 3600
# URL fetched to confirm the update source is reachable (optional)
# probe_url = "https://example.com/ollaix/latest"

[logging]
# Filter directive, overridden by OLLAIX_LOG
level = "warn"
# Output format: "pretty", "json" or "compact"
format = "pretty"

[logging.file]
# Write daily rotated logs to ~/.ollaix/logs
enabled = false
"#
    }
}

/// Configuration-specific errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unsupported locale: {0}")]
    InvalidLocale(String),

    #[error("update interval must be greater than zero")]
    InvalidInterval,

    #[error("invalid log format: {0}")]
    InvalidLogFormat(String),

    #[error("probe_url must be an http(s) URL: {0}")]
    InvalidProbeUrl(String),

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    TomlParse(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::TomlParse(err.to_string())
    }
}
