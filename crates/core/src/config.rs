use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::Result;

/// Environment variable that overrides `backend_url`
pub const BACKEND_URL_ENV: &str = "INSHORT_BACKEND_URL";

/// Placeholder prompts shown in the rotating banner when none are configured
pub const DEFAULT_PROMPTS: &[&str] = &[
    "How are the global stock markets performing?",
    "Give me updates on the Olympics",
    "What are the latest tech trends?",
    "Any new medical developments?",
    "What are the recent advancements in AI?",
    "Tell me about the latest in politics",
    "What are the top headlines today?",
    "What's new in the entertainment industry?",
];

pub fn default_prompts() -> Vec<String> {
    DEFAULT_PROMPTS.iter().map(|p| p.to_string()).collect()
}

fn default_backend_url() -> String {
    "http://localhost:5001".to_string()
}

/// Timing for the placeholder rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RotationConfig {
    /// Cadence at which the next prompt is shown
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    /// How long the banner stays faded out before the new prompt appears
    #[serde(default = "default_fade_ms")]
    pub fade_ms: u64,
}

fn default_interval_ms() -> u64 {
    4000
}

fn default_fade_ms() -> u64 {
    500
}

impl RotationConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn fade(&self) -> Duration {
        Duration::from_millis(self.fade_ms)
    }
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self { interval_ms: default_interval_ms(), fade_ms: default_fade_ms() }
    }
}

/// Height bounds for the input composer, in text rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComposerConfig {
    #[serde(default = "default_min_height")]
    pub min_height: u16,
    #[serde(default = "default_max_height")]
    pub max_height: u16,
}

fn default_min_height() -> u16 {
    1
}

fn default_max_height() -> u16 {
    8
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self { min_height: default_min_height(), max_height: default_max_height() }
    }
}

/// File logging section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileLoggingConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_file_level")]
    pub level: String,
}

fn default_file_level() -> String {
    "debug".to_string()
}

impl Default for FileLoggingConfig {
    fn default() -> Self {
        Self { enabled: false, level: default_file_level() }
    }
}

/// `[logging]` section of the config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default = "default_format")]
    pub format: String,
    #[serde(default)]
    pub file: FileLoggingConfig,
    /// Response bodies longer than this are truncated in logs
    #[serde(default = "default_max_body_chars")]
    pub max_body_chars: usize,
}

fn default_level() -> String {
    "warn".to_string()
}

fn default_format() -> String {
    "pretty".to_string()
}

fn default_max_body_chars() -> usize {
    500
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: default_format(),
            file: FileLoggingConfig::default(),
            max_body_chars: default_max_body_chars(),
        }
    }
}

/// Everything the chat controller needs, handed over at construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    pub prompts: Vec<String>,
    pub rotation: RotationConfig,
    pub composer: ComposerConfig,
    pub max_body_chars: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            prompts: default_prompts(),
            rotation: RotationConfig::default(),
            composer: ComposerConfig::default(),
            max_body_chars: default_max_body_chars(),
        }
    }
}

impl ChatConfig {
    /// Check the invariants the controller relies on
    pub fn validate(&self) -> Result<()> {
        if self.prompts.is_empty() {
            return Err(ConfigError::EmptyPrompts.into());
        }

        if self.rotation.fade_ms >= self.rotation.interval_ms {
            return Err(ConfigError::FadeNotShorterThanInterval {
                fade_ms: self.rotation.fade_ms,
                interval_ms: self.rotation.interval_ms,
            }
            .into());
        }

        if self.composer.min_height == 0 || self.composer.min_height > self.composer.max_height {
            return Err(ConfigError::InvalidComposerHeight {
                min: self.composer.min_height,
                max: self.composer.max_height,
            }
            .into());
        }

        Ok(())
    }
}

/// Root configuration structure for config.toml
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Base URL of the summarization service
    #[serde(default = "default_backend_url")]
    pub backend_url: String,

    /// Optional request timeout; absent means wait until the transport gives up
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,

    /// Ordered placeholder prompts
    #[serde(default = "default_prompts")]
    pub prompts: Vec<String>,

    #[serde(default)]
    pub rotation: RotationConfig,

    #[serde(default)]
    pub composer: ComposerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML string
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let config: Config = toml::from_str(toml_str).map_err(ConfigError::from)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load from an explicit path, or from the default location if a file exists there
    ///
    /// An explicit path that does not exist is an error; a missing default file is not.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(default) if default.exists() => {
                    tracing::debug!(path = %default.display(), "loading config from default location");
                    Self::from_file(&default)
                }
                _ => Ok(Self::default()),
            },
        }
    }

    /// `$XDG_CONFIG_HOME/inshort/config.toml` (or the platform equivalent)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("inshort").join("config.toml"))
    }

    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Apply overrides using the given variable lookup
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(BACKEND_URL_ENV).filter(|u| !u.trim().is_empty()) {
            self.backend_url = url.trim().to_string();
        }
        self.validate()
    }

    /// Replace the backend URL (command-line override)
    pub fn with_backend_url(mut self, url: impl Into<String>) -> Result<Self> {
        self.backend_url = url.into();
        self.validate()?;
        Ok(self)
    }

    /// The controller-facing part of the configuration
    pub fn chat_config(&self) -> ChatConfig {
        ChatConfig {
            prompts: self.prompts.clone(),
            rotation: self.rotation,
            composer: self.composer,
            max_body_chars: self.logging.max_body_chars,
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        validate_backend_url(&self.backend_url)?;
        self.chat_config().validate()?;

        if self.request_timeout_secs == Some(0) {
            return Err(ConfigError::ZeroTimeout.into());
        }

        Ok(())
    }

    /// Get example configuration (as a string)
    pub fn example() -> &'static str {
        r#"# InShort configuration
# Every key is optional.

# Base URL of the summarization service. Queries are POSTed to <backend_url>/api/chat.
# Can also be set with INSHORT_BACKEND_URL or --backend-url.
backend_url = "http://localhost:5001"

# Give up on a request after this many seconds (default: wait indefinitely)
# request_timeout_secs = 30

# Placeholder prompts cycled above the transcript
prompts = [
    "How are the global stock markets performing?",
    "What are the top headlines today?",
]

[rotation]
# Show the next prompt every interval_ms; fade_ms must be shorter
interval_ms = 4000
fade_ms = 500

[composer]
# Input box height bounds, in rows
min_height = 1
max_height = 8

[logging]
level = "warn"
format = "pretty"
max_body_chars = 500

[logging.file]
enabled = false
level = "debug"
"#
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            backend_url: default_backend_url(),
            request_timeout_secs: None,
            prompts: default_prompts(),
            rotation: RotationConfig::default(),
            composer: ComposerConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

fn validate_backend_url(url: &str) -> Result<()> {
    let parsed = url::Url::parse(url).map_err(|_| ConfigError::InvalidBackendUrl(url.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none_or(str::is_empty) {
        return Err(ConfigError::InvalidBackendUrl(url.to_string()).into());
    }
    Ok(())
}

/// Configuration-specific errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid backend URL (expected http:// or https://): {0}")]
    InvalidBackendUrl(String),

    #[error("prompt list must not be empty")]
    EmptyPrompts,

    #[error("fade ({fade_ms}ms) must be shorter than the rotation interval ({interval_ms}ms)")]
    FadeNotShorterThanInterval { fade_ms: u64, interval_ms: u64 },

    #[error("invalid composer height bounds: min {min}, max {max}")]
    InvalidComposerHeight { min: u16, max: u16 },

    #[error("request timeout must be at least one second")]
    ZeroTimeout,

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    TomlParse(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::TomlParse(err.to_string())
    }
}
