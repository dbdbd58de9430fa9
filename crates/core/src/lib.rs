pub mod config;
pub mod error;
pub mod logging;

pub use config::{ChatConfig, ComposerConfig, Config, ConfigError, FileLoggingConfig, RotationConfig, default_prompts};
pub use error::{Error, Result};
pub use logging::{LogFormat, LogGuard, LoggingConfig, init_logging, redact_body};
