use thiserror::Error;

/// Result type alias for inshort-core
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types shared by the InShort crates
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error for file operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// The request to the summarization service could not complete
    #[error("transport error: {0}")]
    Transport(String),

    /// The service answered with a non-success status
    #[error("service returned status {status}")]
    Status { status: u16, body: String },

    /// The response body was not the expected JSON shape
    #[error("decode error: {0}")]
    Decode(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<crate::config::ConfigError> for Error {
    fn from(err: crate::config::ConfigError) -> Self {
        Error::Config(err.to_string())
    }
}
