use thiserror::Error;

/// Failure kinds surfaced inside the chat controller
///
/// None of these end the session. Transport and decode failures settle a turn with an empty
/// answer, empty submissions never create a turn, stale answers are dropped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChatError {
    /// The request could not complete or came back with a non-success status
    #[error("transport failure: {0}")]
    Transport(String),

    /// The response body was not the expected JSON
    #[error("decode failure: {0}")]
    Decode(String),

    #[error("nothing to submit")]
    EmptySubmission,

    /// An answer arrived for a turn that is missing or already settled
    #[error("stale answer for turn {index}")]
    StaleAnswer { index: usize },
}

impl From<inshort_core::Error> for ChatError {
    fn from(err: inshort_core::Error) -> Self {
        match err {
            inshort_core::Error::Decode(msg) => ChatError::Decode(msg),
            inshort_core::Error::Status { status, .. } => ChatError::Transport(format!("HTTP status {}", status)),
            other => ChatError::Transport(other.to_string()),
        }
    }
}
