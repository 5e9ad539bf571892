use thiserror::Error;

/// Unified error type for completion-service calls
#[derive(Error, Debug)]
pub enum CompletionError {
    #[error("network error: {0}")]
    Network(String),

    #[error("api error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("config error: {0}")]
    Config(String),

    #[error("completion timed out")]
    Timeout,
}

impl From<reqwest::Error> for CompletionError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            CompletionError::Timeout
        } else {
            CompletionError::Network(e.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, CompletionError>;
