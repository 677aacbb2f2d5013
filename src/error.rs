use crate::retry::RetryError;

/// Error type returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum CodeRefsError {
    /// Network or request execution error from `reqwest`, after retries.
    #[error("{0}")]
    Transport(reqwest::Error),
    /// Every permitted attempt came back with a retryable status.
    #[error("Request failed after {max_retries} retries")]
    RetryExhausted { max_retries: usize },
    /// Terminal non-success response from the Code References API.
    #[error("LD API error {status}: {message}")]
    Service {
        /// HTTP status code of the terminal response.
        status: u16,
        /// Response body text, or the status reason phrase if the body was empty.
        message: String,
    },
    /// A required input could not be resolved.
    #[error("{0}")]
    Configuration(String),
    /// The base URI could not be turned into a request URL.
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    /// Request body serialization error.
    #[error("encode error: {0}")]
    Encode(String),
}

impl From<RetryError<reqwest::Error>> for CodeRefsError {
    fn from(err: RetryError<reqwest::Error>) -> Self {
        match err {
            RetryError::Transport(inner) => Self::Transport(inner),
            RetryError::Exhausted { max_retries } => Self::RetryExhausted { max_retries },
        }
    }
}
