//! Error type shared by the aggregator, the integrations and the outputs.

use thiserror::Error;

/// Everything that can abort a statistics run.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or malformed input: work bucket URI, dates, configuration.
    #[error("{0}")]
    InvalidInput(String),

    /// Internal inconsistency between data built from the same source.
    #[error("invariant violated: {0}")]
    Invariant(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A collaborator answered with a non-success status.
    #[error("{service} responded with {status}: {body}")]
    Api {
        service: &'static str,
        status: u16,
        body: String,
    },

    /// A collaborator answered, but not with something we understand.
    #[error("unexpected response from {service}: {message}")]
    UnexpectedResponse {
        service: &'static str,
        message: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Error::InvalidInput(message.into())
    }
}
