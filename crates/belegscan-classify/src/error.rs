//! Error types for the classifier layer.

use thiserror::Error;

/// Errors that can occur while calling a classifier backend.
#[derive(Error, Debug)]
pub enum ClassifyError {
    /// Transport-level HTTP failure (connection refused, DNS, TLS, ...).
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("classifier API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// The response arrived but carried no candidate text.
    #[error("classifier returned no content")]
    EmptyResponse,

    /// The response body was not the expected envelope.
    #[error("malformed response body: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    /// The backend is missing required configuration.
    #[error("backend configuration error: {0}")]
    Config(String),
}
