//! Error type for document store operations.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors returned by document store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A required argument was missing or empty.
    #[error("invalid store request: {0}")]
    Validation(String),

    /// The store could not be reached or refused the connection.
    #[error("document store unavailable: {0}")]
    Unavailable(#[from] reqwest::Error),

    /// The store answered with a non-success status.
    #[error("document store returned {status}: {body}")]
    Status {
        /// HTTP status of the response
        status: StatusCode,
        /// Response body, for diagnostics
        body: String,
    },

    /// A stored document did not match the expected shape.
    #[error("malformed stored document: {0}")]
    Serialization(#[from] serde_json::Error),
}
