//! Error types for the sensor feed.

use thiserror::Error;

/// Errors that can occur when fetching readings.
///
/// The variants only matter for logging; the dashboard shows every failure
/// the same way, using the rendered message as the reason.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request could not be sent or the body could not be read.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The endpoint answered with a non-2xx status.
    #[error("unexpected HTTP status {0}")]
    Status(reqwest::StatusCode),

    /// The body was not the expected JSON document.
    #[error("malformed payload: {0}")]
    Parse(#[from] serde_json::Error),
}
