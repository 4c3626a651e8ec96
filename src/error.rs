//! Common error types for partscan

use thiserror::Error;

/// Common result type for partscan operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors shared across the capture, staging, and upload pipeline
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP transport error (wraps reqwest::Error)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Remote API returned a non-success status
    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Capture device / frame source failure
    #[error("Capture error: {0}")]
    Capture(String),
}
