//! Error types for the catalog and video clients.

use thiserror::Error;
use tunedeck_core::CoreError;

/// Errors that can occur when talking to the catalog or video APIs.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// API returned an error response
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Invalid base URL
    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse the response body
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Core type error (e.g. malformed video id)
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
