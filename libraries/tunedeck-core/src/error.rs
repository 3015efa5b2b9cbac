/// Core error types for Tunedeck
use thiserror::Error;

/// Result type alias using `CoreError`
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error type for Tunedeck
#[derive(Error, Debug)]
pub enum CoreError {
    /// Video identifiers are exactly 11 characters of `[A-Za-z0-9_-]`
    #[error("Invalid video id: {0:?}")]
    InvalidVideoId(String),

    /// Track record is missing required fields
    #[error("Invalid track: {0}")]
    InvalidTrack(String),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl CoreError {
    /// Create an invalid track error
    pub fn invalid_track(msg: impl Into<String>) -> Self {
        Self::InvalidTrack(msg.into())
    }
}
