//! Error types for playback management

use thiserror::Error;
use tunedeck_core::CoreError;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Track rejected before reaching a backend
    #[error("Invalid track: {0}")]
    InvalidTrack(String),

    /// Backend could not be constructed or refused a command
    #[error("Backend error: {0}")]
    Backend(String),

    /// Core type error
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl PlaybackError {
    /// Create a backend error
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
