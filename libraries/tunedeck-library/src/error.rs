/// Library-specific errors
use thiserror::Error;
use tunedeck_core::CoreError;

/// Result type alias using `LibraryError`
pub type Result<T> = std::result::Result<T, LibraryError>;

/// Library error types
#[derive(Error, Debug)]
pub enum LibraryError {
    /// Playlist names must contain something other than whitespace
    #[error("Invalid playlist name: {0:?}")]
    InvalidName(String),

    /// Store keys are restricted to `[a-z0-9_-]`
    #[error("Invalid store key: {0:?}")]
    InvalidKey(String),

    /// Track could not be stored
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Stored value is not valid JSON for its key
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
