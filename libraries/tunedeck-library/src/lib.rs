//! Tunedeck Library
//!
//! Local, per-user collections built on a small key/value store:
//!
//! - [`PlaylistStore`]: named playlists of unique tracks
//! - [`RecentlyPlayed`]: the last few tracks the user picked
//!
//! The playback engine never writes here; the front end records a track
//! after it successfully selects it.
//!
//! # Example
//!
//! ```rust
//! use tunedeck_core::Track;
//! use tunedeck_library::{MemoryStore, PlaylistStore, SaveOutcome};
//!
//! let mut playlists = PlaylistStore::new(MemoryStore::new());
//! let song = Track::direct_audio("1204669", "Nightfall", "Lumen", "https://cdn.example/1.mp3");
//!
//! assert_eq!(playlists.save(&song, "Favorites").unwrap(), SaveOutcome::Added);
//! assert_eq!(playlists.save(&song, "Favorites").unwrap(), SaveOutcome::AlreadyPresent);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod playlists;
mod recent;
mod store;
mod stored;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use error::{LibraryError, Result};
pub use playlists::{CreateOutcome, PlaylistStore, SaveOutcome};
pub use recent::{RecentlyPlayed, DEFAULT_RECENT_LIMIT};
pub use store::{JsonFileStore, KeyValueStore, MemoryStore};

/// Where and how much the library keeps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryConfig {
    /// Directory holding the JSON documents
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Length of the recently played list
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            recent_limit: default_recent_limit(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".tunedeck")
}

fn default_recent_limit() -> usize {
    DEFAULT_RECENT_LIMIT
}

/// Playlists and history sharing one data directory.
#[derive(Debug)]
pub struct Library {
    /// Named playlists
    pub playlists: PlaylistStore<JsonFileStore>,
    /// Recently played tracks
    pub recent: RecentlyPlayed<JsonFileStore>,
}

impl Library {
    /// Open the library in `config.data_dir`, creating the directory if needed.
    pub fn open(config: &LibraryConfig) -> Result<Self> {
        let store = JsonFileStore::open(&config.data_dir)?;
        Ok(Self {
            playlists: PlaylistStore::new(store.clone()),
            recent: RecentlyPlayed::new(store, config.recent_limit),
        })
    }
}
