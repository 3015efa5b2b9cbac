//! Recently played history.

use crate::error::Result;
use crate::store::KeyValueStore;
use crate::stored::{decode_list, StoredTrack};
use tracing::debug;
use tunedeck_core::Track;

const RECENT_KEY: &str = "recently_played";

/// Default number of remembered tracks
pub const DEFAULT_RECENT_LIMIT: usize = 5;

/// Bounded, most-recent-first list of played tracks, unique by id.
#[derive(Debug)]
pub struct RecentlyPlayed<S> {
    store: S,
    limit: usize,
}

impl<S: KeyValueStore> RecentlyPlayed<S> {
    /// Wrap a key/value store, keeping at most `limit` tracks (minimum 1).
    pub fn new(store: S, limit: usize) -> Self {
        Self {
            store,
            limit: limit.max(1),
        }
    }

    /// Maximum number of remembered tracks.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Move `track` to the front, dropping any older entry with the same id.
    pub fn record(&mut self, track: &Track) -> Result<()> {
        track.validate()?;

        let mut tracks = self.list()?;
        tracks.retain(|t| t.id != track.id);
        tracks.insert(0, track.clone());
        tracks.truncate(self.limit);

        let raw = serde_json::to_string(&tracks)?;
        self.store.write(RECENT_KEY, &raw)?;

        debug!(track_id = %track.id, entries = tracks.len(), "Recorded recently played");
        Ok(())
    }

    /// Remembered tracks, newest first.
    pub fn list(&self) -> Result<Vec<Track>> {
        let Some(raw) = self.store.read(RECENT_KEY)? else {
            return Ok(Vec::new());
        };

        let stored: Vec<StoredTrack> = serde_json::from_str(&raw)?;
        let mut tracks = decode_list(stored);
        tracks.truncate(self.limit);
        Ok(tracks)
    }

    /// Forget the whole history.
    pub fn clear(&mut self) -> Result<()> {
        self.store.remove(RECENT_KEY)
    }

    /// Give back the underlying store.
    pub fn into_inner(self) -> S {
        self.store
    }
}
