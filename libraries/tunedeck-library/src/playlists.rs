//! Named playlists.

use crate::error::{LibraryError, Result};
use crate::store::KeyValueStore;
use crate::stored::{decode_list, StoredTrack};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info};
use tunedeck_core::Track;

const PLAYLISTS_KEY: &str = "playlists";

/// Outcome of [`PlaylistStore::create`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CreateOutcome {
    /// A new empty playlist exists now
    Created,
    /// A playlist with that name was already there (left untouched)
    AlreadyExists,
}

/// Outcome of [`PlaylistStore::save`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveOutcome {
    /// The track was appended
    Added,
    /// A track with the same id is already in the playlist
    AlreadyPresent,
}

/// Playlists keyed by name, each an ordered list of unique tracks.
///
/// All playlists live in a single document so a save is one write.
#[derive(Debug)]
pub struct PlaylistStore<S> {
    store: S,
}

impl<S: KeyValueStore> PlaylistStore<S> {
    /// Wrap a key/value store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Create an empty playlist.
    pub fn create(&mut self, name: &str) -> Result<CreateOutcome> {
        let name = check_name(name)?;
        let mut playlists = self.load()?;

        if playlists.contains_key(name) {
            debug!(playlist = %name, "Playlist already exists");
            return Ok(CreateOutcome::AlreadyExists);
        }

        playlists.insert(name.to_string(), Vec::new());
        self.persist(&playlists)?;

        info!(playlist = %name, "Created playlist");
        Ok(CreateOutcome::Created)
    }

    /// Append a track to a playlist, creating the playlist on first save.
    pub fn save(&mut self, track: &Track, name: &str) -> Result<SaveOutcome> {
        let name = check_name(name)?;
        track.validate()?;

        let mut playlists = self.load()?;
        let tracks = playlists.entry(name.to_string()).or_default();

        if tracks.iter().any(|t| t.id == track.id) {
            debug!(playlist = %name, track_id = %track.id, "Track already in playlist");
            return Ok(SaveOutcome::AlreadyPresent);
        }

        tracks.push(track.clone());
        self.persist(&playlists)?;

        info!(playlist = %name, track_id = %track.id, "Added track to playlist");
        Ok(SaveOutcome::Added)
    }

    /// Every playlist, ordered by name.
    pub fn all(&self) -> Result<BTreeMap<String, Vec<Track>>> {
        self.load()
    }

    /// One playlist's tracks, or `None` if it does not exist.
    pub fn get(&self, name: &str) -> Result<Option<Vec<Track>>> {
        Ok(self.load()?.remove(name.trim()))
    }

    /// Give back the underlying store.
    pub fn into_inner(self) -> S {
        self.store
    }

    fn load(&self) -> Result<BTreeMap<String, Vec<Track>>> {
        let Some(raw) = self.store.read(PLAYLISTS_KEY)? else {
            return Ok(BTreeMap::new());
        };

        let stored: HashMap<String, Vec<StoredTrack>> = serde_json::from_str(&raw)?;
        Ok(stored
            .into_iter()
            .map(|(name, tracks)| (name, decode_list(tracks)))
            .collect())
    }

    fn persist(&mut self, playlists: &BTreeMap<String, Vec<Track>>) -> Result<()> {
        let raw = serde_json::to_string(playlists)?;
        self.store.write(PLAYLISTS_KEY, &raw)
    }
}

fn check_name(name: &str) -> Result<&str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(LibraryError::InvalidName(name.to_string()));
    }
    Ok(trimmed)
}
