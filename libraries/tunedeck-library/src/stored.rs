//! On-disk track representation.

use serde::Deserialize;
use tracing::warn;
use tunedeck_core::{Track, TrackRecord};

/// A track as found in a stored document.
///
/// Documents written by this crate hold tagged [`Track`]s; older documents
/// hold flat records whose media source has to be inferred.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum StoredTrack {
    Tagged(Track),
    Legacy(TrackRecord),
}

impl StoredTrack {
    /// Convert to a playable track, dropping entries that cannot be played.
    pub fn into_track(self) -> Option<Track> {
        let result = match self {
            Self::Tagged(track) => track.validate().map(|()| track),
            Self::Legacy(record) => Track::try_from(record),
        };

        match result {
            Ok(track) => Some(track),
            Err(e) => {
                warn!(error = %e, "Dropping unreadable stored track");
                None
            }
        }
    }
}

pub(crate) fn decode_list(tracks: Vec<StoredTrack>) -> Vec<Track> {
    tracks.into_iter().filter_map(StoredTrack::into_track).collect()
}
