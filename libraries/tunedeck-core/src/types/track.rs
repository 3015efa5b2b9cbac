/// Track domain type
use crate::error::{CoreError, Result};
use crate::types::ids::{TrackId, VideoId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where the media for a track comes from
///
/// Decided once when the track is ingested; the playback engine picks its
/// backend by matching on this, never by sniffing the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MediaSource {
    /// Streamed audio file played by an audio element
    DirectAudio {
        /// Stream URL
        url: String,
    },

    /// Video played through an embedded player with the picture hidden
    EmbeddedVideo {
        /// Video platform id
        video_id: VideoId,
    },
}

impl MediaSource {
    /// Classify an untyped record
    ///
    /// Ids shaped like a video id select the embedded video player, anything
    /// else needs a non-empty stream URL. Returns `None` when neither applies.
    pub fn infer(id: &str, url: Option<&str>) -> Option<Self> {
        if let Ok(video_id) = VideoId::parse(id) {
            return Some(Self::EmbeddedVideo { video_id });
        }

        match url {
            Some(url) if !url.trim().is_empty() => Some(Self::DirectAudio {
                url: url.to_string(),
            }),
            _ => None,
        }
    }

    /// Backend needed to play this source
    pub fn backend_kind(&self) -> BackendKind {
        match self {
            Self::DirectAudio { .. } => BackendKind::DirectAudio,
            Self::EmbeddedVideo { .. } => BackendKind::EmbeddedVideo,
        }
    }
}

/// The two playback backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Streaming audio element
    DirectAudio,
    /// Embedded video player
    EmbeddedVideo,
}

impl BackendKind {
    /// Convert to string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DirectAudio => "direct_audio",
            Self::EmbeddedVideo => "embedded_video",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Playable track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Unique track identifier
    pub id: TrackId,

    /// Track title
    pub title: String,

    /// Artist (or channel) name
    pub artist: String,

    /// Cover art URL, empty when unknown
    #[serde(default)]
    pub cover: String,

    /// Duration in seconds (0 = unknown until a backend reports it)
    #[serde(default)]
    pub duration: f64,

    /// Media source
    pub source: MediaSource,
}

impl Track {
    /// Create a direct audio track
    pub fn direct_audio(
        id: impl Into<TrackId>,
        title: impl Into<String>,
        artist: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            artist: artist.into(),
            cover: String::new(),
            duration: 0.0,
            source: MediaSource::DirectAudio { url: url.into() },
        }
    }

    /// Create an embedded video track (the track id is the video id)
    pub fn embedded_video(
        video_id: VideoId,
        title: impl Into<String>,
        artist: impl Into<String>,
    ) -> Self {
        Self {
            id: TrackId::from(video_id.clone()),
            title: title.into(),
            artist: artist.into(),
            cover: String::new(),
            duration: 0.0,
            source: MediaSource::EmbeddedVideo { video_id },
        }
    }

    /// Set cover art URL
    #[must_use]
    pub fn with_cover(mut self, cover: impl Into<String>) -> Self {
        self.cover = cover.into();
        self
    }

    /// Set duration in seconds
    #[must_use]
    pub fn with_duration(mut self, seconds: f64) -> Self {
        self.duration = seconds;
        self
    }

    /// Backend needed to play this track
    pub fn backend_kind(&self) -> BackendKind {
        self.source.backend_kind()
    }

    /// Check if this track plays through an audio element
    pub fn is_direct_audio(&self) -> bool {
        self.backend_kind() == BackendKind::DirectAudio
    }

    /// Stream URL for direct audio tracks
    pub fn audio_url(&self) -> Option<&str> {
        match &self.source {
            MediaSource::DirectAudio { url } => Some(url),
            MediaSource::EmbeddedVideo { .. } => None,
        }
    }

    /// Video id for embedded video tracks
    pub fn video_id(&self) -> Option<&VideoId> {
        match &self.source {
            MediaSource::EmbeddedVideo { video_id } => Some(video_id),
            MediaSource::DirectAudio { .. } => None,
        }
    }

    /// Check the track can be handed to a backend
    pub fn validate(&self) -> Result<()> {
        if self.id.is_blank() {
            return Err(CoreError::invalid_track("empty id"));
        }

        if !self.duration.is_finite() || self.duration < 0.0 {
            return Err(CoreError::invalid_track(format!(
                "track {} has invalid duration {}",
                self.id, self.duration
            )));
        }

        if let MediaSource::DirectAudio { url } = &self.source {
            if url.trim().is_empty() {
                return Err(CoreError::invalid_track(format!(
                    "track {} has no stream url",
                    self.id
                )));
            }
        }

        Ok(())
    }
}

/// Untyped track record
///
/// The flat shape used by older stores and by JavaScript callers:
/// `{ id, title, artist, cover, url, duration }`. Converting it into a
/// [`Track`] applies [`MediaSource::infer`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackRecord {
    /// Identifier (numeric ids are accepted and stringified)
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,

    /// Title
    #[serde(default)]
    pub title: String,

    /// Artist
    #[serde(default)]
    pub artist: String,

    /// Cover art URL
    #[serde(default)]
    pub cover: Option<String>,

    /// Stream URL
    #[serde(default)]
    pub url: Option<String>,

    /// Duration in seconds
    #[serde(default)]
    pub duration: Option<f64>,
}

impl TryFrom<TrackRecord> for Track {
    type Error = CoreError;

    fn try_from(record: TrackRecord) -> Result<Self> {
        let source = MediaSource::infer(&record.id, record.url.as_deref()).ok_or_else(|| {
            CoreError::invalid_track(format!(
                "record {:?} has neither a video id nor a stream url",
                record.id
            ))
        })?;

        let track = Track {
            id: TrackId::new(record.id),
            title: record.title,
            artist: record.artist,
            cover: record.cover.unwrap_or_default(),
            duration: record.duration.unwrap_or(0.0),
            source,
        };
        track.validate()?;
        Ok(track)
    }
}

impl From<&Track> for TrackRecord {
    fn from(track: &Track) -> Self {
        let url = match &track.source {
            MediaSource::DirectAudio { url } => url.clone(),
            MediaSource::EmbeddedVideo { video_id } => video_id.watch_url(),
        };

        Self {
            id: track.id.as_str().to_string(),
            title: track.title.clone(),
            artist: track.artist.clone(),
            cover: (!track.cover.is_empty()).then(|| track.cover.clone()),
            url: Some(url),
            duration: Some(track.duration),
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}
