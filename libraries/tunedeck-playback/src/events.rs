//! Playback events
//!
//! The engine queues events as state changes; hosts drain them after each
//! turn to re-render:
//! - State changes (playing/paused, backend lifecycle)
//! - Track and queue changes
//! - Position updates from the poll task
//! - Volume and mute changes
//! - Backend failures

use crate::types::EngineStatus;
use serde::{Deserialize, Serialize};
use tunedeck_core::BackendKind;

/// Events emitted by the playback engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlayerEvent {
    /// `is_playing` or the backend status changed
    StateChanged {
        /// Whether playback is running
        is_playing: bool,
        /// Backend lifecycle
        status: EngineStatus,
    },

    /// A new track was selected
    TrackChanged {
        /// ID of the new (current) track
        track_id: String,
        /// ID of the previous track (if any)
        previous_track_id: Option<String>,
        /// Backend that plays it
        backend: BackendKind,
    },

    /// Playhead or duration changed
    PositionChanged {
        /// Playhead in seconds
        current_time: f64,
        /// Track length in seconds (0 = unknown)
        duration: f64,
        /// Fraction played
        progress: f64,
    },

    /// Volume or mute changed
    VolumeChanged {
        /// Volume level in [0, 1]
        volume: f32,
        /// Whether audio is muted
        muted: bool,
    },

    /// Queue replaced or extended
    QueueChanged {
        /// New queue length
        length: usize,
        /// Cursor position
        cursor: Option<usize>,
    },

    /// Track finished playing naturally (reached end)
    TrackFinished {
        /// ID of the finished track
        track_id: String,
    },

    /// Last track ended with nothing after it
    QueueExhausted,

    /// Backend failed; playback unavailable until the next selection
    Error {
        /// Error message
        message: String,
    },
}
