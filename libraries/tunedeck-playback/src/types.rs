//! Core types for playback management

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tunedeck_core::{BackendKind, Track};

/// Snapshot of everything the UI renders
///
/// Owned and mutated only by [`crate::PlaybackEngine`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaybackState {
    /// Track currently selected (kept after the queue runs out)
    pub current_track: Option<Track>,

    /// Whether playback is running or requested
    pub is_playing: bool,

    /// Volume level in [0, 1]
    pub volume: f32,

    /// Mute flag (volume level is preserved)
    pub muted: bool,

    /// Playhead in seconds
    pub current_time: f64,

    /// Track length in seconds (0 = unknown)
    pub duration: f64,

    /// `current_time / duration` in [0, 1], 0 when duration is unknown
    pub progress: f64,

    /// Backend lifecycle
    pub status: EngineStatus,
}

impl PlaybackState {
    pub(crate) fn new(volume: f32, muted: bool) -> Self {
        Self {
            current_track: None,
            is_playing: false,
            volume,
            muted,
            current_time: 0.0,
            duration: 0.0,
            progress: 0.0,
            status: EngineStatus::Idle,
        }
    }

    /// Reset playhead, duration and progress for a new track
    pub(crate) fn reset_position(&mut self) {
        self.current_time = 0.0;
        self.duration = 0.0;
        self.progress = 0.0;
    }

    /// Recompute progress from time and duration
    pub(crate) fn refresh_progress(&mut self) {
        self.progress = if self.duration > 0.0 {
            (self.current_time / self.duration).clamp(0.0, 1.0)
        } else {
            0.0
        };
    }
}

/// Backend lifecycle as seen by the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "backend", rename_all = "snake_case")]
pub enum EngineStatus {
    /// No adapter (nothing selected, stopped, or queue exhausted)
    Idle,

    /// An adapter of this kind is live
    Active(BackendKind),

    /// The last adapter failed; waits for the next selection
    Unavailable,
}

/// Generation marker for guarded track selection
///
/// Obtained from [`crate::PlaybackEngine::begin_selection`] before starting
/// an async lookup; only accepted if no other selection happened since.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SelectionTicket(pub(crate) u64);

impl SelectionTicket {
    /// Raw generation number
    pub fn generation(&self) -> u64 {
        self.0
    }
}

/// Configuration for the playback engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Progress poll interval in milliseconds (default: 500)
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Initial volume in [0, 1] (default: 1.0)
    #[serde(default = "default_volume")]
    pub volume: f32,

    /// Start muted (default: false)
    #[serde(default)]
    pub muted: bool,
}

impl PlaybackConfig {
    /// Poll interval as a `Duration` (never below 50ms)
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(MIN_POLL_INTERVAL_MS))
    }
}

const MIN_POLL_INTERVAL_MS: u64 = 50;

fn default_poll_interval_ms() -> u64 {
    500
}

fn default_volume() -> f32 {
    1.0
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            volume: default_volume(),
            muted: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = PlaybackConfig::default();
        assert_eq!(config.poll_interval_ms, 500);
        assert_eq!(config.volume, 1.0);
        assert!(!config.muted);
        assert_eq!(config.poll_interval(), Duration::from_millis(500));
    }

    #[test]
    fn poll_interval_has_floor() {
        let config = PlaybackConfig {
            poll_interval_ms: 0,
            ..Default::default()
        };
        assert_eq!(config.poll_interval(), Duration::from_millis(50));
    }

    #[test]
    fn progress_is_zero_without_duration() {
        let mut state = PlaybackState::new(1.0, false);
        state.current_time = 12.0;
        state.refresh_progress();
        assert_eq!(state.progress, 0.0);

        state.duration = 48.0;
        state.refresh_progress();
        assert!((state.progress - 0.25).abs() < 1e-9);
    }

    #[test]
    fn progress_is_clamped() {
        let mut state = PlaybackState::new(1.0, false);
        state.current_time = 61.0;
        state.duration = 60.0;
        state.refresh_progress();
        assert_eq!(state.progress, 1.0);
    }
}
