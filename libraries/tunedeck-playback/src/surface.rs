//! UI surface
//!
//! The player bar talks to the engine only through [`UiIntent`]s and renders
//! only from a [`NowPlayingView`]. It never touches a backend.

use crate::queue::Queue;
use crate::types::{EngineStatus, PlaybackState};
use serde::{Deserialize, Serialize};
use tunedeck_core::BackendKind;

/// User intents from the transport controls
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum UiIntent {
    /// Start or resume
    Play,
    /// Pause
    Pause,
    /// Play/pause button
    TogglePlayback,
    /// Skip forward
    Next,
    /// Skip back
    Previous,
    /// Scrubber moved to a fraction in [0, 1]
    Seek(f32),
    /// Volume slider moved to a level in [0, 1]
    SetVolume(f32),
    /// Volume icon clicked
    ToggleMute,
    /// Stop and release the backend
    Stop,
}

/// Everything the player bar shows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NowPlayingView {
    /// Track title
    pub title: String,
    /// Artist or channel
    pub artist: String,
    /// Cover art URL
    pub cover: String,
    /// Elapsed time, `m:ss`
    pub elapsed: String,
    /// Total time, `m:ss`
    pub total: String,
    /// Scrubber position in [0, 1]
    pub progress: f64,
    /// Volume slider position in [0, 1]
    pub volume: f32,
    /// Show the muted icon (muted, or volume at 0)
    pub show_muted: bool,
    /// Show the pause button instead of play
    pub show_pause: bool,
    /// Enable the skip forward button
    pub has_next: bool,
    /// Enable the skip back button
    pub has_previous: bool,
    /// Backend playing the track, if live
    pub backend: Option<BackendKind>,
    /// The backend failed for this track
    pub unavailable: bool,
}

impl NowPlayingView {
    /// Build the view, or `None` when no track is selected (bar hidden)
    pub fn from_state(state: &PlaybackState, queue: &Queue) -> Option<Self> {
        let track = state.current_track.as_ref()?;

        let backend = match state.status {
            EngineStatus::Active(kind) => Some(kind),
            EngineStatus::Idle | EngineStatus::Unavailable => None,
        };

        Some(Self {
            title: track.title.clone(),
            artist: track.artist.clone(),
            cover: track.cover.clone(),
            elapsed: format_time(state.current_time),
            total: format_time(state.duration),
            progress: state.progress,
            volume: state.volume,
            show_muted: state.muted || state.volume <= 0.0,
            show_pause: state.is_playing,
            has_next: queue.has_next(),
            has_previous: queue.has_previous(),
            backend,
            unavailable: state.status == EngineStatus::Unavailable,
        })
    }
}

/// Format seconds as `m:ss`
///
/// Unknown (zero, negative or non-finite) values render as `0:00`.
///
/// ```rust
/// use tunedeck_playback::format_time;
///
/// assert_eq!(format_time(0.0), "0:00");
/// assert_eq!(format_time(65.9), "1:05");
/// assert_eq!(format_time(f64::NAN), "0:00");
/// ```
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return "0:00".to_string();
    }

    let whole = seconds.floor() as u64;
    format!("{}:{:02}", whole / 60, whole % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tunedeck_core::Track;

    fn state_with(track: Track) -> PlaybackState {
        let mut state = PlaybackState::new(0.6, false);
        state.current_track = Some(track);
        state
    }

    #[test]
    fn format_time_pads_seconds() {
        assert_eq!(format_time(5.0), "0:05");
        assert_eq!(format_time(59.99), "0:59");
        assert_eq!(format_time(60.0), "1:00");
        assert_eq!(format_time(3723.0), "62:03");
    }

    #[test]
    fn format_time_unknown_values() {
        assert_eq!(format_time(-3.0), "0:00");
        assert_eq!(format_time(f64::INFINITY), "0:00");
        assert_eq!(format_time(f64::NAN), "0:00");
    }

    #[test]
    fn no_track_hides_view() {
        let state = PlaybackState::new(1.0, false);
        assert!(NowPlayingView::from_state(&state, &Queue::new()).is_none());
    }

    #[test]
    fn view_reflects_state() {
        let track = Track::direct_audio("1", "Nightfall", "Lumen", "https://cdn.test/1.mp3")
            .with_cover("https://cdn.test/1.jpg");
        let mut state = state_with(track.clone());
        state.is_playing = true;
        state.current_time = 30.0;
        state.duration = 120.0;
        state.refresh_progress();
        state.status = EngineStatus::Active(BackendKind::DirectAudio);

        let mut queue = Queue::new();
        queue.replace(vec![
            track,
            Track::direct_audio("2", "Dawn", "Lumen", "https://cdn.test/2.mp3"),
        ]);

        let view = NowPlayingView::from_state(&state, &queue).unwrap();
        assert_eq!(view.title, "Nightfall");
        assert_eq!(view.cover, "https://cdn.test/1.jpg");
        assert_eq!(view.elapsed, "0:30");
        assert_eq!(view.total, "2:00");
        assert_eq!(view.progress, 0.25);
        assert!(view.show_pause);
        assert!(view.has_next);
        assert!(!view.has_previous);
        assert_eq!(view.backend, Some(BackendKind::DirectAudio));
        assert!(!view.unavailable);
    }

    #[test]
    fn muted_icon_for_zero_volume() {
        let track = Track::direct_audio("1", "t", "a", "https://cdn.test/1.mp3");
        let mut state = state_with(track);

        state.volume = 0.0;
        let view = NowPlayingView::from_state(&state, &Queue::new()).unwrap();
        assert!(view.show_muted);

        state.volume = 0.5;
        state.muted = true;
        let view = NowPlayingView::from_state(&state, &Queue::new()).unwrap();
        assert!(view.show_muted);
    }

    #[test]
    fn unavailable_status_is_flagged() {
        let track = Track::direct_audio("1", "t", "a", "https://cdn.test/1.mp3");
        let mut state = state_with(track);
        state.status = EngineStatus::Unavailable;

        let view = NowPlayingView::from_state(&state, &Queue::new()).unwrap();
        assert!(view.unavailable);
        assert!(view.backend.is_none());
    }
}
