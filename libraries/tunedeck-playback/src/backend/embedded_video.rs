//! Embedded video backend
//!
//! Plays the audio of a video through an embedded player whose picture is
//! hidden. The player is unusable until it reports `Ready`, so commands
//! issued earlier are held by the adapter and applied on `Ready`.

use super::{AdapterId, AdapterOptions, AdapterSignal};
use crate::error::Result;
use crate::volume::Volume;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Embedded video player
///
/// Mirrors the iframe player API. Volume is an integer percentage.
pub trait VideoPlayer {
    /// Start or resume playback
    fn play_video(&mut self) -> Result<()>;

    /// Pause playback
    fn pause_video(&mut self) -> Result<()>;

    /// Move the playhead to `seconds`
    fn seek_to(&mut self, seconds: f64) -> Result<()>;

    /// Set volume on the 0-100 scale
    fn set_volume(&mut self, percent: u8);

    /// Mute without touching the volume
    fn mute(&mut self);

    /// Unmute
    fn unmute(&mut self);

    /// Playhead in seconds
    fn current_time(&self) -> f64;

    /// Video length in seconds (0 until known)
    fn duration(&self) -> f64;

    /// Remove the player and release its frame
    fn destroy(&mut self);
}

/// Player state codes as reported by `onStateChange`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoPlayerState {
    /// -1
    Unstarted,
    /// 0
    Ended,
    /// 1
    Playing,
    /// 2
    Paused,
    /// 3
    Buffering,
    /// 5
    Cued,
}

impl VideoPlayerState {
    /// Map a numeric player state
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            -1 => Some(Self::Unstarted),
            0 => Some(Self::Ended),
            1 => Some(Self::Playing),
            2 => Some(Self::Paused),
            3 => Some(Self::Buffering),
            5 => Some(Self::Cued),
            _ => None,
        }
    }
}

/// Callbacks raised by the embedded player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum VideoPlayerEvent {
    /// Player finished initialising
    Ready,
    /// Player state changed
    StateChange(VideoPlayerState),
    /// Player error code
    Error(i32),
}

/// Human readable text for a player error code
pub fn describe_error(code: i32) -> &'static str {
    match code {
        2 => "invalid video id",
        5 => "video cannot be played in the HTML5 player",
        100 => "video not found or private",
        101 | 150 => "video owner does not allow embedded playback",
        _ => "unknown player error",
    }
}

/// Adapter around one embedded player for one video
pub struct EmbeddedVideoAdapter {
    id: AdapterId,
    player: Box<dyn VideoPlayer>,
    ready: bool,
    wants_play: bool,
    pending_volume: Option<Volume>,
    pending_seek: Option<f64>,
    torn_down: bool,
}

impl EmbeddedVideoAdapter {
    /// Wrap a freshly created player
    ///
    /// Nothing is sent to the player until it reports `Ready`.
    pub fn start(id: AdapterId, player: Box<dyn VideoPlayer>, options: &AdapterOptions) -> Self {
        debug!(adapter = %id, autoplay = options.autoplay, "Embedded video adapter started");

        Self {
            id,
            player,
            ready: false,
            wants_play: options.autoplay,
            pending_volume: Some(options.volume.clone()),
            pending_seek: None,
            torn_down: false,
        }
    }

    /// Adapter identity
    pub fn id(&self) -> AdapterId {
        self.id
    }

    /// Whether the player reported `Ready`
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Resume playback (queued until ready)
    pub fn play(&mut self) -> Result<()> {
        if self.ready {
            self.player.play_video()
        } else {
            self.wants_play = true;
            Ok(())
        }
    }

    /// Pause playback (queued until ready)
    pub fn pause(&mut self) -> Result<()> {
        if self.ready {
            self.player.pause_video()
        } else {
            self.wants_play = false;
            Ok(())
        }
    }

    /// Seek to `seconds` (queued until ready)
    pub fn seek(&mut self, seconds: f64) -> Result<()> {
        if self.ready {
            self.player.seek_to(seconds)
        } else {
            self.pending_seek = Some(seconds);
            Ok(())
        }
    }

    /// Apply volume and mute (queued until ready)
    pub fn set_volume(&mut self, volume: &Volume) {
        if self.ready {
            apply_volume(self.player.as_mut(), volume);
        } else {
            self.pending_volume = Some(volume.clone());
        }
    }

    /// Playhead in seconds, 0 before ready
    pub fn position(&self) -> f64 {
        if self.ready {
            self.player.current_time()
        } else {
            0.0
        }
    }

    /// Video length in seconds, 0 before ready
    pub fn duration(&self) -> f64 {
        if !self.ready {
            return 0.0;
        }
        let duration = self.player.duration();
        if duration.is_finite() && duration > 0.0 {
            duration
        } else {
            0.0
        }
    }

    /// Translate a player callback into an engine signal
    pub fn handle(&mut self, event: VideoPlayerEvent) -> AdapterSignal {
        match event {
            VideoPlayerEvent::Ready => self.on_ready(),
            VideoPlayerEvent::StateChange(state) => match state {
                VideoPlayerState::Playing => AdapterSignal::Playing,
                VideoPlayerState::Paused => AdapterSignal::Paused,
                VideoPlayerState::Ended => AdapterSignal::Ended,
                VideoPlayerState::Unstarted
                | VideoPlayerState::Buffering
                | VideoPlayerState::Cued => AdapterSignal::None,
            },
            VideoPlayerEvent::Error(code) => {
                warn!(adapter = %self.id, code, "Embedded player error");
                AdapterSignal::Failed(format!(
                    "video player error {code}: {}",
                    describe_error(code)
                ))
            }
        }
    }

    fn on_ready(&mut self) -> AdapterSignal {
        if self.ready {
            return AdapterSignal::None;
        }
        self.ready = true;

        if let Some(volume) = self.pending_volume.take() {
            apply_volume(self.player.as_mut(), &volume);
        }

        if let Some(seconds) = self.pending_seek.take() {
            if let Err(e) = self.player.seek_to(seconds) {
                return AdapterSignal::Failed(e.to_string());
            }
        }

        if self.wants_play {
            if let Err(e) = self.player.play_video() {
                return AdapterSignal::Failed(e.to_string());
            }
        }

        debug!(adapter = %self.id, "Embedded player ready");

        let duration = self.duration();
        AdapterSignal::Ready {
            duration: (duration > 0.0).then_some(duration),
        }
    }

    /// Destroy the player
    ///
    /// Idempotent; the player receives nothing after the first call.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.player.destroy();
        debug!(adapter = %self.id, "Embedded video adapter torn down");
    }
}

impl Drop for EmbeddedVideoAdapter {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn apply_volume(player: &mut dyn VideoPlayer, volume: &Volume) {
    player.set_volume(volume.percent());
    if volume.is_muted() {
        player.mute();
    } else {
        player.unmute();
    }
}
