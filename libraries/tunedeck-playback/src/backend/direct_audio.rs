//! Direct audio backend
//!
//! Wraps a streaming audio element (an `HTMLAudioElement` in the browser, a
//! simulated clock in the terminal session). The element is created already
//! pointed at the stream URL.

use super::{AdapterId, AdapterOptions, AdapterSignal};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Platform audio element
///
/// Implementors hold a host handle (a JS object, a simulated clock) and are
/// driven from a single thread, so no `Send` bound is required.
pub trait AudioElement {
    /// Start or resume playback
    fn play(&mut self) -> Result<()>;

    /// Pause playback, keeping the position
    fn pause(&mut self) -> Result<()>;

    /// Stop playback and rewind
    fn stop(&mut self);

    /// Release the stream and any host resources
    fn unload(&mut self);

    /// Move the playhead to `seconds`
    fn seek(&mut self, seconds: f64) -> Result<()>;

    /// Set linear gain in [0, 1]
    fn set_volume(&mut self, gain: f32);

    /// Playhead in seconds
    fn position(&self) -> f64;

    /// Stream length in seconds (NaN or 0 before metadata is loaded)
    fn duration(&self) -> f64;
}

/// Callbacks raised by an audio element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message", rename_all = "snake_case")]
pub enum AudioElementEvent {
    /// Metadata loaded, duration known
    Loaded,
    /// Playback started
    Played,
    /// Playback paused
    Paused,
    /// Playback stopped
    Stopped,
    /// Reached the end of the stream
    Ended,
    /// Stream could not be loaded
    LoadError(String),
    /// Playback was refused
    PlayError(String),
}

/// Adapter around one audio element for one track
pub struct DirectAudioAdapter {
    id: AdapterId,
    element: Box<dyn AudioElement>,
    loaded: bool,
    torn_down: bool,
}

impl DirectAudioAdapter {
    /// Configure the element and start it if `options.autoplay` is set
    ///
    /// On failure the element is released before the error is returned.
    pub fn start(
        id: AdapterId,
        mut element: Box<dyn AudioElement>,
        options: &AdapterOptions,
    ) -> Result<Self> {
        element.set_volume(options.volume.gain());

        if options.autoplay {
            if let Err(e) = element.play() {
                element.stop();
                element.unload();
                return Err(e);
            }
        }

        debug!(adapter = %id, autoplay = options.autoplay, "Direct audio adapter started");

        Ok(Self {
            id,
            element,
            loaded: false,
            torn_down: false,
        })
    }

    /// Adapter identity
    pub fn id(&self) -> AdapterId {
        self.id
    }

    /// Whether metadata has been loaded
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Resume playback
    pub fn play(&mut self) -> Result<()> {
        self.element.play()
    }

    /// Pause playback
    pub fn pause(&mut self) -> Result<()> {
        self.element.pause()
    }

    /// Seek to `seconds`
    pub fn seek(&mut self, seconds: f64) -> Result<()> {
        self.element.seek(seconds)
    }

    /// Apply a linear gain
    pub fn set_gain(&mut self, gain: f32) {
        self.element.set_volume(gain);
    }

    /// Playhead in seconds
    pub fn position(&self) -> f64 {
        self.element.position()
    }

    /// Stream length in seconds, 0 while unknown
    pub fn duration(&self) -> f64 {
        finite_or_zero(self.element.duration())
    }

    /// Translate an element callback into an engine signal
    pub fn handle(&mut self, event: AudioElementEvent) -> AdapterSignal {
        match event {
            AudioElementEvent::Loaded => {
                self.loaded = true;
                let duration = self.duration();
                AdapterSignal::Ready {
                    duration: (duration > 0.0).then_some(duration),
                }
            }
            AudioElementEvent::Played => AdapterSignal::Playing,
            AudioElementEvent::Paused | AudioElementEvent::Stopped => AdapterSignal::Paused,
            AudioElementEvent::Ended => AdapterSignal::Ended,
            AudioElementEvent::LoadError(message) => {
                AdapterSignal::Failed(format!("audio failed to load: {message}"))
            }
            AudioElementEvent::PlayError(message) => {
                AdapterSignal::Failed(format!("audio failed to play: {message}"))
            }
        }
    }

    /// Stop and release the element
    ///
    /// Idempotent; the element receives nothing after the first call.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.element.stop();
        self.element.unload();
        debug!(adapter = %self.id, "Direct audio adapter torn down");
    }
}

impl Drop for DirectAudioAdapter {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}
