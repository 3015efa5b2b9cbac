//! Tunedeck - Playback Engine
//!
//! Platform-agnostic playback state machine for Tunedeck.
//!
//! This crate provides:
//! - A single canonical playback state (track, playing, volume, playhead)
//! - An ordered queue with a clamped cursor
//! - Two backend adapters: streaming audio and embedded video-as-audio
//! - Progress polling through a host-supplied scheduler
//! - UI intents and a now-playing view model
//! - Browser bindings behind the `wasm` feature
//!
//! # Architecture
//!
//! The engine never talks to a media API directly. Hosts provide:
//! - a [`BackendFactory`] that builds [`AudioElement`]s and [`VideoPlayer`]s
//! - a [`PollScheduler`] that ticks the engine while something plays
//!
//! and feed host callbacks back in through
//! [`PlaybackEngine::handle_audio_event`],
//! [`PlaybackEngine::handle_video_event`] and
//! [`PlaybackEngine::on_poll_tick`]. Each call is one turn; after a turn the
//! host drains [`PlayerEvent`]s and re-renders.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use tunedeck_core::{Track, VideoId};
//! use tunedeck_playback::{
//!     AdapterId, AudioElement, BackendFactory, EngineStatus, PlaybackConfig, PlaybackEngine,
//!     PollScheduler, PollTaskId, Result, VideoPlayer,
//! };
//!
//! struct Silent;
//!
//! impl AudioElement for Silent {
//!     fn play(&mut self) -> Result<()> { Ok(()) }
//!     fn pause(&mut self) -> Result<()> { Ok(()) }
//!     fn stop(&mut self) {}
//!     fn unload(&mut self) {}
//!     fn seek(&mut self, _seconds: f64) -> Result<()> { Ok(()) }
//!     fn set_volume(&mut self, _gain: f32) {}
//!     fn position(&self) -> f64 { 0.0 }
//!     fn duration(&self) -> f64 { 180.0 }
//! }
//!
//! struct Factory;
//!
//! impl BackendFactory for Factory {
//!     fn create_audio_element(&mut self, _: AdapterId, _: &str) -> Result<Box<dyn AudioElement>> {
//!         Ok(Box::new(Silent))
//!     }
//!     fn create_video_player(&mut self, _: AdapterId, _: &VideoId) -> Result<Box<dyn VideoPlayer>> {
//!         Err(tunedeck_playback::PlaybackError::backend("no video in this host"))
//!     }
//! }
//!
//! struct NoTimer;
//!
//! impl PollScheduler for NoTimer {
//!     fn start(&mut self, _: PollTaskId, _: Duration) {}
//!     fn cancel(&mut self, _: PollTaskId) {}
//! }
//!
//! let mut engine = PlaybackEngine::new(
//!     PlaybackConfig::default(),
//!     Box::new(Factory),
//!     Box::new(NoTimer),
//! );
//!
//! let track = Track::direct_audio("1204669", "Nightfall", "Lumen", "https://cdn.example/1.mp3");
//! engine.set_track(track)?;
//! engine.set_volume(1.7);
//!
//! assert!(engine.is_playing());
//! assert_eq!(engine.state().volume, 1.0);
//! assert!(matches!(engine.status(), EngineStatus::Active(_)));
//! # Ok::<(), tunedeck_playback::PlaybackError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod backend;
mod engine;
mod error;
pub mod events;
mod queue;
pub mod schedule;
mod surface;
pub mod types;
mod volume;

#[cfg(feature = "wasm")]
pub mod wasm;

// Public exports
pub use backend::{
    AdapterId, AdapterOptions, AdapterSignal, AudioElement, AudioElementEvent, BackendFactory,
    DirectAudioAdapter, EmbeddedVideoAdapter, VideoPlayer, VideoPlayerEvent, VideoPlayerState,
};
pub use engine::PlaybackEngine;
pub use error::{PlaybackError, Result};
pub use events::PlayerEvent;
pub use queue::Queue;
pub use schedule::{PollScheduler, PollTaskId};
pub use surface::{format_time, NowPlayingView, UiIntent};
pub use types::{EngineStatus, PlaybackConfig, PlaybackState, SelectionTicket};
pub use volume::Volume;
