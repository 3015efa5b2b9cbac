//! Media backends
//!
//! Two incompatible players sit behind the engine: a streaming audio element
//! and an embedded video player. Hosts construct them through a
//! [`BackendFactory`]; the engine wraps each in an adapter that translates
//! host callbacks into [`AdapterSignal`]s.

pub mod direct_audio;
pub mod embedded_video;

use crate::error::Result;
use crate::volume::Volume;
use std::fmt;
use tunedeck_core::{BackendKind, MediaSource, VideoId};

pub use direct_audio::{AudioElement, AudioElementEvent, DirectAudioAdapter};
pub use embedded_video::{
    describe_error, EmbeddedVideoAdapter, VideoPlayer, VideoPlayerEvent, VideoPlayerState,
};

/// Identity of one adapter instance
///
/// Hosts tag every callback with the id they were given at construction so
/// that callbacks from a replaced adapter can be dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AdapterId(u64);

impl AdapterId {
    /// Raw id
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl From<u64> for AdapterId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for AdapterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "adapter-{}", self.0)
    }
}

/// Settings applied when an adapter starts
#[derive(Debug, Clone)]
pub struct AdapterOptions {
    /// Start playing as soon as possible
    pub autoplay: bool,
    /// Volume and mute state
    pub volume: Volume,
}

/// What an adapter callback means for the engine
#[derive(Debug, Clone, PartialEq)]
pub enum AdapterSignal {
    /// Nothing to do
    None,
    /// Backend is ready; duration if known
    Ready {
        /// Length in seconds
        duration: Option<f64>,
    },
    /// Backend is playing
    Playing,
    /// Backend paused or stopped
    Paused,
    /// Track reached its end
    Ended,
    /// Backend is no longer usable
    Failed(String),
}

/// Constructs host players
///
/// Called once per track selection with a fresh [`AdapterId`].
pub trait BackendFactory {
    /// Create an audio element loaded with `url`
    fn create_audio_element(
        &mut self,
        adapter: AdapterId,
        url: &str,
    ) -> Result<Box<dyn AudioElement>>;

    /// Create an embedded player cued with `video_id`
    fn create_video_player(
        &mut self,
        adapter: AdapterId,
        video_id: &VideoId,
    ) -> Result<Box<dyn VideoPlayer>>;
}

/// The single live adapter
pub(crate) enum LiveBackend {
    DirectAudio(DirectAudioAdapter),
    EmbeddedVideo(EmbeddedVideoAdapter),
}

impl LiveBackend {
    /// Build the adapter matching `source`
    pub(crate) fn open(
        factory: &mut dyn BackendFactory,
        id: AdapterId,
        source: &MediaSource,
        options: &AdapterOptions,
    ) -> Result<Self> {
        match source {
            MediaSource::DirectAudio { url } => {
                let element = factory.create_audio_element(id, url)?;
                Ok(Self::DirectAudio(DirectAudioAdapter::start(
                    id, element, options,
                )?))
            }
            MediaSource::EmbeddedVideo { video_id } => {
                let player = factory.create_video_player(id, video_id)?;
                Ok(Self::EmbeddedVideo(EmbeddedVideoAdapter::start(
                    id, player, options,
                )))
            }
        }
    }

    pub(crate) fn id(&self) -> AdapterId {
        match self {
            Self::DirectAudio(a) => a.id(),
            Self::EmbeddedVideo(v) => v.id(),
        }
    }

    pub(crate) fn kind(&self) -> BackendKind {
        match self {
            Self::DirectAudio(_) => BackendKind::DirectAudio,
            Self::EmbeddedVideo(_) => BackendKind::EmbeddedVideo,
        }
    }

    pub(crate) fn play(&mut self) -> Result<()> {
        match self {
            Self::DirectAudio(a) => a.play(),
            Self::EmbeddedVideo(v) => v.play(),
        }
    }

    pub(crate) fn pause(&mut self) -> Result<()> {
        match self {
            Self::DirectAudio(a) => a.pause(),
            Self::EmbeddedVideo(v) => v.pause(),
        }
    }

    pub(crate) fn seek(&mut self, seconds: f64) -> Result<()> {
        match self {
            Self::DirectAudio(a) => a.seek(seconds),
            Self::EmbeddedVideo(v) => v.seek(seconds),
        }
    }

    pub(crate) fn set_volume(&mut self, volume: &Volume) {
        match self {
            Self::DirectAudio(a) => a.set_gain(volume.gain()),
            Self::EmbeddedVideo(v) => v.set_volume(volume),
        }
    }

    pub(crate) fn position(&self) -> f64 {
        match self {
            Self::DirectAudio(a) => a.position(),
            Self::EmbeddedVideo(v) => v.position(),
        }
    }

    pub(crate) fn duration(&self) -> f64 {
        match self {
            Self::DirectAudio(a) => a.duration(),
            Self::EmbeddedVideo(v) => v.duration(),
        }
    }

    /// Route an audio callback; `None` if this is not an audio adapter
    pub(crate) fn handle_audio(&mut self, event: AudioElementEvent) -> Option<AdapterSignal> {
        match self {
            Self::DirectAudio(a) => Some(a.handle(event)),
            Self::EmbeddedVideo(_) => None,
        }
    }

    /// Route a video callback; `None` if this is not a video adapter
    pub(crate) fn handle_video(&mut self, event: VideoPlayerEvent) -> Option<AdapterSignal> {
        match self {
            Self::EmbeddedVideo(v) => Some(v.handle(event)),
            Self::DirectAudio(_) => None,
        }
    }

    pub(crate) fn teardown(&mut self) {
        match self {
            Self::DirectAudio(a) => a.teardown(),
            Self::EmbeddedVideo(v) => v.teardown(),
        }
    }
}
