//! Tunedeck Core
//!
//! Platform-agnostic track types, parsing helpers, and error handling shared by
//! every Tunedeck crate.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `MediaSource`, `TrackId`, `VideoId`, `Genre`
//! - **Ingestion**: `TrackRecord` for untyped records coming from older stores or JavaScript
//! - **Parsing**: ISO-8601 video durations (`PT1H2M3S`)
//! - **Error Handling**: Unified `CoreError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use tunedeck_core::{MediaSource, Track, VideoId};
//!
//! let song = Track::direct_audio("1204669", "Nightfall", "Lumen", "https://cdn.example/1204669.mp3");
//! assert!(song.is_direct_audio());
//!
//! let video_id = VideoId::parse("dQw4w9WgXcQ").unwrap();
//! let clip = Track::embedded_video(video_id, "Live session", "Some Channel");
//! assert!(matches!(clip.source, MediaSource::EmbeddedVideo { .. }));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod duration;
pub mod error;
pub mod types;

pub use duration::parse_iso8601_duration;
pub use error::{CoreError, Result};
pub use types::{
    genre_by_id, BackendKind, Genre, MediaSource, Track, TrackId, TrackRecord, VideoId, GENRES,
};
