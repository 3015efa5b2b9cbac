//! Domain types

mod genre;
mod ids;
mod track;

pub use genre::{genre_by_id, Genre, GENRES};
pub use ids::{TrackId, VideoId};
pub use track::{BackendKind, MediaSource, Track, TrackRecord};
