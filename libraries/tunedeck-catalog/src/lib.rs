//! Tunedeck Catalog
//!
//! HTTP clients for the two places Tunedeck finds music:
//!
//! - [`CatalogClient`]: a free-music catalog serving direct audio streams
//!   (search, featured, by genre)
//! - [`VideoClient`]: a video platform whose embeddable music videos are
//!   played as audio (search, details)
//!
//! Both clients return [`tunedeck_core::Track`]s with the media source already
//! decided, so results can be handed straight to the playback engine.
//!
//! # Example
//!
//! ```ignore
//! use tunedeck_catalog::{CatalogClient, CatalogConfig, VideoClient, VideoConfig};
//!
//! let catalog = CatalogClient::new(CatalogConfig::new("client-id"))?;
//! let featured = catalog.featured().await?;
//!
//! let videos = VideoClient::new(VideoConfig::new("api-key"))?;
//! let clips = videos.search("lofi").await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod catalog;
mod error;
mod http;
mod types;
mod video;

pub use catalog::CatalogClient;
pub use error::{CatalogError, Result};
pub use types::{CatalogConfig, VideoConfig, VideoDetails};
pub use video::VideoClient;
