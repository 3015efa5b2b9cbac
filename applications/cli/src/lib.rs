//! Tunedeck command line front end
//!
//! Browses the audio catalog and the video platform, manages local playlists,
//! and runs a headless playback session against simulated media elements.

pub mod config;
pub mod driver;
pub mod render;
pub mod session;
pub mod simulated;
