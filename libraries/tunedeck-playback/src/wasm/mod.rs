//! WASM bindings for tunedeck-playback
//!
//! Exposes [`crate::PlaybackEngine`] to the browser. JavaScript supplies the
//! host services as plain functions; the returned audio elements and video
//! players are driven through `js_sys::Reflect`.

pub mod engine;
pub mod host;
pub mod types;

pub use engine::WasmPlaybackEngine;
pub use host::{JsAudioElement, JsBackendFactory, JsPollScheduler, JsVideoPlayer};
