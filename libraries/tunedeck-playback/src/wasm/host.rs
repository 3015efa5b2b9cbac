//! JavaScript host services

use crate::backend::{AdapterId, AudioElement, BackendFactory, VideoPlayer};
use crate::error::{PlaybackError, Result};
use crate::schedule::{PollScheduler, PollTaskId};
use js_sys::{Function, Reflect};
use std::time::Duration;
use tracing::warn;
use tunedeck_core::VideoId;
use wasm_bindgen::{JsCast, JsValue};

fn js_error(value: JsValue) -> PlaybackError {
    PlaybackError::backend(value.as_string().unwrap_or_else(|| format!("{value:?}")))
}

fn method(target: &JsValue, name: &str) -> Result<Function> {
    Reflect::get(target, &JsValue::from_str(name))
        .map_err(js_error)?
        .dyn_into::<Function>()
        .map_err(|_| PlaybackError::backend(format!("host object has no `{name}` method")))
}

fn call0(target: &JsValue, name: &str) -> Result<JsValue> {
    method(target, name)?.call0(target).map_err(js_error)
}

fn call1(target: &JsValue, name: &str, arg: &JsValue) -> Result<JsValue> {
    method(target, name)?.call1(target, arg).map_err(js_error)
}

fn call2(target: &JsValue, name: &str, a: &JsValue, b: &JsValue) -> Result<JsValue> {
    method(target, name)?.call2(target, a, b).map_err(js_error)
}

fn get_number(target: &JsValue, property: &str) -> f64 {
    Reflect::get(target, &JsValue::from_str(property))
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0)
}

fn set_property(target: &JsValue, property: &str, value: &JsValue) -> Result<()> {
    Reflect::set(target, &JsValue::from_str(property), value)
        .map_err(js_error)
        .map(|_| ())
}

/// An `HTMLAudioElement` (or anything shaped like one)
pub struct JsAudioElement {
    element: JsValue,
}

impl JsAudioElement {
    /// Wrap a JS audio element
    pub fn new(element: JsValue) -> Self {
        Self { element }
    }
}

impl AudioElement for JsAudioElement {
    fn play(&mut self) -> Result<()> {
        // The returned promise rejects asynchronously; the host forwards that
        // as a play error event.
        call0(&self.element, "play").map(|_| ())
    }

    fn pause(&mut self) -> Result<()> {
        call0(&self.element, "pause").map(|_| ())
    }

    fn stop(&mut self) {
        if let Err(e) = call0(&self.element, "pause")
            .and_then(|_| set_property(&self.element, "currentTime", &JsValue::from_f64(0.0)))
        {
            warn!(error = %e, "Failed to stop audio element");
        }
    }

    fn unload(&mut self) {
        if let Err(e) = call1(&self.element, "removeAttribute", &JsValue::from_str("src"))
            .and_then(|_| call0(&self.element, "load"))
        {
            warn!(error = %e, "Failed to unload audio element");
        }
    }

    fn seek(&mut self, seconds: f64) -> Result<()> {
        set_property(&self.element, "currentTime", &JsValue::from_f64(seconds))
    }

    fn set_volume(&mut self, gain: f32) {
        if let Err(e) = set_property(&self.element, "volume", &JsValue::from_f64(f64::from(gain))) {
            warn!(error = %e, "Failed to set audio volume");
        }
    }

    fn position(&self) -> f64 {
        get_number(&self.element, "currentTime")
    }

    fn duration(&self) -> f64 {
        get_number(&self.element, "duration")
    }
}

/// An iframe player object (`YT.Player` shaped)
pub struct JsVideoPlayer {
    player: JsValue,
}

impl JsVideoPlayer {
    /// Wrap a JS player object
    pub fn new(player: JsValue) -> Self {
        Self { player }
    }

    fn call_quiet(&self, name: &str) {
        if let Err(e) = call0(&self.player, name) {
            warn!(method = name, error = %e, "Embedded player call failed");
        }
    }

    fn number(&self, name: &str) -> f64 {
        call0(&self.player, name)
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0)
    }
}

impl VideoPlayer for JsVideoPlayer {
    fn play_video(&mut self) -> Result<()> {
        call0(&self.player, "playVideo").map(|_| ())
    }

    fn pause_video(&mut self) -> Result<()> {
        call0(&self.player, "pauseVideo").map(|_| ())
    }

    fn seek_to(&mut self, seconds: f64) -> Result<()> {
        call2(
            &self.player,
            "seekTo",
            &JsValue::from_f64(seconds),
            &JsValue::TRUE,
        )
        .map(|_| ())
    }

    fn set_volume(&mut self, percent: u8) {
        if let Err(e) = call1(&self.player, "setVolume", &JsValue::from(percent)) {
            warn!(error = %e, "Failed to set player volume");
        }
    }

    fn mute(&mut self) {
        self.call_quiet("mute");
    }

    fn unmute(&mut self) {
        self.call_quiet("unMute");
    }

    fn current_time(&self) -> f64 {
        self.number("getCurrentTime")
    }

    fn duration(&self) -> f64 {
        self.number("getDuration")
    }

    fn destroy(&mut self) {
        self.call_quiet("destroy");
    }
}

/// Factory backed by two JS functions
///
/// `createAudio(adapterId, url)` returns an audio element,
/// `createVideo(adapterId, videoId)` returns a player. The host tags every
/// callback it forwards with `adapterId`.
pub struct JsBackendFactory {
    create_audio: Function,
    create_video: Function,
}

impl JsBackendFactory {
    /// Create a factory from the two constructors
    pub fn new(create_audio: Function, create_video: Function) -> Self {
        Self {
            create_audio,
            create_video,
        }
    }
}

fn expect_object(value: JsValue, what: &str) -> Result<JsValue> {
    if value.is_null() || value.is_undefined() {
        Err(PlaybackError::backend(format!("host returned no {what}")))
    } else {
        Ok(value)
    }
}

impl BackendFactory for JsBackendFactory {
    fn create_audio_element(
        &mut self,
        adapter: AdapterId,
        url: &str,
    ) -> Result<Box<dyn AudioElement>> {
        let element = self
            .create_audio
            .call2(
                &JsValue::NULL,
                &JsValue::from_f64(adapter.raw() as f64),
                &JsValue::from_str(url),
            )
            .map_err(js_error)?;

        Ok(Box::new(JsAudioElement::new(expect_object(
            element,
            "audio element",
        )?)))
    }

    fn create_video_player(
        &mut self,
        adapter: AdapterId,
        video_id: &VideoId,
    ) -> Result<Box<dyn VideoPlayer>> {
        let player = self
            .create_video
            .call2(
                &JsValue::NULL,
                &JsValue::from_f64(adapter.raw() as f64),
                &JsValue::from_str(video_id.as_str()),
            )
            .map_err(js_error)?;

        Ok(Box::new(JsVideoPlayer::new(expect_object(
            player,
            "video player",
        )?)))
    }
}

/// Scheduler backed by `setInterval`/`clearInterval` wrappers
///
/// `start(taskId, intervalMs)` must arrange for `engine.pollTick(taskId)` to be
/// called every interval; `cancel(taskId)` stops it.
pub struct JsPollScheduler {
    start: Function,
    cancel: Function,
}

impl JsPollScheduler {
    /// Create a scheduler from the two JS functions
    pub fn new(start: Function, cancel: Function) -> Self {
        Self { start, cancel }
    }
}

impl PollScheduler for JsPollScheduler {
    fn start(&mut self, task: PollTaskId, interval: Duration) {
        if let Err(e) = self.start.call2(
            &JsValue::NULL,
            &JsValue::from_f64(task.raw() as f64),
            &JsValue::from_f64(interval.as_millis() as f64),
        ) {
            warn!(task = %task, error = %js_error(e), "Failed to start poll timer");
        }
    }

    fn cancel(&mut self, task: PollTaskId) {
        if let Err(e) = self
            .cancel
            .call1(&JsValue::NULL, &JsValue::from_f64(task.raw() as f64))
        {
            warn!(task = %task, error = %js_error(e), "Failed to cancel poll timer");
        }
    }
}
