//! WASM-compatible PlaybackEngine wrapper

use super::host::{JsBackendFactory, JsPollScheduler};
use super::types::{audio_event, to_js, track_from_js, tracks_from_js, video_event};
use crate::{
    AdapterId, PlaybackConfig, PlaybackEngine, PollTaskId, SelectionTicket, UiIntent,
};
use js_sys::Function;
use tunedeck_core::TrackRecord;
use wasm_bindgen::prelude::*;

/// WASM-compatible playback engine
///
/// ```js
/// const engine = new WasmPlaybackEngine(
///   (adapterId, url) => makeAudio(adapterId, url),
///   (adapterId, videoId) => makePlayer(adapterId, videoId),
///   (taskId, ms) => timers.set(taskId, setInterval(() => engine.pollTick(taskId), ms)),
///   (taskId) => clearInterval(timers.get(taskId)),
/// );
/// engine.onEvent((event) => render(event));
/// ```
#[wasm_bindgen]
pub struct WasmPlaybackEngine {
    inner: PlaybackEngine,
    on_event: Option<Function>,
}

#[wasm_bindgen]
impl WasmPlaybackEngine {
    /// Create a new engine
    ///
    /// `config` is optional (`{ poll_interval_ms, volume, muted }`).
    #[wasm_bindgen(constructor)]
    pub fn new(
        create_audio: Function,
        create_video: Function,
        start_poll: Function,
        cancel_poll: Function,
        config: JsValue,
    ) -> Result<WasmPlaybackEngine, JsValue> {
        console_error_panic_hook::set_once();

        let config: PlaybackConfig = if config.is_undefined() || config.is_null() {
            PlaybackConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("Invalid config: {e}")))?
        };

        Ok(Self {
            inner: PlaybackEngine::new(
                config,
                Box::new(JsBackendFactory::new(create_audio, create_video)),
                Box::new(JsPollScheduler::new(start_poll, cancel_poll)),
            ),
            on_event: None,
        })
    }

    // ===== Track Selection =====

    /// Replace the current track and play it
    #[wasm_bindgen(js_name = setTrack)]
    pub fn set_track(&mut self, track: JsValue) -> Result<(), JsValue> {
        let track = track_from_js(track)?;
        let result = self.inner.set_track(track);
        self.flush();
        result.map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Replace the queue, loading the head paused
    #[wasm_bindgen(js_name = setQueue)]
    pub fn set_queue(&mut self, tracks: JsValue) -> Result<(), JsValue> {
        let tracks = tracks_from_js(tracks)?;
        let result = self.inner.set_queue(tracks);
        self.flush();
        result.map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Append a track to the queue
    pub fn enqueue(&mut self, track: JsValue) -> Result<(), JsValue> {
        let track = track_from_js(track)?;
        let result = self.inner.enqueue(track);
        self.flush();
        result.map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Current selection generation
    #[wasm_bindgen(js_name = selectionTicket)]
    pub fn selection_ticket(&self) -> f64 {
        self.inner.selection_ticket().generation() as f64
    }

    /// Start an async selection, superseding earlier tickets
    #[wasm_bindgen(js_name = beginSelection)]
    pub fn begin_selection(&mut self) -> f64 {
        self.inner.begin_selection().generation() as f64
    }

    /// Select a track only if `ticket` is still current
    #[wasm_bindgen(js_name = setTrackFor)]
    pub fn set_track_for(&mut self, ticket: f64, track: JsValue) -> Result<bool, JsValue> {
        let track = track_from_js(track)?;
        let result = self
            .inner
            .set_track_for(SelectionTicket(ticket as u64), track);
        self.flush();
        result.map_err(|e| JsValue::from_str(&e.to_string()))
    }

    // ===== Playback Control =====

    /// Start or resume playback
    pub fn play(&mut self) {
        self.inner.play();
        self.flush();
    }

    /// Pause playback
    pub fn pause(&mut self) {
        self.inner.pause();
        self.flush();
    }

    /// Stop playback
    pub fn stop(&mut self) {
        self.inner.stop();
        self.flush();
    }

    /// Skip to next track
    pub fn next(&mut self) {
        self.inner.next();
        self.flush();
    }

    /// Go to previous track
    pub fn previous(&mut self) {
        self.inner.previous();
        self.flush();
    }

    /// Seek to a fraction of the track (0.0 - 1.0)
    pub fn seek(&mut self, fraction: f64) {
        self.inner.seek(fraction);
        self.flush();
    }

    // ===== Volume Control =====

    /// Set volume (0.0 - 1.0)
    #[wasm_bindgen(js_name = setVolume)]
    pub fn set_volume(&mut self, level: f32) {
        self.inner.set_volume(level);
        self.flush();
    }

    /// Toggle mute
    #[wasm_bindgen(js_name = toggleMute)]
    pub fn toggle_mute(&mut self) {
        self.inner.toggle_mute();
        self.flush();
    }

    /// Set mute state
    #[wasm_bindgen(js_name = setMuted)]
    pub fn set_muted(&mut self, muted: bool) {
        self.inner.set_muted(muted);
        self.flush();
    }

    /// Apply a UI intent (`{ type: "seek", value: 0.5 }`)
    pub fn dispatch(&mut self, intent: JsValue) -> Result<(), JsValue> {
        let intent: UiIntent = serde_wasm_bindgen::from_value(intent)
            .map_err(|e| JsValue::from_str(&format!("Invalid intent: {e}")))?;
        self.inner.dispatch(intent);
        self.flush();
        Ok(())
    }

    // ===== Host Callbacks =====

    /// Forward an audio element DOM event
    #[wasm_bindgen(js_name = handleAudioEvent)]
    pub fn handle_audio_event(
        &mut self,
        adapter_id: f64,
        kind: &str,
        message: Option<String>,
    ) -> Result<(), JsValue> {
        let event = audio_event(kind, message)?;
        self.inner
            .handle_audio_event(AdapterId::from(adapter_id as u64), event);
        self.flush();
        Ok(())
    }

    /// Forward an embedded player callback
    #[wasm_bindgen(js_name = handleVideoEvent)]
    pub fn handle_video_event(
        &mut self,
        adapter_id: f64,
        kind: &str,
        value: i32,
    ) -> Result<(), JsValue> {
        let event = video_event(kind, value)?;
        self.inner
            .handle_video_event(AdapterId::from(adapter_id as u64), event);
        self.flush();
        Ok(())
    }

    /// Poll timer fired
    #[wasm_bindgen(js_name = pollTick)]
    pub fn poll_tick(&mut self, task_id: f64) {
        self.inner.on_poll_tick(PollTaskId::from(task_id as u64));
        self.flush();
    }

    // ===== State Queries =====

    /// Full playback state
    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&self) -> JsValue {
        to_js(self.inner.state())
    }

    /// Player bar view model, `null` when nothing is selected
    #[wasm_bindgen(js_name = nowPlaying)]
    pub fn now_playing(&self) -> JsValue {
        to_js(&self.inner.now_playing())
    }

    /// Queued tracks as flat records
    #[wasm_bindgen(js_name = getQueue)]
    pub fn get_queue(&self) -> JsValue {
        let records: Vec<TrackRecord> = self
            .inner
            .queue()
            .tracks()
            .iter()
            .map(TrackRecord::from)
            .collect();
        to_js(&records)
    }

    /// Check if playing
    #[wasm_bindgen(js_name = isPlaying)]
    pub fn is_playing(&self) -> bool {
        self.inner.is_playing()
    }

    // ===== Event Listeners =====

    /// Register the event callback
    ///
    /// Events queued so far are delivered immediately.
    #[wasm_bindgen(js_name = onEvent)]
    pub fn on_event(&mut self, callback: Function) {
        self.on_event = Some(callback);
        self.flush();
    }

    /// Take pending events (when no callback is registered)
    #[wasm_bindgen(js_name = drainEvents)]
    pub fn drain_events(&mut self) -> JsValue {
        to_js(&self.inner.drain_events())
    }

    fn flush(&mut self) {
        let Some(callback) = self.on_event.as_ref() else {
            return;
        };

        for event in self.inner.drain_events() {
            callback.call1(&JsValue::NULL, &to_js(&event)).ok();
        }
    }
}
