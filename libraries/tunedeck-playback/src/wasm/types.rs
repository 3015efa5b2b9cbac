//! Conversions between JS values and engine types

use crate::backend::{AudioElementEvent, VideoPlayerEvent, VideoPlayerState};
use js_sys::Array;
use serde::Serialize;
use tunedeck_core::{Track, TrackRecord};
use wasm_bindgen::{JsCast, JsValue};

/// Parse a JS track
///
/// Accepts both the tagged shape (`{ id, title, artist, source: { kind, ... } }`)
/// and the flat record shape (`{ id, title, artist, cover, url, duration }`).
pub fn track_from_js(value: JsValue) -> Result<Track, JsValue> {
    if let Ok(track) = serde_wasm_bindgen::from_value::<Track>(value.clone()) {
        return track
            .validate()
            .map(|()| track)
            .map_err(|e| JsValue::from_str(&e.to_string()));
    }

    let record: TrackRecord = serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsValue::from_str(&format!("Failed to parse track: {e}")))?;

    Track::try_from(record).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Parse a JS array of tracks
pub fn tracks_from_js(value: JsValue) -> Result<Vec<Track>, JsValue> {
    let items: Array = value
        .dyn_into()
        .map_err(|_| JsValue::from_str("Failed to parse tracks: expected an array"))?;

    items.iter().map(track_from_js).collect()
}

/// Serialize anything for JS, `null` on failure
pub fn to_js<T: Serialize>(value: &T) -> JsValue {
    serde_wasm_bindgen::to_value(value).unwrap_or(JsValue::NULL)
}

/// Map an audio element DOM event name
///
/// `loadedmetadata`, `play`, `pause`, `emptied`, `ended`, `error` and
/// `playerror` (a rejected `play()` promise).
pub fn audio_event(kind: &str, message: Option<String>) -> Result<AudioElementEvent, JsValue> {
    let text = message.unwrap_or_default();

    Ok(match kind {
        "loadedmetadata" | "loaded" => AudioElementEvent::Loaded,
        "play" | "playing" => AudioElementEvent::Played,
        "pause" => AudioElementEvent::Paused,
        "emptied" | "stop" => AudioElementEvent::Stopped,
        "ended" => AudioElementEvent::Ended,
        "error" => AudioElementEvent::LoadError(text),
        "playerror" => AudioElementEvent::PlayError(text),
        other => return Err(JsValue::from_str(&format!("Unknown audio event: {other}"))),
    })
}

/// Map an embedded player callback (`ready`, `statechange`, `error`)
pub fn video_event(kind: &str, value: i32) -> Result<VideoPlayerEvent, JsValue> {
    Ok(match kind {
        "ready" => VideoPlayerEvent::Ready,
        "statechange" | "stateChange" => VideoPlayerEvent::StateChange(
            VideoPlayerState::from_code(value)
                .ok_or_else(|| JsValue::from_str(&format!("Unknown player state: {value}")))?,
        ),
        "error" => VideoPlayerEvent::Error(value),
        other => return Err(JsValue::from_str(&format!("Unknown video event: {other}"))),
    })
}
