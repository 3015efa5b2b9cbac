//! Clock-driven stand-ins for the browser media elements.
//!
//! Nothing is decoded: each element keeps a virtual playhead on the tokio
//! clock and reports load, play and end through the session channel exactly
//! like a browser host would.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::debug;
use tunedeck_core::VideoId;
use tunedeck_playback::{
    AdapterId, AudioElement, AudioElementEvent, BackendFactory, VideoPlayer, VideoPlayerEvent,
    VideoPlayerState,
};

use crate::session::SessionInput;

/// Settings for the simulated backends
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulatedConfig {
    /// Length reported for every simulated track, in seconds
    #[serde(default = "default_track_seconds")]
    pub track_seconds: f64,
}

impl Default for SimulatedConfig {
    fn default() -> Self {
        Self {
            track_seconds: default_track_seconds(),
        }
    }
}

fn default_track_seconds() -> f64 {
    30.0
}

/// Virtual playhead
#[derive(Debug)]
struct Clock {
    length: f64,
    offset: f64,
    started: Option<Instant>,
}

impl Clock {
    fn new(length: f64) -> Self {
        Self {
            length: if length.is_finite() { length.max(0.0) } else { 0.0 },
            offset: 0.0,
            started: None,
        }
    }

    fn position(&self) -> f64 {
        let running = self
            .started
            .map_or(0.0, |started| started.elapsed().as_secs_f64());
        (self.offset + running).min(self.length)
    }

    fn is_running(&self) -> bool {
        self.started.is_some()
    }

    fn start(&mut self) {
        if self.started.is_none() {
            self.started = Some(Instant::now());
        }
    }

    fn halt(&mut self) {
        self.offset = self.position();
        self.started = None;
    }

    fn jump(&mut self, seconds: f64) {
        self.offset = seconds.clamp(0.0, self.length);
        if self.started.is_some() {
            self.started = Some(Instant::now());
        }
    }

    fn reset(&mut self) {
        self.offset = 0.0;
        self.started = None;
    }

    fn remaining(&self) -> Duration {
        Duration::from_secs_f64((self.length - self.position()).max(0.0))
    }
}

/// Fires `input` through `tx` once the clock would reach the end
fn schedule_end(
    tx: &UnboundedSender<SessionInput>,
    clock: &Clock,
    input: SessionInput,
) -> JoinHandle<()> {
    let tx = tx.clone();
    let delay = clock.remaining();
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let _ = tx.send(input);
    })
}

fn cancel(timer: &mut Option<JoinHandle<()>>) {
    if let Some(handle) = timer.take() {
        handle.abort();
    }
}

// =============================================================================
// Audio element
// =============================================================================

/// Simulated streaming audio element
#[derive(Debug)]
pub struct SimulatedAudio {
    id: AdapterId,
    url: String,
    clock: Clock,
    gain: f32,
    tx: UnboundedSender<SessionInput>,
    end_timer: Option<JoinHandle<()>>,
}

impl SimulatedAudio {
    fn new(id: AdapterId, url: &str, length: f64, tx: UnboundedSender<SessionInput>) -> Self {
        // Metadata "arrives" on the next turn
        let _ = tx.send(SessionInput::Audio(id, AudioElementEvent::Loaded));
        Self {
            id,
            url: url.to_string(),
            clock: Clock::new(length),
            gain: 1.0,
            tx,
            end_timer: None,
        }
    }

    fn emit(&self, event: AudioElementEvent) {
        let _ = self.tx.send(SessionInput::Audio(self.id, event));
    }

    fn rearm_end(&mut self) {
        cancel(&mut self.end_timer);
        if self.clock.is_running() {
            self.end_timer = Some(schedule_end(
                &self.tx,
                &self.clock,
                SessionInput::Audio(self.id, AudioElementEvent::Ended),
            ));
        }
    }
}

impl AudioElement for SimulatedAudio {
    fn play(&mut self) -> tunedeck_playback::Result<()> {
        debug!(adapter = %self.id, url = %self.url, "Simulated audio play");
        self.clock.start();
        self.rearm_end();
        self.emit(AudioElementEvent::Played);
        Ok(())
    }

    fn pause(&mut self) -> tunedeck_playback::Result<()> {
        self.clock.halt();
        cancel(&mut self.end_timer);
        self.emit(AudioElementEvent::Paused);
        Ok(())
    }

    fn stop(&mut self) {
        self.clock.reset();
        cancel(&mut self.end_timer);
    }

    fn unload(&mut self) {
        debug!(adapter = %self.id, "Simulated audio unloaded");
        self.clock.reset();
        cancel(&mut self.end_timer);
    }

    fn seek(&mut self, seconds: f64) -> tunedeck_playback::Result<()> {
        self.clock.jump(seconds);
        self.rearm_end();
        Ok(())
    }

    fn set_volume(&mut self, gain: f32) {
        self.gain = gain;
    }

    fn position(&self) -> f64 {
        self.clock.position()
    }

    fn duration(&self) -> f64 {
        self.clock.length
    }
}

impl Drop for SimulatedAudio {
    fn drop(&mut self) {
        cancel(&mut self.end_timer);
    }
}

// =============================================================================
// Video player
// =============================================================================

/// Simulated embedded video player
#[derive(Debug)]
pub struct SimulatedVideo {
    id: AdapterId,
    video_id: VideoId,
    clock: Clock,
    volume: u8,
    muted: bool,
    tx: UnboundedSender<SessionInput>,
    end_timer: Option<JoinHandle<()>>,
}

impl SimulatedVideo {
    fn new(
        id: AdapterId,
        video_id: &VideoId,
        length: f64,
        tx: UnboundedSender<SessionInput>,
    ) -> Self {
        let _ = tx.send(SessionInput::Video(id, VideoPlayerEvent::Ready));
        Self {
            id,
            video_id: video_id.clone(),
            clock: Clock::new(length),
            volume: 100,
            muted: false,
            tx,
            end_timer: None,
        }
    }

    fn emit_state(&self, state: VideoPlayerState) {
        let _ = self
            .tx
            .send(SessionInput::Video(self.id, VideoPlayerEvent::StateChange(state)));
    }

    fn rearm_end(&mut self) {
        cancel(&mut self.end_timer);
        if self.clock.is_running() {
            self.end_timer = Some(schedule_end(
                &self.tx,
                &self.clock,
                SessionInput::Video(
                    self.id,
                    VideoPlayerEvent::StateChange(VideoPlayerState::Ended),
                ),
            ));
        }
    }
}

impl VideoPlayer for SimulatedVideo {
    fn play_video(&mut self) -> tunedeck_playback::Result<()> {
        debug!(adapter = %self.id, video_id = %self.video_id, "Simulated video play");
        self.clock.start();
        self.rearm_end();
        self.emit_state(VideoPlayerState::Playing);
        Ok(())
    }

    fn pause_video(&mut self) -> tunedeck_playback::Result<()> {
        self.clock.halt();
        cancel(&mut self.end_timer);
        self.emit_state(VideoPlayerState::Paused);
        Ok(())
    }

    fn seek_to(&mut self, seconds: f64) -> tunedeck_playback::Result<()> {
        self.clock.jump(seconds);
        self.rearm_end();
        Ok(())
    }

    fn set_volume(&mut self, percent: u8) {
        self.volume = percent.min(100);
    }

    fn mute(&mut self) {
        self.muted = true;
    }

    fn unmute(&mut self) {
        self.muted = false;
    }

    fn current_time(&self) -> f64 {
        self.clock.position()
    }

    fn duration(&self) -> f64 {
        self.clock.length
    }

    fn destroy(&mut self) {
        debug!(adapter = %self.id, "Simulated video destroyed");
        self.clock.reset();
        cancel(&mut self.end_timer);
    }
}

impl Drop for SimulatedVideo {
    fn drop(&mut self) {
        cancel(&mut self.end_timer);
    }
}

// =============================================================================
// Factory
// =============================================================================

/// Builds simulated elements that report through the session channel
pub struct SimulatedFactory {
    config: SimulatedConfig,
    tx: UnboundedSender<SessionInput>,
}

impl SimulatedFactory {
    pub fn new(config: SimulatedConfig, tx: UnboundedSender<SessionInput>) -> Self {
        Self { config, tx }
    }
}

impl BackendFactory for SimulatedFactory {
    fn create_audio_element(
        &mut self,
        id: AdapterId,
        url: &str,
    ) -> tunedeck_playback::Result<Box<dyn AudioElement>> {
        Ok(Box::new(SimulatedAudio::new(
            id,
            url,
            self.config.track_seconds,
            self.tx.clone(),
        )))
    }

    fn create_video_player(
        &mut self,
        id: AdapterId,
        video_id: &VideoId,
    ) -> tunedeck_playback::Result<Box<dyn VideoPlayer>> {
        Ok(Box::new(SimulatedVideo::new(
            id,
            video_id,
            self.config.track_seconds,
            self.tx.clone(),
        )))
    }
}
