//! Playback engine - core orchestration
//!
//! Owns the canonical [`PlaybackState`], the queue and the single live
//! backend adapter. Every public method is one turn of a single-writer
//! state machine: it mutates state, issues at most one command to the live
//! adapter, and queues [`PlayerEvent`]s for the host to drain.

use crate::{
    backend::{
        AdapterId, AdapterOptions, AdapterSignal, AudioElementEvent, BackendFactory, LiveBackend,
        VideoPlayerEvent,
    },
    error::{PlaybackError, Result},
    events::PlayerEvent,
    queue::Queue,
    schedule::{PollScheduler, PollTaskId},
    surface::{NowPlayingView, UiIntent},
    types::{EngineStatus, PlaybackConfig, PlaybackState, SelectionTicket},
    volume::Volume,
};
use tracing::{debug, info, warn};
use tunedeck_core::{BackendKind, CoreError, Track};

/// Dual-backend playback engine
pub struct PlaybackEngine {
    config: PlaybackConfig,
    state: PlaybackState,
    queue: Queue,
    volume: Volume,

    // Host services
    factory: Box<dyn BackendFactory>,
    scheduler: Box<dyn PollScheduler>,

    // At most one live adapter and one poll task
    backend: Option<LiveBackend>,
    poll_task: Option<PollTaskId>,

    next_adapter_id: u64,
    next_poll_id: u64,
    selection: u64,

    // Set when a retained track may be restarted by `play()`
    rearm: bool,

    pending_events: Vec<PlayerEvent>,
}

impl PlaybackEngine {
    /// Create a new engine with host services
    pub fn new(
        config: PlaybackConfig,
        factory: Box<dyn BackendFactory>,
        scheduler: Box<dyn PollScheduler>,
    ) -> Self {
        let volume = Volume::new(config.volume, config.muted);
        let state = PlaybackState::new(volume.level(), volume.is_muted());

        Self {
            config,
            state,
            queue: Queue::new(),
            volume,
            factory,
            scheduler,
            backend: None,
            poll_task: None,
            next_adapter_id: 1,
            next_poll_id: 1,
            selection: 0,
            rearm: false,
            pending_events: Vec::new(),
        }
    }

    // ===== Track Selection =====

    /// Replace the current track and start playing it
    ///
    /// If the track is also in the queue, the cursor moves to it so that
    /// next/previous continue from there.
    pub fn set_track(&mut self, track: Track) -> Result<()> {
        check_track(&track)?;

        self.selection += 1;

        if let Some(index) = self.queue.position_of(&track.id) {
            // Keep the queue slot in step with the richer selected copy
            self.queue.replace_at(index, track.clone());
            if self.queue.cursor() != Some(index) && self.queue.select(index) {
                self.emit_queue_changed();
            }
        }

        self.load(track, true);
        Ok(())
    }

    /// Current selection generation, without starting a new selection
    pub fn selection_ticket(&self) -> SelectionTicket {
        SelectionTicket(self.selection)
    }

    /// Start a selection that completes asynchronously
    ///
    /// Supersedes every ticket issued before it, so only the latest pending
    /// selection can still be applied with [`Self::set_track_for`].
    pub fn begin_selection(&mut self) -> SelectionTicket {
        self.selection += 1;
        debug!(generation = self.selection, "Selection started");
        SelectionTicket(self.selection)
    }

    /// Select `track` only if nothing else was selected since `ticket`
    ///
    /// Returns `Ok(false)` when the ticket is stale.
    pub fn set_track_for(&mut self, ticket: SelectionTicket, track: Track) -> Result<bool> {
        if ticket.0 != self.selection {
            debug!(
                ticket = ticket.0,
                current = self.selection,
                track_id = %track.id,
                "Discarding stale selection"
            );
            return Ok(false);
        }

        self.set_track(track)?;
        Ok(true)
    }

    // ===== Queue Management =====

    /// Replace the queue and load its head paused
    ///
    /// Any invalid track rejects the whole call. An empty queue clears the
    /// current track.
    pub fn set_queue(&mut self, tracks: Vec<Track>) -> Result<()> {
        for track in &tracks {
            check_track(track)?;
        }

        self.selection += 1;
        self.queue.replace(tracks);
        self.emit_queue_changed();

        match self.queue.current().cloned() {
            Some(head) => self.load(head, false),
            None => self.clear_current(),
        }

        Ok(())
    }

    /// Append a track to the queue
    ///
    /// With nothing selected this behaves like `set_queue([track])`. When the
    /// queue is empty but a track is selected, that track becomes the head so
    /// the new entry plays after it.
    pub fn enqueue(&mut self, track: Track) -> Result<()> {
        check_track(&track)?;

        if self.queue.is_empty() {
            match self.state.current_track.clone() {
                None => return self.set_queue(vec![track]),
                Some(current) if current.id != track.id => self.queue.append(current),
                Some(_) => {}
            }
        }

        self.queue.append(track);
        self.emit_queue_changed();
        Ok(())
    }

    /// Advance to the next queued track
    ///
    /// No-op at the end of the queue.
    pub fn next(&mut self) {
        let Some(track) = self.queue.advance().cloned() else {
            debug!("Next requested at end of queue");
            return;
        };

        self.selection += 1;
        self.emit_queue_changed();
        self.load(track, true);
    }

    /// Go back to the previous queued track
    ///
    /// No-op at the head of the queue.
    pub fn previous(&mut self) {
        let Some(track) = self.queue.retreat().cloned() else {
            debug!("Previous requested at head of queue");
            return;
        };

        self.selection += 1;
        self.emit_queue_changed();
        self.load(track, true);
    }

    // ===== Playback Control =====

    /// Start or resume playback
    ///
    /// Without a live adapter this only restarts a track retained after the
    /// queue ran out or after `stop()`.
    pub fn play(&mut self) {
        let Some(backend) = self.backend.as_mut() else {
            if self.rearm {
                if let Some(track) = self.state.current_track.clone() {
                    info!(track_id = %track.id, "Restarting retained track");
                    self.load(track, true);
                }
            }
            return;
        };

        match backend.play() {
            Ok(()) => self.set_playing(true),
            Err(e) => self.fail_backend(e.to_string()),
        }
    }

    /// Pause playback
    pub fn pause(&mut self) {
        let Some(backend) = self.backend.as_mut() else {
            return;
        };

        match backend.pause() {
            Ok(()) => self.set_playing(false),
            Err(e) => self.fail_backend(e.to_string()),
        }
    }

    /// Stop playback, keeping the current track on display
    pub fn stop(&mut self) {
        self.teardown_backend();

        self.state.is_playing = false;
        self.state.status = EngineStatus::Idle;
        self.state.current_time = 0.0;
        self.state.refresh_progress();
        self.rearm = self.state.current_track.is_some();

        self.emit_state_changed();
        self.emit_position_changed();
    }

    /// Seek to a fraction of the track
    ///
    /// `fraction` is clamped to [0, 1]. No-op when the duration is unknown or
    /// no adapter is live.
    pub fn seek(&mut self, fraction: f64) {
        if fraction.is_nan() || self.state.duration <= 0.0 {
            return;
        }
        let Some(backend) = self.backend.as_mut() else {
            return;
        };

        let fraction = fraction.clamp(0.0, 1.0);
        let seconds = fraction * self.state.duration;

        let result = backend.seek(seconds);

        self.state.current_time = seconds;
        self.state.progress = fraction;
        self.emit_position_changed();

        if let Err(e) = result {
            self.fail_backend(e.to_string());
        }
    }

    // ===== Volume Control =====

    /// Set volume level, clamped to [0, 1] (NaN is ignored)
    pub fn set_volume(&mut self, level: f32) {
        if !self.volume.set_level(level) {
            debug!("Ignoring NaN volume");
            return;
        }
        self.apply_volume();
    }

    /// Toggle mute
    pub fn toggle_mute(&mut self) {
        self.volume.toggle_mute();
        self.apply_volume();
    }

    /// Set mute state
    pub fn set_muted(&mut self, muted: bool) {
        if muted {
            self.volume.mute();
        } else {
            self.volume.unmute();
        }
        self.apply_volume();
    }

    // ===== Host Callbacks =====

    /// Handle a callback from an audio element
    pub fn handle_audio_event(&mut self, adapter: AdapterId, event: AudioElementEvent) {
        let Some(backend) = self.live_backend(adapter) else {
            debug!(adapter = %adapter, ?event, "Ignoring audio event from stale adapter");
            return;
        };

        match backend.handle_audio(event) {
            Some(signal) => self.apply_signal(signal),
            None => warn!(adapter = %adapter, "Audio event for a video adapter"),
        }
    }

    /// Handle a callback from an embedded video player
    pub fn handle_video_event(&mut self, adapter: AdapterId, event: VideoPlayerEvent) {
        let Some(backend) = self.live_backend(adapter) else {
            debug!(adapter = %adapter, ?event, "Ignoring video event from stale adapter");
            return;
        };

        match backend.handle_video(event) {
            Some(signal) => self.apply_signal(signal),
            None => warn!(adapter = %adapter, "Video event for an audio adapter"),
        }
    }

    /// Read position and duration from the live adapter
    pub fn on_poll_tick(&mut self, task: PollTaskId) {
        if self.poll_task != Some(task) {
            debug!(task = %task, "Ignoring stale poll tick");
            return;
        }
        let Some(backend) = self.backend.as_ref() else {
            return;
        };

        let position = backend.position();
        let duration = backend.duration();

        if position.is_finite() && position >= 0.0 {
            self.state.current_time = position;
        }
        if duration.is_finite() && duration > 0.0 {
            self.state.duration = duration;
        }
        self.state.refresh_progress();
        self.emit_position_changed();
    }

    /// Apply a UI intent
    pub fn dispatch(&mut self, intent: UiIntent) {
        debug!(?intent, "Dispatching intent");

        match intent {
            UiIntent::Play => self.play(),
            UiIntent::Pause => self.pause(),
            UiIntent::TogglePlayback => {
                if self.state.is_playing {
                    self.pause();
                } else {
                    self.play();
                }
            }
            UiIntent::Next => self.next(),
            UiIntent::Previous => self.previous(),
            UiIntent::Seek(fraction) => self.seek(f64::from(fraction)),
            UiIntent::SetVolume(level) => self.set_volume(level),
            UiIntent::ToggleMute => self.toggle_mute(),
            UiIntent::Stop => self.stop(),
        }
    }

    // ===== State Queries =====

    /// Current playback state
    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    /// The play queue
    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    /// Backend lifecycle
    pub fn status(&self) -> EngineStatus {
        self.state.status
    }

    /// Track currently selected
    pub fn current_track(&self) -> Option<&Track> {
        self.state.current_track.as_ref()
    }

    /// Whether playback is running
    pub fn is_playing(&self) -> bool {
        self.state.is_playing
    }

    /// Kind of the live adapter, if any
    pub fn active_backend(&self) -> Option<BackendKind> {
        self.backend.as_ref().map(LiveBackend::kind)
    }

    /// Id of the live adapter, if any
    pub fn active_adapter(&self) -> Option<AdapterId> {
        self.backend.as_ref().map(LiveBackend::id)
    }

    /// Id of the running poll task, if any
    pub fn poll_task(&self) -> Option<PollTaskId> {
        self.poll_task
    }

    /// Engine configuration
    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    /// View model for the player bar
    pub fn now_playing(&self) -> Option<NowPlayingView> {
        NowPlayingView::from_state(&self.state, &self.queue)
    }

    // ===== Events =====

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<PlayerEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Check if there are pending events
    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    // ===== Internal =====

    /// Tear down the old adapter and build one for `track`
    fn load(&mut self, track: Track, autoplay: bool) {
        self.teardown_backend();

        let previous_track_id = self
            .state
            .current_track
            .as_ref()
            .map(|t| t.id.to_string());
        let kind = track.backend_kind();

        self.state.reset_position();
        self.state.is_playing = autoplay;
        self.rearm = false;

        self.pending_events.push(PlayerEvent::TrackChanged {
            track_id: track.id.to_string(),
            previous_track_id,
            backend: kind,
        });

        let adapter = AdapterId::from(self.next_adapter_id);
        self.next_adapter_id += 1;

        let options = AdapterOptions {
            autoplay,
            volume: self.volume.clone(),
        };
        let opened = LiveBackend::open(self.factory.as_mut(), adapter, &track.source, &options);

        info!(
            track_id = %track.id,
            backend = %kind,
            adapter = %adapter,
            autoplay,
            "Loading track"
        );
        self.state.current_track = Some(track);

        match opened {
            Ok(backend) => {
                self.backend = Some(backend);
                self.state.status = EngineStatus::Active(kind);
                self.emit_state_changed();
                self.emit_position_changed();
                self.sync_polling();
            }
            Err(e) => {
                self.emit_position_changed();
                self.fail_backend(e.to_string());
            }
        }
    }

    fn clear_current(&mut self) {
        self.teardown_backend();

        self.state.current_track = None;
        self.state.reset_position();
        self.state.is_playing = false;
        self.state.status = EngineStatus::Idle;
        self.rearm = false;

        self.emit_state_changed();
        self.emit_position_changed();
    }

    fn teardown_backend(&mut self) {
        self.cancel_polling();

        if let Some(mut backend) = self.backend.take() {
            backend.teardown();
        }
    }

    fn fail_backend(&mut self, message: String) {
        warn!(error = %message, "Backend failed, playback unavailable until next selection");

        self.teardown_backend();
        self.state.is_playing = false;
        self.state.status = EngineStatus::Unavailable;
        self.rearm = false;

        self.pending_events.push(PlayerEvent::Error { message });
        self.emit_state_changed();
    }

    fn live_backend(&mut self, adapter: AdapterId) -> Option<&mut LiveBackend> {
        self.backend.as_mut().filter(|b| b.id() == adapter)
    }

    fn apply_signal(&mut self, signal: AdapterSignal) {
        match signal {
            AdapterSignal::None => {}
            AdapterSignal::Ready { duration } => {
                if let Some(duration) = duration.filter(|d| d.is_finite() && *d > 0.0) {
                    self.state.duration = duration;
                    self.state.refresh_progress();
                    self.emit_position_changed();
                }
            }
            AdapterSignal::Playing => self.set_playing(true),
            AdapterSignal::Paused => self.set_playing(false),
            AdapterSignal::Ended => self.on_track_ended(),
            AdapterSignal::Failed(message) => self.fail_backend(message),
        }
    }

    fn set_playing(&mut self, playing: bool) {
        if self.state.is_playing != playing {
            self.state.is_playing = playing;
            self.emit_state_changed();
        }
        self.sync_polling();
    }

    fn on_track_ended(&mut self) {
        if let Some(track) = &self.state.current_track {
            self.pending_events.push(PlayerEvent::TrackFinished {
                track_id: track.id.to_string(),
            });
        }

        if let Some(next) = self.queue.advance().cloned() {
            self.selection += 1;
            self.emit_queue_changed();
            self.load(next, true);
            return;
        }

        info!("Queue exhausted");
        self.teardown_backend();
        self.state.is_playing = false;
        self.state.status = EngineStatus::Idle;
        self.rearm = true;

        self.pending_events.push(PlayerEvent::QueueExhausted);
        self.emit_state_changed();
    }

    fn apply_volume(&mut self) {
        self.state.volume = self.volume.level();
        self.state.muted = self.volume.is_muted();

        if let Some(backend) = self.backend.as_mut() {
            backend.set_volume(&self.volume);
        }

        self.pending_events.push(PlayerEvent::VolumeChanged {
            volume: self.state.volume,
            muted: self.state.muted,
        });
    }

    /// Keep exactly one poll task alive while playing with a live adapter
    fn sync_polling(&mut self) {
        let wanted = self.state.is_playing && self.backend.is_some();

        match (wanted, self.poll_task) {
            (true, None) => {
                let task = PollTaskId::from(self.next_poll_id);
                self.next_poll_id += 1;
                self.scheduler.start(task, self.config.poll_interval());
                self.poll_task = Some(task);
                debug!(task = %task, "Poll task started");
            }
            (false, Some(_)) => self.cancel_polling(),
            _ => {}
        }
    }

    fn cancel_polling(&mut self) {
        if let Some(task) = self.poll_task.take() {
            self.scheduler.cancel(task);
            debug!(task = %task, "Poll task cancelled");
        }
    }

    fn emit_state_changed(&mut self) {
        self.pending_events.push(PlayerEvent::StateChanged {
            is_playing: self.state.is_playing,
            status: self.state.status,
        });
    }

    fn emit_position_changed(&mut self) {
        self.pending_events.push(PlayerEvent::PositionChanged {
            current_time: self.state.current_time,
            duration: self.state.duration,
            progress: self.state.progress,
        });
    }

    fn emit_queue_changed(&mut self) {
        self.pending_events.push(PlayerEvent::QueueChanged {
            length: self.queue.len(),
            cursor: self.queue.cursor(),
        });
    }
}

impl Drop for PlaybackEngine {
    fn drop(&mut self) {
        self.teardown_backend();
    }
}

fn check_track(track: &Track) -> Result<()> {
    track.validate().map_err(|e| {
        warn!(track_id = %track.id, error = %e, "Rejecting track");
        match e {
            CoreError::InvalidTrack(message) => PlaybackError::InvalidTrack(message),
            other => PlaybackError::InvalidTrack(other.to_string()),
        }
    })
}
