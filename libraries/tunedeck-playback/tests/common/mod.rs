//! Shared test host: recording backends and a manual poll scheduler

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use tunedeck_core::{Track, VideoId};
use tunedeck_playback::{
    AdapterId, AudioElement, BackendFactory, PlaybackConfig, PlaybackEngine, PlaybackError,
    PollScheduler, PollTaskId, Result, VideoPlayer,
};

/// Everything the fake host saw, plus knobs for what it reports
#[derive(Debug, Default)]
pub struct HostState {
    pub calls: Vec<String>,
    pub position: f64,
    pub duration: f64,
    pub fail_create: bool,
    pub fail_play: bool,
    pub active_poll: Option<PollTaskId>,
    pub polls_started: usize,
    pub last_interval: Option<Duration>,
}

#[derive(Debug, Clone, Default)]
pub struct Host(Rc<RefCell<HostState>>);

impl Host {
    pub fn record(&self, who: impl std::fmt::Display, op: impl AsRef<str>) {
        self.0
            .borrow_mut()
            .calls
            .push(format!("{who}:{}", op.as_ref()));
    }

    pub fn calls(&self) -> Vec<String> {
        self.0.borrow().calls.clone()
    }

    /// Operations (without the prefix) received by one adapter
    pub fn calls_for(&self, adapter: AdapterId) -> Vec<String> {
        let prefix = format!("{adapter}:");
        self.0
            .borrow()
            .calls
            .iter()
            .filter_map(|c| c.strip_prefix(&prefix).map(str::to_string))
            .collect()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().calls.clear();
    }

    pub fn set_clock(&self, position: f64, duration: f64) {
        let mut state = self.0.borrow_mut();
        state.position = position;
        state.duration = duration;
    }

    pub fn fail_create(&self, fail: bool) {
        self.0.borrow_mut().fail_create = fail;
    }

    pub fn fail_play(&self, fail: bool) {
        self.0.borrow_mut().fail_play = fail;
    }

    pub fn active_poll(&self) -> Option<PollTaskId> {
        self.0.borrow().active_poll
    }

    pub fn polls_started(&self) -> usize {
        self.0.borrow().polls_started
    }

    pub fn last_interval(&self) -> Option<Duration> {
        self.0.borrow().last_interval
    }

    fn position(&self) -> f64 {
        self.0.borrow().position
    }

    fn duration(&self) -> f64 {
        self.0.borrow().duration
    }

    fn play_result(&self) -> Result<()> {
        if self.0.borrow().fail_play {
            Err(PlaybackError::backend("play rejected"))
        } else {
            Ok(())
        }
    }
}

struct MockAudio {
    id: AdapterId,
    host: Host,
}

impl AudioElement for MockAudio {
    fn play(&mut self) -> Result<()> {
        self.host.record(self.id, "play");
        self.host.play_result()
    }

    fn pause(&mut self) -> Result<()> {
        self.host.record(self.id, "pause");
        Ok(())
    }

    fn stop(&mut self) {
        self.host.record(self.id, "stop");
    }

    fn unload(&mut self) {
        self.host.record(self.id, "unload");
    }

    fn seek(&mut self, seconds: f64) -> Result<()> {
        self.host.record(self.id, format!("seek({seconds})"));
        Ok(())
    }

    fn set_volume(&mut self, gain: f32) {
        self.host.record(self.id, format!("volume({gain})"));
    }

    fn position(&self) -> f64 {
        self.host.position()
    }

    fn duration(&self) -> f64 {
        self.host.duration()
    }
}

struct MockVideo {
    id: AdapterId,
    host: Host,
}

impl VideoPlayer for MockVideo {
    fn play_video(&mut self) -> Result<()> {
        self.host.record(self.id, "play_video");
        self.host.play_result()
    }

    fn pause_video(&mut self) -> Result<()> {
        self.host.record(self.id, "pause_video");
        Ok(())
    }

    fn seek_to(&mut self, seconds: f64) -> Result<()> {
        self.host.record(self.id, format!("seek_to({seconds})"));
        Ok(())
    }

    fn set_volume(&mut self, percent: u8) {
        self.host.record(self.id, format!("set_volume({percent})"));
    }

    fn mute(&mut self) {
        self.host.record(self.id, "mute");
    }

    fn unmute(&mut self) {
        self.host.record(self.id, "unmute");
    }

    fn current_time(&self) -> f64 {
        self.host.position()
    }

    fn duration(&self) -> f64 {
        self.host.duration()
    }

    fn destroy(&mut self) {
        self.host.record(self.id, "destroy");
    }
}

pub struct MockFactory {
    host: Host,
}

impl BackendFactory for MockFactory {
    fn create_audio_element(
        &mut self,
        adapter: AdapterId,
        url: &str,
    ) -> Result<Box<dyn AudioElement>> {
        self.host.record(adapter, format!("create_audio({url})"));
        if self.host.0.borrow().fail_create {
            return Err(PlaybackError::backend("no audio output"));
        }
        Ok(Box::new(MockAudio {
            id: adapter,
            host: self.host.clone(),
        }))
    }

    fn create_video_player(
        &mut self,
        adapter: AdapterId,
        video_id: &VideoId,
    ) -> Result<Box<dyn VideoPlayer>> {
        self.host.record(adapter, format!("create_video({video_id})"));
        if self.host.0.borrow().fail_create {
            return Err(PlaybackError::backend("player script not loaded"));
        }
        Ok(Box::new(MockVideo {
            id: adapter,
            host: self.host.clone(),
        }))
    }
}

pub struct ManualScheduler {
    host: Host,
}

impl PollScheduler for ManualScheduler {
    fn start(&mut self, task: PollTaskId, interval: Duration) {
        self.host.record(task, "start");
        let mut state = self.host.0.borrow_mut();
        state.active_poll = Some(task);
        state.polls_started += 1;
        state.last_interval = Some(interval);
    }

    fn cancel(&mut self, task: PollTaskId) {
        self.host.record(task, "cancel");
        let mut state = self.host.0.borrow_mut();
        if state.active_poll == Some(task) {
            state.active_poll = None;
        }
    }
}

pub fn engine_with(config: PlaybackConfig) -> (PlaybackEngine, Host) {
    let host = Host::default();
    let engine = PlaybackEngine::new(
        config,
        Box::new(MockFactory { host: host.clone() }),
        Box::new(ManualScheduler { host: host.clone() }),
    );
    (engine, host)
}

pub fn engine() -> (PlaybackEngine, Host) {
    engine_with(PlaybackConfig::default())
}

pub fn audio_track(id: &str) -> Track {
    Track::direct_audio(
        id,
        format!("Track {id}"),
        "Catalog Artist",
        format!("https://cdn.test/{id}.mp3"),
    )
}

pub fn video_track(id: &str) -> Track {
    let video_id = VideoId::parse(id).expect("test video id must be valid");
    Track::embedded_video(video_id, format!("Video {id}"), "Some Channel")
}
