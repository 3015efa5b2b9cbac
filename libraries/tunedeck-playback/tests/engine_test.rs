//! Engine behaviour against a recording host

mod common;

use common::{audio_track, engine, engine_with, video_track};
use std::time::Duration;
use tunedeck_core::{BackendKind, Track};
use tunedeck_playback::{
    AdapterId, AudioElementEvent, EngineStatus, PlaybackConfig, PlaybackError, PlayerEvent,
    UiIntent, VideoPlayerEvent, VideoPlayerState,
};

fn a(id: u64) -> AdapterId {
    AdapterId::from(id)
}

mod selection {
    use super::*;

    #[test]
    fn set_track_builds_adapter_and_plays() {
        let (mut engine, host) = engine();

        engine.set_track(audio_track("1")).unwrap();

        assert!(engine.is_playing());
        assert_eq!(engine.status(), EngineStatus::Active(BackendKind::DirectAudio));
        assert_eq!(engine.current_track().unwrap().id.as_str(), "1");
        assert_eq!(
            host.calls_for(a(1)),
            vec!["create_audio(https://cdn.test/1.mp3)", "volume(1)", "play"]
        );
        assert!(host.active_poll().is_some());
        assert_eq!(host.last_interval(), Some(Duration::from_millis(500)));
    }

    #[test]
    fn invalid_track_leaves_state_unchanged() {
        let (mut engine, host) = engine();
        engine.set_track(audio_track("1")).unwrap();
        host.clear();

        let blank_url = Track::direct_audio("2", "Broken", "Nobody", "");
        let err = engine.set_track(blank_url).unwrap_err();

        assert!(matches!(err, PlaybackError::InvalidTrack(_)));
        assert_eq!(engine.current_track().unwrap().id.as_str(), "1");
        assert!(engine.is_playing());
        assert!(host.calls().is_empty());
    }

    #[test]
    fn new_track_resets_position() {
        let (mut engine, host) = engine();
        engine.set_track(audio_track("1")).unwrap();

        host.set_clock(30.0, 120.0);
        let task = host.active_poll().unwrap();
        engine.on_poll_tick(task);
        assert_eq!(engine.state().current_time, 30.0);

        engine.set_track(audio_track("2")).unwrap();

        let state = engine.state();
        assert_eq!(state.current_time, 0.0);
        assert_eq!(state.duration, 0.0);
        assert_eq!(state.progress, 0.0);
    }

    #[test]
    fn audio_to_video_tears_down_audio_once() {
        let (mut engine, host) = engine();
        engine.set_track(audio_track("1")).unwrap();

        engine.set_track(video_track("dQw4w9WgXcQ")).unwrap();
        engine.set_volume(0.4);
        engine.pause();
        engine.handle_video_event(a(2), VideoPlayerEvent::Ready);

        let audio_calls = host.calls_for(a(1));
        assert_eq!(audio_calls.iter().filter(|c| *c == "stop").count(), 1);
        assert_eq!(audio_calls.iter().filter(|c| *c == "unload").count(), 1);
        assert_eq!(audio_calls.last().map(String::as_str), Some("unload"));

        assert_eq!(engine.active_backend(), Some(BackendKind::EmbeddedVideo));
    }

    #[test]
    fn selecting_queued_track_moves_cursor() {
        let (mut engine, _host) = engine();
        engine
            .set_queue(vec![audio_track("1"), audio_track("2"), audio_track("3")])
            .unwrap();

        engine.set_track(audio_track("3")).unwrap();
        assert_eq!(engine.queue().cursor(), Some(2));

        engine.previous();
        assert_eq!(engine.current_track().unwrap().id.as_str(), "2");
    }

    #[test]
    fn factory_failure_marks_backend_unavailable() {
        let (mut engine, host) = engine();
        host.fail_create(true);

        engine.set_track(audio_track("1")).unwrap();

        assert_eq!(engine.status(), EngineStatus::Unavailable);
        assert!(!engine.is_playing());
        assert_eq!(engine.current_track().unwrap().id.as_str(), "1");
        assert!(host.active_poll().is_none());
        assert!(engine
            .drain_events()
            .iter()
            .any(|e| matches!(e, PlayerEvent::Error { .. })));

        // No retry until the next selection
        host.fail_create(false);
        host.clear();
        engine.play();
        assert!(host.calls().is_empty());

        engine.set_track(audio_track("2")).unwrap();
        assert_eq!(engine.status(), EngineStatus::Active(BackendKind::DirectAudio));
    }

    #[test]
    fn autoplay_rejection_marks_backend_unavailable() {
        let (mut engine, host) = engine();
        host.fail_play(true);

        engine.set_track(audio_track("1")).unwrap();

        assert_eq!(engine.status(), EngineStatus::Unavailable);
        // Element released on the failed start
        assert_eq!(
            host.calls_for(a(1)),
            vec![
                "create_audio(https://cdn.test/1.mp3)",
                "volume(1)",
                "play",
                "stop",
                "unload"
            ]
        );
    }

    #[test]
    fn stale_selection_ticket_is_rejected() {
        let (mut engine, _host) = engine();

        let ticket = engine.selection_ticket();
        engine.set_track(audio_track("1")).unwrap();

        let applied = engine
            .set_track_for(ticket, video_track("dQw4w9WgXcQ"))
            .unwrap();
        assert!(!applied);
        assert_eq!(engine.current_track().unwrap().id.as_str(), "1");

        let ticket = engine.selection_ticket();
        let applied = engine
            .set_track_for(ticket, video_track("dQw4w9WgXcQ"))
            .unwrap();
        assert!(applied);
        assert_eq!(engine.active_backend(), Some(BackendKind::EmbeddedVideo));
    }

    #[test]
    fn latest_pending_selection_wins() {
        let (mut engine, _host) = engine();
        engine.set_track(audio_track("1")).unwrap();

        let first = engine.begin_selection();
        let second = engine.begin_selection();
        assert_ne!(first, second);

        // Lookups complete in the order they were issued
        assert!(!engine
            .set_track_for(first, video_track("AAAAAAAAAAA"))
            .unwrap());
        assert!(engine
            .set_track_for(second, video_track("BBBBBBBBBBB"))
            .unwrap());
        assert_eq!(engine.current_track().unwrap().id.as_str(), "BBBBBBBBBBB");
    }

    #[test]
    fn begin_selection_supersedes_peeked_ticket() {
        let (mut engine, _host) = engine();

        let peeked = engine.selection_ticket();
        let started = engine.begin_selection();

        assert!(!engine
            .set_track_for(peeked, video_track("dQw4w9WgXcQ"))
            .unwrap());
        assert!(engine
            .set_track_for(started, video_track("dQw4w9WgXcQ"))
            .unwrap());
    }

    #[test]
    fn resolved_selection_replaces_queue_entry() {
        let (mut engine, _host) = engine();
        engine
            .set_queue(vec![audio_track("1"), video_track("dQw4w9WgXcQ")])
            .unwrap();

        let ticket = engine.begin_selection();
        let resolved = video_track("dQw4w9WgXcQ").with_duration(213.0);
        assert!(engine.set_track_for(ticket, resolved).unwrap());

        assert_eq!(engine.queue().cursor(), Some(1));
        assert_eq!(engine.queue().current(), engine.current_track());
        assert!((engine.queue().current().unwrap().duration - 213.0).abs() < f64::EPSILON);
        assert_eq!(engine.queue().len(), 2);
    }
}

mod queue {
    use super::*;

    #[test]
    fn set_queue_loads_head_paused() {
        let (mut engine, host) = engine();

        engine
            .set_queue(vec![audio_track("1"), audio_track("2")])
            .unwrap();

        assert_eq!(engine.queue().cursor(), Some(0));
        assert_eq!(engine.current_track().unwrap().id.as_str(), "1");
        assert!(!engine.is_playing());
        assert_eq!(engine.status(), EngineStatus::Active(BackendKind::DirectAudio));
        assert!(!host.calls_for(a(1)).contains(&"play".to_string()));
        assert!(host.active_poll().is_none());

        engine.play();
        assert!(engine.is_playing());
        assert!(host.active_poll().is_some());
    }

    #[test]
    fn empty_queue_clears_current_track() {
        let (mut engine, host) = engine();
        engine.set_track(audio_track("1")).unwrap();

        engine.set_queue(Vec::new()).unwrap();

        assert_eq!(engine.queue().cursor(), None);
        assert!(engine.current_track().is_none());
        assert_eq!(engine.status(), EngineStatus::Idle);
        assert!(!engine.is_playing());
        assert!(host.calls_for(a(1)).contains(&"unload".to_string()));
    }

    #[test]
    fn invalid_entry_rejects_whole_queue() {
        let (mut engine, _host) = engine();
        engine.set_queue(vec![audio_track("1")]).unwrap();

        let result = engine.set_queue(vec![audio_track("2"), Track::direct_audio("", "x", "y", "z")]);

        assert!(result.is_err());
        assert_eq!(engine.queue().len(), 1);
        assert_eq!(engine.current_track().unwrap().id.as_str(), "1");
    }

    #[test]
    fn next_at_end_is_noop() {
        let (mut engine, host) = engine();
        engine
            .set_queue(vec![audio_track("1"), audio_track("2")])
            .unwrap();
        engine.next();
        host.clear();

        engine.next();

        assert_eq!(engine.queue().cursor(), Some(1));
        assert_eq!(engine.current_track().unwrap().id.as_str(), "2");
        assert!(host.calls().is_empty());
    }

    #[test]
    fn previous_at_head_is_noop() {
        let (mut engine, host) = engine();
        engine
            .set_queue(vec![audio_track("1"), audio_track("2")])
            .unwrap();
        host.clear();

        engine.previous();

        assert_eq!(engine.queue().cursor(), Some(0));
        assert_eq!(engine.current_track().unwrap().id.as_str(), "1");
        assert!(host.calls().is_empty());
    }

    #[test]
    fn next_switches_video_to_audio() {
        let (mut engine, host) = engine();
        engine
            .set_queue(vec![video_track("dQw4w9WgXcQ"), audio_track("2")])
            .unwrap();
        assert_eq!(engine.active_backend(), Some(BackendKind::EmbeddedVideo));

        engine.next();

        assert_eq!(engine.queue().cursor(), Some(1));
        assert_eq!(engine.current_track().unwrap().id.as_str(), "2");
        assert_eq!(engine.active_backend(), Some(BackendKind::DirectAudio));
        assert!(engine.is_playing());
        assert_eq!(host.calls_for(a(1)).last().map(String::as_str), Some("destroy"));
        assert!(host.calls_for(a(2)).contains(&"play".to_string()));
    }

    #[test]
    fn enqueue_without_selection_starts_queue() {
        let (mut engine, _host) = engine();

        engine.enqueue(audio_track("1")).unwrap();

        assert_eq!(engine.queue().len(), 1);
        assert_eq!(engine.current_track().unwrap().id.as_str(), "1");
        assert!(!engine.is_playing());
    }

    #[test]
    fn enqueue_after_single_selection_keeps_current_first() {
        let (mut engine, _host) = engine();
        engine.set_track(audio_track("1")).unwrap();

        engine.enqueue(audio_track("2")).unwrap();

        let ids: Vec<_> = engine
            .queue()
            .tracks()
            .iter()
            .map(|t| t.id.as_str().to_string())
            .collect();
        assert_eq!(ids, vec!["1", "2"]);
        assert_eq!(engine.queue().cursor(), Some(0));
        assert!(engine.queue().has_next());
    }
}

mod transport {
    use super::*;

    #[test]
    fn pause_and_play_forward_and_sync_polling() {
        let (mut engine, host) = engine();
        engine.set_track(audio_track("1")).unwrap();
        let first = host.active_poll().unwrap();

        engine.pause();
        assert!(!engine.is_playing());
        assert!(host.active_poll().is_none());

        engine.play();
        assert!(engine.is_playing());
        let second = host.active_poll().unwrap();
        assert_ne!(first, second);

        assert_eq!(
            host.calls_for(a(1)),
            vec![
                "create_audio(https://cdn.test/1.mp3)",
                "volume(1)",
                "play",
                "pause",
                "play"
            ]
        );
    }

    #[test]
    fn commands_without_backend_are_noops() {
        let (mut engine, host) = engine();

        engine.play();
        engine.pause();
        engine.seek(0.5);

        assert!(host.calls().is_empty());
        assert!(!engine.is_playing());
        assert_eq!(engine.status(), EngineStatus::Idle);
    }

    #[test]
    fn seek_direct_audio() {
        let (mut engine, host) = engine();
        engine.set_track(audio_track("1")).unwrap();
        host.set_clock(0.0, 200.0);
        engine.handle_audio_event(a(1), AudioElementEvent::Loaded);
        assert_eq!(engine.state().duration, 200.0);

        engine.seek(0.25);

        assert_eq!(engine.state().progress, 0.25);
        assert_eq!(engine.state().current_time, 50.0);
        assert!(host.calls_for(a(1)).contains(&"seek(50)".to_string()));
    }

    #[test]
    fn seek_embedded_video() {
        let (mut engine, host) = engine();
        engine.set_track(video_track("dQw4w9WgXcQ")).unwrap();
        host.set_clock(0.0, 200.0);
        engine.handle_video_event(a(1), VideoPlayerEvent::Ready);
        assert_eq!(engine.state().duration, 200.0);

        engine.seek(0.5);

        assert_eq!(engine.state().progress, 0.5);
        assert!(host.calls_for(a(1)).contains(&"seek_to(100)".to_string()));
    }

    #[test]
    fn seek_clamps_fraction() {
        let (mut engine, host) = engine();
        engine.set_track(audio_track("1")).unwrap();
        host.set_clock(0.0, 80.0);
        engine.handle_audio_event(a(1), AudioElementEvent::Loaded);

        engine.seek(1.5);
        assert_eq!(engine.state().progress, 1.0);
        assert_eq!(engine.state().current_time, 80.0);

        engine.seek(-2.0);
        assert_eq!(engine.state().progress, 0.0);
    }

    #[test]
    fn seek_with_unknown_duration_is_noop() {
        let (mut engine, host) = engine();
        engine.set_track(audio_track("1")).unwrap();
        host.clear();

        engine.seek(0.5);

        assert_eq!(engine.state().progress, 0.0);
        assert!(host.calls().is_empty());
    }

    #[test]
    fn stop_keeps_track_and_play_restarts_it() {
        let (mut engine, host) = engine();
        engine.set_track(audio_track("1")).unwrap();

        engine.stop();

        assert_eq!(engine.status(), EngineStatus::Idle);
        assert!(!engine.is_playing());
        assert_eq!(engine.current_track().unwrap().id.as_str(), "1");
        assert!(engine.active_backend().is_none());
        assert!(host.active_poll().is_none());

        engine.play();

        assert!(engine.is_playing());
        assert_eq!(engine.active_adapter(), Some(a(2)));
        assert!(host.calls_for(a(2)).contains(&"play".to_string()));
    }

    #[test]
    fn toggle_playback_intent() {
        let (mut engine, _host) = engine();
        engine.set_queue(vec![audio_track("1")]).unwrap();

        engine.dispatch(UiIntent::TogglePlayback);
        assert!(engine.is_playing());

        engine.dispatch(UiIntent::TogglePlayback);
        assert!(!engine.is_playing());
    }

    #[test]
    fn intents_route_to_operations() {
        let (mut engine, _host) = engine();
        engine
            .set_queue(vec![audio_track("1"), audio_track("2")])
            .unwrap();

        engine.dispatch(UiIntent::Next);
        assert_eq!(engine.queue().cursor(), Some(1));

        engine.dispatch(UiIntent::Previous);
        assert_eq!(engine.queue().cursor(), Some(0));

        engine.dispatch(UiIntent::SetVolume(0.3));
        assert_eq!(engine.state().volume, 0.3);

        engine.dispatch(UiIntent::ToggleMute);
        assert!(engine.state().muted);

        engine.dispatch(UiIntent::Stop);
        assert_eq!(engine.status(), EngineStatus::Idle);
    }
}

mod volume {
    use super::*;

    #[test]
    fn set_volume_clamps() {
        let (mut engine, _host) = engine();

        engine.set_volume(-0.3);
        assert_eq!(engine.state().volume, 0.0);

        engine.set_volume(1.7);
        assert_eq!(engine.state().volume, 1.0);

        engine.set_volume(f32::NAN);
        assert_eq!(engine.state().volume, 1.0);
    }

    #[test]
    fn volume_forwards_to_audio_as_gain() {
        let (mut engine, host) = engine();
        engine.set_track(audio_track("1")).unwrap();

        engine.set_volume(0.5);
        engine.toggle_mute();

        let calls = host.calls_for(a(1));
        assert!(calls.contains(&"volume(0.5)".to_string()));
        assert_eq!(calls.last().map(String::as_str), Some("volume(0)"));
        assert!(engine.state().muted);
        assert_eq!(engine.state().volume, 0.5);
    }

    #[test]
    fn video_volume_is_held_until_ready() {
        let (mut engine, host) = engine();
        engine.set_track(video_track("dQw4w9WgXcQ")).unwrap();

        engine.set_volume(0.4);
        assert_eq!(host.calls_for(a(1)), vec!["create_video(dQw4w9WgXcQ)"]);

        engine.handle_video_event(a(1), VideoPlayerEvent::Ready);
        assert_eq!(
            host.calls_for(a(1)),
            vec![
                "create_video(dQw4w9WgXcQ)",
                "set_volume(40)",
                "unmute",
                "play_video"
            ]
        );
    }

    #[test]
    fn initial_volume_comes_from_config() {
        let config = PlaybackConfig {
            volume: 0.25,
            muted: true,
            ..Default::default()
        };
        let (mut engine, host) = engine_with(config);
        engine.set_track(audio_track("1")).unwrap();

        assert_eq!(engine.state().volume, 0.25);
        assert!(engine.state().muted);
        assert!(host.calls_for(a(1)).contains(&"volume(0)".to_string()));
    }
}

mod callbacks {
    use super::*;

    #[test]
    fn ended_advances_queue() {
        let (mut engine, _host) = engine();
        engine
            .set_queue(vec![audio_track("1"), video_track("dQw4w9WgXcQ")])
            .unwrap();
        engine.play();

        engine.handle_audio_event(a(1), AudioElementEvent::Ended);

        assert_eq!(engine.queue().cursor(), Some(1));
        assert_eq!(engine.active_backend(), Some(BackendKind::EmbeddedVideo));
        assert!(engine.is_playing());
        let events = engine.drain_events();
        assert!(events.contains(&PlayerEvent::TrackFinished {
            track_id: "1".to_string()
        }));
    }

    #[test]
    fn ended_on_last_track_exhausts_queue() {
        let (mut engine, host) = engine();
        engine.set_queue(vec![video_track("dQw4w9WgXcQ")]).unwrap();
        engine.play();
        engine.handle_video_event(a(1), VideoPlayerEvent::Ready);
        engine.drain_events();

        engine.handle_video_event(a(1), VideoPlayerEvent::StateChange(VideoPlayerState::Ended));

        assert!(!engine.is_playing());
        assert_eq!(engine.status(), EngineStatus::Idle);
        assert_eq!(engine.current_track().unwrap().id.as_str(), "dQw4w9WgXcQ");
        assert_eq!(engine.queue().cursor(), Some(0));
        assert!(host.active_poll().is_none());
        assert_eq!(host.calls_for(a(1)).last().map(String::as_str), Some("destroy"));
        assert!(engine.drain_events().contains(&PlayerEvent::QueueExhausted));

        engine.play();
        assert!(engine.is_playing());
        assert_eq!(engine.active_adapter(), Some(a(2)));
    }

    #[test]
    fn stale_adapter_events_are_ignored() {
        let (mut engine, _host) = engine();
        engine
            .set_queue(vec![audio_track("1"), audio_track("2"), audio_track("3")])
            .unwrap();
        engine.next();

        // Adapter 1 was torn down by `next`
        engine.handle_audio_event(a(1), AudioElementEvent::Ended);
        engine.handle_audio_event(a(1), AudioElementEvent::LoadError("gone".into()));

        assert_eq!(engine.queue().cursor(), Some(1));
        assert_eq!(engine.status(), EngineStatus::Active(BackendKind::DirectAudio));
    }

    #[test]
    fn mismatched_event_kind_is_ignored() {
        let (mut engine, _host) = engine();
        engine.set_track(audio_track("1")).unwrap();

        engine.handle_video_event(a(1), VideoPlayerEvent::Error(100));

        assert_eq!(engine.status(), EngineStatus::Active(BackendKind::DirectAudio));
    }

    #[test]
    fn video_error_marks_unavailable() {
        let (mut engine, host) = engine();
        engine.set_track(video_track("dQw4w9WgXcQ")).unwrap();

        engine.handle_video_event(a(1), VideoPlayerEvent::Error(150));

        assert_eq!(engine.status(), EngineStatus::Unavailable);
        assert!(!engine.is_playing());
        let events = engine.drain_events();
        assert!(events.iter().any(|e| matches!(
            e,
            PlayerEvent::Error { message } if message.contains("embedded playback")
        )));

        host.clear();
        engine.play();
        assert!(host.calls().is_empty());
    }

    #[test]
    fn audio_load_error_marks_unavailable() {
        let (mut engine, host) = engine();
        engine.set_track(audio_track("1")).unwrap();

        engine.handle_audio_event(a(1), AudioElementEvent::LoadError("404".into()));

        assert_eq!(engine.status(), EngineStatus::Unavailable);
        assert!(host.active_poll().is_none());
        assert!(host.calls_for(a(1)).contains(&"unload".to_string()));
    }

    #[test]
    fn element_pause_is_mirrored() {
        let (mut engine, host) = engine();
        engine.set_track(audio_track("1")).unwrap();

        engine.handle_audio_event(a(1), AudioElementEvent::Paused);
        assert!(!engine.is_playing());
        assert!(host.active_poll().is_none());

        engine.handle_audio_event(a(1), AudioElementEvent::Played);
        assert!(engine.is_playing());
        assert!(host.active_poll().is_some());
    }

    #[test]
    fn poll_tick_updates_progress() {
        let (mut engine, host) = engine();
        engine.set_track(audio_track("1")).unwrap();
        let task = host.active_poll().unwrap();

        host.set_clock(45.0, 180.0);
        engine.on_poll_tick(task);

        let state = engine.state();
        assert_eq!(state.current_time, 45.0);
        assert_eq!(state.duration, 180.0);
        assert_eq!(state.progress, 0.25);
    }

    #[test]
    fn stale_poll_tick_is_ignored() {
        let (mut engine, host) = engine();
        engine.set_track(audio_track("1")).unwrap();
        let old = host.active_poll().unwrap();

        engine.set_track(audio_track("2")).unwrap();
        host.set_clock(90.0, 100.0);
        engine.on_poll_tick(old);

        assert_eq!(engine.state().current_time, 0.0);
        assert_ne!(host.active_poll(), Some(old));
    }

    #[test]
    fn poll_tasks_are_one_per_adapter() {
        let (mut engine, host) = engine();

        engine.set_track(audio_track("1")).unwrap();
        engine.set_track(audio_track("2")).unwrap();
        engine.set_track(video_track("dQw4w9WgXcQ")).unwrap();

        assert_eq!(host.polls_started(), 3);
        let starts = host.calls().iter().filter(|c| c.ends_with(":start")).count();
        let cancels = host.calls().iter().filter(|c| c.ends_with(":cancel")).count();
        assert_eq!(starts - cancels, 1);
    }
}

mod events {
    use super::*;

    #[test]
    fn set_track_emits_track_changed() {
        let (mut engine, _host) = engine();
        engine.set_track(audio_track("1")).unwrap();
        engine.drain_events();

        engine.set_track(video_track("dQw4w9WgXcQ")).unwrap();
        let events = engine.drain_events();

        assert!(events.contains(&PlayerEvent::TrackChanged {
            track_id: "dQw4w9WgXcQ".to_string(),
            previous_track_id: Some("1".to_string()),
            backend: BackendKind::EmbeddedVideo,
        }));
        assert!(events.contains(&PlayerEvent::StateChanged {
            is_playing: true,
            status: EngineStatus::Active(BackendKind::EmbeddedVideo),
        }));
        assert!(!engine.has_pending_events());
    }

    #[test]
    fn volume_change_emits_event() {
        let (mut engine, _host) = engine();
        engine.set_volume(0.7);

        assert_eq!(
            engine.drain_events(),
            vec![PlayerEvent::VolumeChanged {
                volume: 0.7,
                muted: false
            }]
        );
    }
}

#[test]
fn dropping_engine_releases_backend() {
    let (mut engine, host) = engine();
    engine.set_track(audio_track("1")).unwrap();

    drop(engine);

    let calls = host.calls_for(a(1));
    assert_eq!(calls.last().map(String::as_str), Some("unload"));
    assert!(host.active_poll().is_none());
}
