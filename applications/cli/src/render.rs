//! Plain-text rendering for terminal output.

use std::io::{self, Write};
use tracing::warn;
use tunedeck_catalog::{CatalogError, VideoDetails};
use tunedeck_core::{BackendKind, Genre, Track};
use tunedeck_playback::{format_time, EngineStatus, NowPlayingView, PlayerEvent};

fn backend_label(kind: BackendKind) -> &'static str {
    match kind {
        BackendKind::DirectAudio => "audio",
        BackendKind::EmbeddedVideo => "video",
    }
}

/// One numbered result row
pub fn track_line(number: usize, track: &Track) -> String {
    let length = if track.duration > 0.0 {
        format!(" {}", format_time(track.duration))
    } else {
        String::new()
    };

    format!(
        "{number:>3}. {} - {} [{}]{length}",
        track.title,
        track.artist,
        backend_label(track.backend_kind())
    )
}

/// Numbered list of tracks, or a placeholder when empty
pub fn write_tracks(out: &mut impl Write, tracks: &[Track]) -> io::Result<()> {
    if tracks.is_empty() {
        return writeln!(out, "No results.");
    }
    for (i, track) in tracks.iter().enumerate() {
        writeln!(out, "{}", track_line(i + 1, track))?;
    }
    Ok(())
}

/// A fetch failure shown the way an empty result is, after one warning line
pub fn write_fetch_failure(out: &mut impl Write, error: &CatalogError) -> io::Result<()> {
    warn!(error = %error, "Fetch failed");
    writeln!(out, "! {error}")?;
    write_tracks(out, &[])
}

/// Fetched tracks, or the failure rendered as no results
pub fn write_fetched(
    out: &mut impl Write,
    fetched: tunedeck_catalog::Result<Vec<Track>>,
) -> io::Result<()> {
    match fetched {
        Ok(tracks) => write_tracks(out, &tracks),
        Err(e) => write_fetch_failure(out, &e),
    }
}

pub fn write_genres(out: &mut impl Write, genres: &[Genre]) -> io::Result<()> {
    for genre in genres {
        writeln!(out, "{:<12} {}", genre.id, genre.name)?;
    }
    Ok(())
}

pub fn write_video_details(out: &mut impl Write, details: &VideoDetails) -> io::Result<()> {
    let track = &details.track;
    writeln!(out, "{}", track.title)?;
    writeln!(out, "  channel:   {}", track.artist)?;
    writeln!(out, "  length:    {}", format_time(track.duration))?;
    if let Some(views) = details.views {
        writeln!(out, "  views:     {views}")?;
    }
    if let Some(likes) = details.likes {
        writeln!(out, "  likes:     {likes}")?;
    }
    if let Some(published) = details.published_at {
        writeln!(out, "  published: {}", published.format("%Y-%m-%d"))?;
    }
    if let Some(video_id) = track.video_id() {
        writeln!(out, "  watch:     {}", video_id.watch_url())?;
    }
    Ok(())
}

/// The player bar as one line
pub fn now_playing_line(view: &NowPlayingView) -> String {
    let state = if view.unavailable {
        "unavailable"
    } else if view.show_pause {
        "playing"
    } else {
        "paused"
    };

    let volume = if view.show_muted {
        "muted".to_string()
    } else {
        format!("vol {:.0}%", view.volume * 100.0)
    };

    format!(
        "[{state}] {} - {}  {} / {} ({:.0}%)  {volume}",
        view.title,
        view.artist,
        view.elapsed,
        view.total,
        view.progress * 100.0
    )
}

/// Human text for an engine event; position updates are too chatty to print
pub fn describe_event(event: &PlayerEvent, current: Option<&Track>) -> Option<String> {
    match event {
        PlayerEvent::TrackChanged {
            track_id, backend, ..
        } => {
            let name = current
                .filter(|t| t.id.as_str() == track_id)
                .map_or_else(|| track_id.clone(), |t| format!("{} - {}", t.title, t.artist));
            Some(format!("> now playing: {name} ({})", backend_label(*backend)))
        }
        PlayerEvent::StateChanged { is_playing, status } => Some(match status {
            EngineStatus::Unavailable => "> playback unavailable".to_string(),
            _ if *is_playing => "> playing".to_string(),
            _ => "> paused".to_string(),
        }),
        PlayerEvent::VolumeChanged { volume, muted } => Some(if *muted {
            "> muted".to_string()
        } else {
            format!("> volume {:.0}%", volume * 100.0)
        }),
        PlayerEvent::QueueChanged { length, cursor } => Some(match cursor {
            Some(i) => format!("> queue: {} of {length}", i + 1),
            None => format!("> queue: {length} tracks"),
        }),
        PlayerEvent::TrackFinished { track_id } => Some(format!("> finished {track_id}")),
        PlayerEvent::QueueExhausted => Some("> end of queue".to_string()),
        PlayerEvent::Error { message } => Some(format!("! {message}")),
        PlayerEvent::PositionChanged { .. } => None,
    }
}
