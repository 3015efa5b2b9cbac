//! Headless playback session
//!
//! One task owns the engine and drains a single channel. Typed commands,
//! simulated element callbacks, poll ticks and resolved video details all
//! arrive as [`SessionInput`]s and are applied strictly in order, so the
//! engine only ever sees one writer.

use std::io::Write;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};
use tunedeck_catalog::VideoClient;
use tunedeck_core::{Track, VideoId};
use tunedeck_library::{Library, SaveOutcome};
use tunedeck_playback::{
    AdapterId, AudioElementEvent, PlaybackConfig, PlaybackEngine, PollTaskId, SelectionTicket,
    UiIntent, VideoPlayerEvent,
};

use crate::driver::IntervalScheduler;
use crate::render;
use crate::simulated::{SimulatedConfig, SimulatedFactory};

/// Everything the session loop reacts to
#[derive(Debug)]
pub enum SessionInput {
    /// A line typed by the user
    Command(Command),
    /// A line that did not parse
    Invalid(String),
    /// Audio element callback
    Audio(AdapterId, AudioElementEvent),
    /// Video player callback
    Video(AdapterId, VideoPlayerEvent),
    /// Poll timer fired
    Tick(PollTaskId),
    /// Video details came back for a pending selection
    Resolved {
        ticket: SelectionTicket,
        track: Box<Track>,
    },
}

/// Session commands
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Transport control
    Intent(UiIntent),
    /// Select the n-th queue entry (1-based)
    Pick(usize),
    /// Save the current track to a playlist
    Save(String),
    Status,
    Queue,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    #[error("unknown command {0:?} (try `help`)")]
    Unknown(String),

    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),

    #[error("not a number: {0:?}")]
    InvalidNumber(String),
}

pub const HELP: &str = "\
commands:
  play | pause | toggle      start, pause, or flip playback
  next | prev                move through the queue
  stop                       stop and release the player
  seek <0-1 | n%>            jump to a position
  vol <0-1 | n%>             set the volume
  mute                       toggle mute
  pick <n>                   play queue entry n
  save <playlist>            save the current track
  status | queue | help | quit";

/// Parse one input line; blank lines are `Ok(None)`
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let mut parts = line.split_whitespace();
    let Some(word) = parts.next() else {
        return Ok(None);
    };
    let rest: Vec<&str> = parts.collect();
    let arg = rest.join(" ");

    let command = match word.to_ascii_lowercase().as_str() {
        "play" => Command::Intent(UiIntent::Play),
        "pause" => Command::Intent(UiIntent::Pause),
        "toggle" | "p" => Command::Intent(UiIntent::TogglePlayback),
        "next" | "n" => Command::Intent(UiIntent::Next),
        "prev" | "previous" => Command::Intent(UiIntent::Previous),
        "stop" => Command::Intent(UiIntent::Stop),
        "mute" => Command::Intent(UiIntent::ToggleMute),
        "seek" => Command::Intent(UiIntent::Seek(parse_fraction(&arg, "seek")?)),
        "vol" | "volume" => Command::Intent(UiIntent::SetVolume(parse_fraction(&arg, "vol")?)),
        "pick" => {
            if arg.is_empty() {
                return Err(CommandError::MissingArgument("pick"));
            }
            let n = arg
                .parse::<usize>()
                .map_err(|_| CommandError::InvalidNumber(arg.clone()))?;
            Command::Pick(n)
        }
        "save" => {
            if arg.is_empty() {
                return Err(CommandError::MissingArgument("save"));
            }
            Command::Save(arg)
        }
        "status" | "s" => Command::Status,
        "queue" | "q" => Command::Queue,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };

    Ok(Some(command))
}

/// `0.25` or `25%`
fn parse_fraction(arg: &str, command: &'static str) -> Result<f32, CommandError> {
    if arg.is_empty() {
        return Err(CommandError::MissingArgument(command));
    }

    let (number, scale) = match arg.strip_suffix('%') {
        Some(percent) => (percent.trim(), 100.0),
        None => (arg, 1.0),
    };

    number
        .parse::<f32>()
        .ok()
        .filter(|v| v.is_finite())
        .map(|v| v / scale)
        .ok_or_else(|| CommandError::InvalidNumber(arg.to_string()))
}

/// Sample queue for trying the session without API credentials
pub fn demo_queue() -> Vec<Track> {
    let mut tracks = vec![
        Track::direct_audio(
            "demo-1",
            "Morning Light",
            "Demo Ensemble",
            "https://cdn.example.com/demo/morning-light.mp3",
        ),
        Track::direct_audio(
            "demo-2",
            "Tidal",
            "Demo Ensemble",
            "https://cdn.example.com/demo/tidal.mp3",
        ),
    ];

    if let Ok(video_id) = VideoId::parse("jfKfPfyJRdk") {
        tracks.push(Track::embedded_video(video_id, "Beats to relax to", "Demo Channel"));
    }

    tracks
}

/// Engine plus the channel that feeds it
pub struct Session<W> {
    engine: PlaybackEngine,
    inbox: UnboundedReceiver<SessionInput>,
    tx: UnboundedSender<SessionInput>,
    library: Option<Library>,
    videos: Option<VideoClient>,
    out: W,
}

impl<W: Write> Session<W> {
    pub fn new(playback: PlaybackConfig, simulated: SimulatedConfig, out: W) -> Self {
        let (tx, inbox) = mpsc::unbounded_channel();
        let factory = SimulatedFactory::new(simulated, tx.clone());
        let scheduler = IntervalScheduler::new(tx.clone());

        Self {
            engine: PlaybackEngine::new(playback, Box::new(factory), Box::new(scheduler)),
            inbox,
            tx,
            library: None,
            videos: None,
            out,
        }
    }

    /// Record selections and allow `save`
    #[must_use]
    pub fn with_library(mut self, library: Library) -> Self {
        self.library = Some(library);
        self
    }

    /// Resolve full details before playing a video pick
    #[must_use]
    pub fn with_video_client(mut self, videos: VideoClient) -> Self {
        self.videos = Some(videos);
        self
    }

    /// Handle for feeding input from other tasks
    pub fn sender(&self) -> UnboundedSender<SessionInput> {
        self.tx.clone()
    }

    pub fn engine(&self) -> &PlaybackEngine {
        &self.engine
    }

    pub fn library(&self) -> Option<&Library> {
        self.library.as_ref()
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    /// Replace the queue (the head is loaded paused)
    pub fn load_queue(&mut self, tracks: Vec<Track>) -> anyhow::Result<()> {
        self.engine.set_queue(tracks)?;
        self.flush()?;
        Ok(())
    }

    /// Process input until a `quit` command arrives
    ///
    /// The session's own backends and lookups hold senders, so the channel
    /// never closes on its own; end of stdin is turned into `quit`.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        self.flush()?;

        while let Some(input) = self.inbox.recv().await {
            let keep_going = self.handle(input)?;
            self.flush()?;
            if !keep_going {
                break;
            }
        }

        info!("Session ended");
        Ok(())
    }

    fn handle(&mut self, input: SessionInput) -> anyhow::Result<bool> {
        match input {
            SessionInput::Command(command) => return self.handle_command(command),
            SessionInput::Invalid(message) => writeln!(self.out, "{message}")?,
            SessionInput::Audio(adapter, event) => self.engine.handle_audio_event(adapter, event),
            SessionInput::Video(adapter, event) => self.engine.handle_video_event(adapter, event),
            SessionInput::Tick(task) => self.engine.on_poll_tick(task),
            SessionInput::Resolved { ticket, track } => {
                match self.engine.set_track_for(ticket, *track) {
                    Ok(true) => self.remember_current(),
                    Ok(false) => debug!(
                        generation = ticket.generation(),
                        "Dropped details for a superseded selection"
                    ),
                    Err(e) => writeln!(self.out, "! {e}")?,
                }
            }
        }
        Ok(true)
    }

    fn handle_command(&mut self, command: Command) -> anyhow::Result<bool> {
        match command {
            Command::Intent(intent) => self.engine.dispatch(intent),
            Command::Pick(n) => {
                let track = n
                    .checked_sub(1)
                    .and_then(|i| self.engine.queue().get(i))
                    .cloned();
                match track {
                    Some(track) => self.select(track)?,
                    None => writeln!(
                        self.out,
                        "no queue entry {n} (queue has {})",
                        self.engine.queue().len()
                    )?,
                }
            }
            Command::Save(name) => self.save_current(&name)?,
            Command::Status => match self.engine.now_playing() {
                Some(view) => writeln!(self.out, "{}", render::now_playing_line(&view))?,
                None => writeln!(self.out, "nothing selected")?,
            },
            Command::Queue => {
                let cursor = self.engine.queue().cursor();
                for (i, track) in self.engine.queue().tracks().iter().enumerate() {
                    let marker = if Some(i) == cursor { '*' } else { ' ' };
                    writeln!(self.out, "{marker}{}", render::track_line(i + 1, track))?;
                }
            }
            Command::Help => writeln!(self.out, "{HELP}")?,
            Command::Quit => return Ok(false),
        }
        Ok(true)
    }

    /// Play a picked track; videos are resolved to full details first
    fn select(&mut self, track: Track) -> anyhow::Result<()> {
        let lookup = match (&self.videos, track.video_id()) {
            (Some(videos), Some(video_id)) => Some((videos.clone(), video_id.clone())),
            _ => None,
        };

        let Some((videos, video_id)) = lookup else {
            match self.engine.set_track(track) {
                Ok(()) => self.remember_current(),
                Err(e) => writeln!(self.out, "! {e}")?,
            }
            return Ok(());
        };

        let ticket = self.engine.begin_selection();
        let tx = self.tx.clone();
        writeln!(self.out, "> loading {}", track.title)?;

        tokio::spawn(async move {
            let resolved = match videos.details(&video_id).await {
                Ok(Some(details)) => details.track,
                Ok(None) => {
                    warn!(video_id = %video_id, "Video details not found, playing as listed");
                    track
                }
                Err(e) => {
                    warn!(video_id = %video_id, error = %e, "Video details failed, playing as listed");
                    track
                }
            };
            let _ = tx.send(SessionInput::Resolved {
                ticket,
                track: Box::new(resolved),
            });
        });

        Ok(())
    }

    fn remember_current(&mut self) {
        let (Some(library), Some(track)) = (self.library.as_mut(), self.engine.current_track())
        else {
            return;
        };
        if let Err(e) = library.recent.record(track) {
            warn!(error = %e, "Could not update recently played");
        }
    }

    fn save_current(&mut self, name: &str) -> anyhow::Result<()> {
        let Some(track) = self.engine.current_track().cloned() else {
            writeln!(self.out, "nothing selected")?;
            return Ok(());
        };
        let Some(library) = self.library.as_mut() else {
            writeln!(self.out, "no library configured")?;
            return Ok(());
        };

        match library.playlists.save(&track, name) {
            Ok(SaveOutcome::Added) => writeln!(self.out, "added to {name}")?,
            Ok(SaveOutcome::AlreadyPresent) => writeln!(self.out, "already in {name}")?,
            Err(e) => writeln!(self.out, "! {e}")?,
        }
        Ok(())
    }

    fn flush(&mut self) -> anyhow::Result<()> {
        for event in self.engine.drain_events() {
            if let Some(line) = render::describe_event(&event, self.engine.current_track()) {
                writeln!(self.out, "{line}")?;
            }
        }
        self.out.flush()?;
        Ok(())
    }
}

/// Forward stdin lines into the session; end of input quits
pub fn spawn_stdin_reader(tx: UnboundedSender<SessionInput>) {
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            let input = match lines.next_line().await {
                Ok(Some(line)) => match parse_command(&line) {
                    Ok(Some(command)) => SessionInput::Command(command),
                    Ok(None) => continue,
                    Err(e) => SessionInput::Invalid(e.to_string()),
                },
                Ok(None) => SessionInput::Command(Command::Quit),
                Err(e) => {
                    warn!(error = %e, "Failed to read stdin");
                    SessionInput::Command(Command::Quit)
                }
            };

            let quit = matches!(input, SessionInput::Command(Command::Quit));
            if tx.send(input).is_err() || quit {
                break;
            }
        }
    });
}
