/// Tunedeck - browse, collect and play music from the terminal
use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tunedeck_catalog::{CatalogClient, VideoClient};
use tunedeck_core::{genre_by_id, Track, VideoId, GENRES};
use tunedeck_library::{CreateOutcome, Library, SaveOutcome};
use tunedeck_cli::{
    config::AppConfig,
    render,
    session::{self, Session},
};

#[derive(Parser)]
#[command(name = "tunedeck")]
#[command(about = "Search, collect and play music from a catalog and a video platform", long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ./tunedeck.toml when present)
    #[arg(short, long, global = true, env = "TUNEDECK_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the audio catalog
    Search {
        /// Search terms
        #[arg(required = true)]
        query: Vec<String>,
    },
    /// Featured catalog tracks
    Featured,
    /// List browsable genres
    Genres,
    /// Popular tracks in a genre
    Genre {
        /// Genre id (see `genres`)
        id: String,
    },
    /// Search music videos
    Videos {
        /// Search terms
        #[arg(required = true)]
        query: Vec<String>,
    },
    /// Show details for one video
    Video {
        /// Video id
        id: String,
    },
    /// Manage playlists
    Playlist {
        #[command(subcommand)]
        action: PlaylistAction,
    },
    /// Show recently played tracks
    Recent,
    /// Run an interactive playback session with simulated players
    Session(SessionArgs),
}

#[derive(Subcommand)]
enum PlaylistAction {
    /// Create an empty playlist
    Create {
        /// Playlist name
        name: String,
    },
    /// Add a video to a playlist (created if missing)
    Add {
        /// Playlist name
        name: String,
        /// Video id
        video_id: String,
    },
    /// Show one playlist, or list all of them
    Show {
        /// Playlist name
        name: Option<String>,
    },
}

#[derive(Args)]
#[group(multiple = false)]
struct SessionArgs {
    /// Queue catalog search results
    #[arg(long)]
    search: Option<String>,
    /// Queue featured tracks
    #[arg(long)]
    featured: bool,
    /// Queue a genre
    #[arg(long)]
    genre: Option<String>,
    /// Queue video search results
    #[arg(long)]
    videos: Option<String>,
    /// Queue a saved playlist
    #[arg(long)]
    playlist: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;

    // Initialize tracing (stderr, so command output stays clean)
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log.filter)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let mut out = io::stdout().lock();

    match cli.command {
        Commands::Search { query } => {
            let fetched = catalog(&config)?.search(&query.join(" ")).await;
            render::write_fetched(&mut out, fetched)?;
        }
        Commands::Featured => {
            let fetched = catalog(&config)?.featured().await;
            render::write_fetched(&mut out, fetched)?;
        }
        Commands::Genres => {
            render::write_genres(&mut out, GENRES)?;
        }
        Commands::Genre { id } => {
            let fetched = genre_tracks(&config, &id).await?;
            render::write_fetched(&mut out, fetched)?;
        }
        Commands::Videos { query } => {
            let fetched = videos(&config)?.search(&query.join(" ")).await;
            render::write_fetched(&mut out, fetched)?;
        }
        Commands::Video { id } => {
            let video_id = VideoId::parse(id)?;
            match videos(&config)?.details(&video_id).await {
                Ok(Some(details)) => render::write_video_details(&mut out, &details)?,
                Ok(None) => writeln!(out, "Video {video_id} not found.")?,
                Err(e) => render::write_fetch_failure(&mut out, &e)?,
            }
        }
        Commands::Playlist { action } => {
            playlist(&config, action, &mut out).await?;
        }
        Commands::Recent => {
            let library = Library::open(&config.library)?;
            render::write_tracks(&mut out, &library.recent.list()?)?;
        }
        Commands::Session(args) => {
            drop(out);
            run_session(&config, args).await?;
        }
    }

    Ok(())
}

fn catalog(config: &AppConfig) -> anyhow::Result<CatalogClient> {
    config.require_catalog()?;
    Ok(CatalogClient::new(config.catalog.clone())?)
}

fn videos(config: &AppConfig) -> anyhow::Result<VideoClient> {
    config.require_video()?;
    Ok(VideoClient::new(config.video.clone())?)
}

/// Unknown genres and missing credentials are errors; the fetch result is
/// handed back for rendering
async fn genre_tracks(
    config: &AppConfig,
    id: &str,
) -> anyhow::Result<tunedeck_catalog::Result<Vec<Track>>> {
    let genre = genre_by_id(id)
        .with_context(|| format!("unknown genre {id:?} (see `tunedeck genres`)"))?;
    Ok(catalog(config)?.by_genre(genre.tag).await)
}

async fn playlist(
    config: &AppConfig,
    action: PlaylistAction,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let mut library = Library::open(&config.library)?;

    match action {
        PlaylistAction::Create { name } => match library.playlists.create(&name)? {
            CreateOutcome::Created => writeln!(out, "Created playlist {name}.")?,
            CreateOutcome::AlreadyExists => writeln!(out, "Playlist {name} already exists.")?,
        },
        PlaylistAction::Add { name, video_id } => {
            let video_id = VideoId::parse(video_id)?;
            let details = videos(config)?
                .details(&video_id)
                .await?
                .with_context(|| format!("video {video_id} not found"))?;

            match library.playlists.save(&details.track, &name)? {
                SaveOutcome::Added => writeln!(out, "Added to playlist.")?,
                SaveOutcome::AlreadyPresent => writeln!(out, "Video already in playlist.")?,
            }
        }
        PlaylistAction::Show { name: Some(name) } => match library.playlists.get(&name)? {
            Some(tracks) => render::write_tracks(out, &tracks)?,
            None => writeln!(out, "No playlist named {name}.")?,
        },
        PlaylistAction::Show { name: None } => {
            let all = library.playlists.all()?;
            if all.is_empty() {
                writeln!(out, "No playlists yet.")?;
            }
            for (name, tracks) in &all {
                writeln!(out, "{name} ({} tracks)", tracks.len())?;
            }
        }
    }

    Ok(())
}

async fn run_session(config: &AppConfig, args: SessionArgs) -> anyhow::Result<()> {
    let library = Library::open(&config.library)?;

    let fetched = if let Some(query) = args.search {
        Some(catalog(config)?.search(&query).await)
    } else if args.featured {
        Some(catalog(config)?.featured().await)
    } else if let Some(id) = args.genre {
        Some(genre_tracks(config, &id).await?)
    } else if let Some(query) = args.videos {
        Some(videos(config)?.search(&query).await)
    } else {
        None
    };

    let tracks = match (fetched, args.playlist) {
        (Some(Ok(tracks)), _) => tracks,
        (Some(Err(e)), _) => {
            render::write_fetch_failure(&mut io::stdout().lock(), &e)?;
            Vec::new()
        }
        (None, Some(name)) => library
            .playlists
            .get(&name)?
            .with_context(|| format!("no playlist named {name:?}"))?,
        (None, None) => session::demo_queue(),
    };

    if tracks.is_empty() {
        anyhow::bail!("nothing to play");
    }

    let mut session = Session::new(
        config.playback.clone(),
        config.session.clone(),
        io::stdout(),
    )
    .with_library(library);

    if config.require_video().is_ok() {
        session = session.with_video_client(VideoClient::new(config.video.clone())?);
    }

    session.load_queue(tracks)?;
    {
        let mut out = io::stdout().lock();
        writeln!(out, "{}", session::HELP)?;
    }

    session::spawn_stdin_reader(session.sender());
    session.run().await
}
