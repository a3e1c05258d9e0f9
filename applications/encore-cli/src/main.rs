/// Encore - playlist inspector and headless playback simulator
use clap::{Parser, Subcommand};
use encore_cli::{config::CliConfig, read_playlist, report, Simulation};
use encore_core::{PlaylistFile, TrackId, TrackSource};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "encore")]
#[command(about = "Encore single-artist player tools", long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ./encore.toml when present)
    #[arg(short, long, global = true, env = "ENCORE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the tracks of a playlist file and the audio each would play
    Inspect {
        /// Playlist JSON file
        playlist: PathBuf,
    },
    /// Drive the playback controller through a simulated audio element
    Simulate {
        /// Playlist JSON file
        playlist: PathBuf,

        /// Audio URL that fails to load (repeatable)
        #[arg(long = "fail")]
        fail: Vec<String>,

        /// Track id to start from instead of the first track
        #[arg(long)]
        start: Option<String>,

        /// Length of every simulated track in seconds
        #[arg(long)]
        track_seconds: Option<f64>,

        /// Stop after this many events
        #[arg(long)]
        events: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "encore_cli=info,encore_playback=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = CliConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Inspect { playlist } => {
            config.validate()?;
            inspect(playlist).await?;
        }
        Commands::Simulate {
            playlist,
            fail,
            start,
            track_seconds,
            events,
        } => {
            if let Some(seconds) = track_seconds {
                config.simulation.track_seconds = seconds;
            }
            if let Some(events) = events {
                config.simulation.max_events = events;
            }
            config.validate()?;
            simulate(playlist, fail, start, config).await?;
        }
    }

    Ok(())
}

async fn inspect(path: PathBuf) -> encore_cli::Result<()> {
    let tracks = read_playlist(&path).await?;

    let playable = tracks.iter().filter(|t| t.is_playable()).count();
    println!("{} tracks, {} playable", tracks.len(), playable);
    for line in report::track_lines(&tracks) {
        println!("{}", line);
    }

    Ok(())
}

async fn simulate(
    path: PathBuf,
    fail: Vec<String>,
    start: Option<String>,
    config: CliConfig,
) -> encore_cli::Result<()> {
    let result = PlaylistFile::new(path).fetch_tracks().await;

    tracing::info!(
        track_seconds = config.simulation.track_seconds,
        failing = fail.len(),
        "Starting simulation"
    );

    let max_events = config.simulation.max_events;
    let mut simulation = Simulation::new(config.simulation, config.player, fail);
    simulation.load(result);
    if let Some(id) = start {
        simulation.select(&TrackId::from(id.as_str()))?;
    }

    let report = simulation.run(max_events);
    for line in report::transcript_lines(&report) {
        println!("{}", line);
    }

    simulation.shutdown();
    Ok(())
}
