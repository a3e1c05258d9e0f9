//! Encore CLI Library
//!
//! Playlist inspection and a deterministic, headless simulation of the
//! browser player. Exposed as a library for the integration tests.

pub mod config;
pub mod error;
pub mod report;
pub mod sim;

pub use config::{CliConfig, SimulationSettings};
pub use error::{CliError, Result};
pub use sim::{Simulation, SimulationReport};

use encore_core::{PlaylistFile, TrackList, TrackSource};
use std::path::Path;

/// Read and validate a playlist file
pub async fn read_playlist(path: &Path) -> Result<TrackList> {
    Ok(PlaylistFile::new(path).fetch_tracks().await?)
}
