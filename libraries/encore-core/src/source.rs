//! Track sources
//!
//! The catalog client and the metadata database live outside this workspace;
//! the player only sees them through `TrackSource`.

use crate::error::{CatalogError, Result};
use crate::track_list::TrackList;
use crate::types::TrackDescriptor;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Resolves the ordered list of playable tracks
///
/// Implementations may fail on network or auth errors. Callers treat a
/// failure the same as an empty list.
#[async_trait]
pub trait TrackSource: Send + Sync {
    /// Fetch the current track list
    async fn fetch_tracks(&self) -> Result<TrackList>;
}

/// In-memory source, mostly for tests and demos
#[derive(Debug, Clone, Default)]
pub struct StaticTrackSource {
    tracks: TrackList,
}

impl StaticTrackSource {
    /// Serve `tracks` on every fetch
    pub fn new(tracks: TrackList) -> Self {
        Self { tracks }
    }
}

#[async_trait]
impl TrackSource for StaticTrackSource {
    async fn fetch_tracks(&self) -> Result<TrackList> {
        Ok(self.tracks.clone())
    }
}

/// JSON playlist on disk
///
/// The file holds an array of camelCase `TrackDescriptor` objects, the same
/// shape the site's track loader produces after merging catalog and database
/// rows.
#[derive(Debug, Clone)]
pub struct PlaylistFile {
    path: PathBuf,
}

impl PlaylistFile {
    /// Source reading `path`; nothing is opened until the first fetch
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the playlist document
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse a playlist document
    pub fn parse(contents: &str) -> Result<TrackList> {
        if contents.trim().is_empty() {
            return Err(CatalogError::invalid_input("playlist file is empty"));
        }
        let descriptors: Vec<TrackDescriptor> = serde_json::from_str(contents)?;
        TrackList::new(descriptors)
    }
}

#[async_trait]
impl TrackSource for PlaylistFile {
    async fn fetch_tracks(&self) -> Result<TrackList> {
        debug!(path = %self.path.display(), "Reading playlist file");

        let contents = tokio::fs::read_to_string(&self.path).await?;
        let tracks = Self::parse(&contents)?;

        info!(
            path = %self.path.display(),
            tracks = tracks.len(),
            playable = tracks.iter().filter(|t| t.is_playable()).count(),
            "Loaded playlist"
        );
        Ok(tracks)
    }
}
