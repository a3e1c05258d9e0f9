//! Track domain types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Track identifier
///
/// Opaque and stable across a track list (catalog track ids in practice).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(String);

impl TrackId {
    /// Create a new track ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TrackId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Link to the track on an external platform (Spotify, Apple Music, ...)
///
/// Carried through to the info panel untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalLink {
    /// Platform label as the catalog reports it
    pub platform: String,

    /// Destination URL
    pub url: String,
}

/// Metadata and candidate audio URLs for one playable item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackDescriptor {
    /// Unique within one track list
    pub id: TrackId,

    /// Track title
    pub title: String,

    /// Display artist
    pub artist_name: String,

    /// Cover image reference
    #[serde(default)]
    pub artwork_url: Option<String>,

    /// Preferred audio URL (full-length upload)
    #[serde(default)]
    pub primary_audio_url: Option<String>,

    /// Fallback audio URL (catalog preview clip)
    #[serde(default)]
    pub fallback_audio_url: Option<String>,

    /// Platform links for the info panel
    #[serde(default)]
    pub external_links: Vec<ExternalLink>,
}

impl TrackDescriptor {
    /// Create a descriptor with no artwork, audio or links
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        artist_name: impl Into<String>,
    ) -> Self {
        Self {
            id: TrackId::new(id),
            title: title.into(),
            artist_name: artist_name.into(),
            artwork_url: None,
            primary_audio_url: None,
            fallback_audio_url: None,
            external_links: Vec::new(),
        }
    }

    /// Set the preferred audio URL
    #[must_use]
    pub fn with_primary_audio_url(mut self, url: impl Into<String>) -> Self {
        self.primary_audio_url = Some(url.into());
        self
    }

    /// Set the fallback audio URL
    #[must_use]
    pub fn with_fallback_audio_url(mut self, url: impl Into<String>) -> Self {
        self.fallback_audio_url = Some(url.into());
        self
    }

    /// Set the artwork reference
    #[must_use]
    pub fn with_artwork_url(mut self, url: impl Into<String>) -> Self {
        self.artwork_url = Some(url.into());
        self
    }

    /// Append an external platform link
    #[must_use]
    pub fn with_external_link(mut self, platform: impl Into<String>, url: impl Into<String>) -> Self {
        self.external_links.push(ExternalLink {
            platform: platform.into(),
            url: url.into(),
        });
        self
    }

    /// Candidate audio URLs in preference order
    pub fn audio_candidates(&self) -> impl Iterator<Item = &str> {
        [&self.primary_audio_url, &self.fallback_audio_url]
            .into_iter()
            .filter_map(|url| url.as_deref())
    }

    /// The URL the player should load
    ///
    /// First candidate that is present and not blank, `None` when the track
    /// cannot be played at all.
    pub fn playable_url(&self) -> Option<&str> {
        self.audio_candidates()
            .map(str::trim)
            .find(|url| !url.is_empty())
    }

    /// Whether any candidate URL is usable
    pub fn is_playable(&self) -> bool {
        self.playable_url().is_some()
    }
}
