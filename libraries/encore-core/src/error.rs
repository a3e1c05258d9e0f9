//! Catalog error types for Encore

use crate::types::TrackId;
use thiserror::Error;

/// Result type alias using `CatalogError`
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Errors raised while fetching or assembling a track list
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Two descriptors in one snapshot share an id
    #[error("Duplicate track id in list: {0}")]
    DuplicateTrack(TrackId),

    /// Catalog or database could not be reached
    #[error("Network error: {0}")]
    Network(String),

    /// Catalog returned something unusable
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl CatalogError {
    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
