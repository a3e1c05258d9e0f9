//! Error types for playback

use encore_core::TrackId;
use thiserror::Error;

/// Failures reported by the audio engine
///
/// These never reach the UI directly; the controller turns them into
/// `playback_error` plus a notice.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The engine has been disposed
    #[error("Audio engine disposed")]
    Disposed,

    /// `play()` was requested with no source assigned
    #[error("No audio source assigned")]
    NoSource,

    /// The source could not be fetched or decoded
    #[error("Failed to load audio: {0}")]
    Load(String),

    /// The output refused to start (autoplay policy, decode error, network)
    #[error("Playback rejected: {0}")]
    Playback(String),
}

/// Playback errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlaybackError {
    /// Selected track has no usable audio URL
    #[error("Track {0} has no playable audio")]
    NoPlayableSource(TrackId),

    /// Transient load or playback failure on a valid URL
    #[error("Load or playback failure: {0}")]
    LoadOrPlaybackFailure(#[from] EngineError),

    /// Too many consecutive failures, automatic advance stopped
    #[error("Giving up after {attempts} consecutive playback errors")]
    ExhaustedRetries { attempts: u8 },

    /// Track id not present in the active list
    #[error("Track not in list: {0}")]
    TrackNotInList(TrackId),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
