//! Core types for playback

use crate::scheduler::TimerId;
use encore_core::TrackDescriptor;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Monotonic id of a source assignment
///
/// Incremented on every `set_source`/`clear_source`. Hardware signals carry
/// the generation they were produced for, so signals from a replaced source
/// can be recognised and dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourceGeneration(pub u64);

impl SourceGeneration {
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// Id of one `play()` request
///
/// A play resolution is only honoured if its ticket is still the one the
/// controller is waiting on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayTicket(pub u64);

/// Controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum PlayerState {
    /// No track loaded
    Idle,

    /// Source assigned, play not yet confirmed or not requested
    Loading,

    /// Output confirmed playing
    Playing,

    /// Paused, or loaded and waiting for the user
    Paused,

    /// Failed below the retry limit, delayed advance scheduled
    ErrorRetryPending { timer: TimerId },

    /// Failed for good: no playable URL or retries exhausted
    ErrorTerminal,
}

impl PlayerState {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::ErrorRetryPending { .. } | Self::ErrorTerminal)
    }
}

/// Audio availability shown under the controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SourceStatus {
    /// Current source failed
    PlaybackError,

    /// Current track has no audio URL, or nothing is loaded
    Unavailable,

    /// Current track can be played
    Available,
}

impl SourceStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::PlaybackError => "Playback error",
            Self::Unavailable => "Audio unavailable",
            Self::Available => "Audio available",
        }
    }
}

/// Read-only view of the controller for rendering
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackSnapshot {
    pub current_track: Option<TrackDescriptor>,
    pub is_playing: bool,
    pub progress_seconds: f64,
    pub duration_seconds: f64,
    pub playback_error: bool,
    pub state: PlayerState,
    pub status: SourceStatus,
}

/// Configuration for the playback controller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Delay before auto-advancing past a failed track (default: 2000)
    pub retry_delay_ms: u64,

    /// Consecutive failures before the cascade stops (default: 3)
    pub max_consecutive_errors: u8,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            retry_delay_ms: 2000,
            max_consecutive_errors: 3,
        }
    }
}

impl PlayerConfig {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = PlayerConfig::default();
        assert_eq!(config.retry_delay(), Duration::from_secs(2));
        assert_eq!(config.max_consecutive_errors, 3);
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let config: PlayerConfig = serde_json::from_str(r#"{ "retry_delay_ms": 500 }"#).unwrap();
        assert_eq!(config.retry_delay_ms, 500);
        assert_eq!(config.max_consecutive_errors, 3);
    }

    #[test]
    fn generations_increase() {
        let first = SourceGeneration::default();
        assert!(first.next() > first);
        assert_eq!(first.next().next(), SourceGeneration(2));
    }

    #[test]
    fn error_states() {
        assert!(PlayerState::ErrorTerminal.is_error());
        assert!(PlayerState::ErrorRetryPending { timer: TimerId(1) }.is_error());
        assert!(!PlayerState::Paused.is_error());
    }
}
