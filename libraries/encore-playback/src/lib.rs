//! Encore Playback
//!
//! Client-side playback control for the Encore single-artist player.
//!
//! This crate provides:
//! - `AudioEngine`: owner of the one native audio output handle
//! - `PlaybackController`: selection, play/pause, circular next/previous and
//!   the error policy (delayed auto-advance, capped consecutive failures)
//! - Progress presentation helpers (`format_time`, `map_click_to_seek_time`)
//! - Notices for the toast channel
//!
//! # Architecture
//!
//! The controller is a synchronous state machine. It never sleeps and never
//! spawns tasks. Platform code supplies three seams:
//! - `AudioOutput`: the native handle (browser `<audio>`, simulator, test double)
//! - `Scheduler`: one-shot timers for the delayed auto-advance
//! - `Notifier`: fire-and-forget user-visible notices
//!
//! Hardware callbacks come back through `PlaybackController::handle_signal`,
//! timer firings through `PlaybackController::handle_timer`.
//!
//! # Example
//!
//! ```rust
//! use encore_core::{TrackDescriptor, TrackList};
//! use encore_playback::{
//!     AudioOutput, LogNotifier, PlayTicket, PlaybackController, PlayerConfig, PlayerState,
//!     Scheduler, SourceGeneration, TimerId,
//! };
//! use std::time::Duration;
//!
//! #[derive(Default)]
//! struct Silent;
//!
//! impl AudioOutput for Silent {
//!     fn load(&mut self, _url: &str, _generation: SourceGeneration) {}
//!     fn start(&mut self, _generation: SourceGeneration, _ticket: PlayTicket) {}
//!     fn halt(&mut self) {}
//!     fn set_position(&mut self, _seconds: f64) {}
//!     fn release(&mut self) {}
//! }
//!
//! #[derive(Default)]
//! struct NoTimers(u64);
//!
//! impl Scheduler for NoTimers {
//!     fn schedule(&mut self, _delay: Duration) -> TimerId {
//!         self.0 += 1;
//!         TimerId(self.0)
//!     }
//!     fn cancel(&mut self, _id: TimerId) {}
//! }
//!
//! let mut player = PlaybackController::new(Silent, NoTimers::default(), LogNotifier, PlayerConfig::default());
//! player.set_tracks(
//!     TrackList::new(vec![
//!         TrackDescriptor::new("a", "Opening", "The Artist")
//!             .with_primary_audio_url("https://cdn.example.com/a.mp3"),
//!     ])
//!     .unwrap(),
//! );
//!
//! assert_eq!(player.state(), PlayerState::Loading);
//! player.toggle_playback();
//! assert!(player.is_playing());
//! ```

mod controller;
mod engine;
mod error;
mod notice;
pub mod progress;
mod scheduler;
pub mod types;

#[cfg(feature = "wasm")]
pub mod wasm;

// Public exports
pub use controller::PlaybackController;
pub use engine::{AudioEngine, AudioOutput, EngineEvent, OutputSignal, SignalKind};
pub use error::{EngineError, PlaybackError, Result};
pub use notice::{LogNotifier, Notice, Notifier, QueuedNotifier, RetryCause};
pub use progress::{format_time, map_click_to_seek_time};
pub use scheduler::{Scheduler, TimerId};
pub use types::{
    PlayTicket, PlaybackSnapshot, PlayerConfig, PlayerState, SourceGeneration, SourceStatus,
};
