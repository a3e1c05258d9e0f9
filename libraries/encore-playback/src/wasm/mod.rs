//! WASM bindings for encore-playback
//!
//! Drives the playback controller from a browser: an `<audio>` element as
//! the output, `setTimeout` as the scheduler, and JS callbacks for notices
//! and state changes.

#[cfg(feature = "wasm")]
mod dispatch;

#[cfg(feature = "wasm")]
pub mod output;

#[cfg(feature = "wasm")]
pub mod player;

#[cfg(feature = "wasm")]
pub use output::{BrowserScheduler, HtmlAudioOutput};

#[cfg(feature = "wasm")]
pub use player::WasmPlayer;
