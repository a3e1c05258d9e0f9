//! Encore Core
//!
//! Platform-agnostic track types and catalog interfaces for the Encore player.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `TrackDescriptor`, `TrackId`, `ExternalLink`
//! - **Track Lists**: `TrackList`, an ordered snapshot with circular navigation
//! - **Catalog Trait**: `TrackSource`, the seam to the streaming catalog / database
//! - **Error Handling**: `CatalogError` and `Result`
//!
//! # Example
//!
//! ```rust
//! use encore_core::{TrackDescriptor, TrackList};
//!
//! let tracks = TrackList::new(vec![
//!     TrackDescriptor::new("a", "Opening", "The Artist")
//!         .with_primary_audio_url("https://cdn.example.com/a.mp3"),
//!     TrackDescriptor::new("b", "Closing", "The Artist"),
//! ])
//! .unwrap();
//!
//! assert_eq!(tracks.next_index(Some(1)), Some(0));
//! assert!(tracks.get(1).unwrap().playable_url().is_none());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod source;
pub mod track_list;
pub mod types;

// Re-export commonly used types
pub use error::{CatalogError, Result};
pub use source::{PlaylistFile, StaticTrackSource, TrackSource};
pub use track_list::TrackList;
pub use types::{ExternalLink, TrackDescriptor, TrackId};
