//! Ordered track list snapshot
//!
//! Order defines next/previous, and navigation wraps at both ends.

use crate::error::{CatalogError, Result};
use crate::types::{TrackDescriptor, TrackId};
use serde::Serialize;
use std::collections::HashSet;

/// Insertion-ordered list of descriptors with unique ids
///
/// ```rust
/// use encore_core::{TrackDescriptor, TrackList};
///
/// let tracks = TrackList::new(vec![
///     TrackDescriptor::new("a", "Opening", "Nova"),
///     TrackDescriptor::new("b", "Closing", "Nova"),
/// ])
/// .unwrap();
///
/// assert_eq!(tracks.len(), 2);
/// assert_eq!(tracks.get(1).map(|t| t.title.as_str()), Some("Closing"));
/// let ids: Vec<&str> = tracks.iter().map(|t| t.id.as_str()).collect();
/// assert_eq!(ids, ["a", "b"]);
/// assert_eq!(tracks.next_index(Some(1)), Some(0));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TrackList {
    tracks: Vec<TrackDescriptor>,
}

impl TrackList {
    /// Build a list, rejecting duplicate ids
    pub fn new(tracks: Vec<TrackDescriptor>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(tracks.len());
        for track in &tracks {
            if !seen.insert(&track.id) {
                return Err(CatalogError::DuplicateTrack(track.id.clone()));
            }
        }
        Ok(Self { tracks })
    }

    /// List with no tracks
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of tracks
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Whether the list has no tracks
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Track at `index`
    pub fn get(&self, index: usize) -> Option<&TrackDescriptor> {
        self.tracks.get(index)
    }

    /// Track selected when a list is first loaded
    pub fn first(&self) -> Option<&TrackDescriptor> {
        self.tracks.first()
    }

    /// Tracks in list order
    pub fn iter(&self) -> std::slice::Iter<'_, TrackDescriptor> {
        self.tracks.iter()
    }

    /// Index of the track with `id`
    pub fn position(&self, id: &TrackId) -> Option<usize> {
        self.tracks.iter().position(|track| &track.id == id)
    }

    /// Track with `id`
    pub fn find(&self, id: &TrackId) -> Option<&TrackDescriptor> {
        self.tracks.iter().find(|track| &track.id == id)
    }

    /// Index after `current`, wrapping past the last track
    ///
    /// With no current index the first track is next. `None` on an empty list.
    pub fn next_index(&self, current: Option<usize>) -> Option<usize> {
        let len = self.tracks.len();
        if len == 0 {
            return None;
        }
        Some(match current {
            Some(index) => (index % len + 1) % len,
            None => 0,
        })
    }

    /// Index before `current`, wrapping past the first track
    ///
    /// With no current index the last track is previous. `None` on an empty list.
    pub fn previous_index(&self, current: Option<usize>) -> Option<usize> {
        let len = self.tracks.len();
        if len == 0 {
            return None;
        }
        Some(match current {
            Some(index) => (index % len + len - 1) % len,
            None => len - 1,
        })
    }
}

impl<'a> IntoIterator for &'a TrackList {
    type Item = &'a TrackDescriptor;
    type IntoIter = std::slice::Iter<'a, TrackDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.tracks.iter()
    }
}

impl TryFrom<Vec<TrackDescriptor>> for TrackList {
    type Error = CatalogError;

    fn try_from(tracks: Vec<TrackDescriptor>) -> Result<Self> {
        Self::new(tracks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(ids: &[&str]) -> TrackList {
        TrackList::new(
            ids.iter()
                .map(|id| TrackDescriptor::new(*id, format!("Track {id}"), "Artist"))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn rejects_duplicate_ids() {
        let result = TrackList::new(vec![
            TrackDescriptor::new("a", "A", "Artist"),
            TrackDescriptor::new("b", "B", "Artist"),
            TrackDescriptor::new("a", "A again", "Artist"),
        ]);

        match result {
            Err(CatalogError::DuplicateTrack(id)) => assert_eq!(id.as_str(), "a"),
            other => panic!("expected duplicate error, got {other:?}"),
        }
    }

    #[test]
    fn next_wraps_from_last_to_first() {
        let tracks = list(&["a", "b", "c"]);
        assert_eq!(tracks.next_index(Some(0)), Some(1));
        assert_eq!(tracks.next_index(Some(2)), Some(0));
    }

    #[test]
    fn previous_wraps_from_first_to_last() {
        let tracks = list(&["a", "b", "c"]);
        assert_eq!(tracks.previous_index(Some(0)), Some(2));
        assert_eq!(tracks.previous_index(Some(2)), Some(1));
    }

    #[test]
    fn navigation_without_current_index() {
        let tracks = list(&["a", "b", "c"]);
        assert_eq!(tracks.next_index(None), Some(0));
        assert_eq!(tracks.previous_index(None), Some(2));
    }

    #[test]
    fn empty_list_has_no_neighbours() {
        let tracks = TrackList::empty();
        assert_eq!(tracks.next_index(Some(0)), None);
        assert_eq!(tracks.previous_index(None), None);
    }

    #[test]
    fn single_track_is_its_own_neighbour() {
        let tracks = list(&["solo"]);
        assert_eq!(tracks.next_index(Some(0)), Some(0));
        assert_eq!(tracks.previous_index(Some(0)), Some(0));
    }

    #[test]
    fn position_by_id() {
        let tracks = list(&["a", "b", "c"]);
        assert_eq!(tracks.position(&TrackId::new("c")), Some(2));
        assert_eq!(tracks.position(&TrackId::new("z")), None);
    }
}
