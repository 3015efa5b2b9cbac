//! Ordered play queue with a cursor
//!
//! The cursor is `None` exactly when the queue is empty and otherwise always
//! points at a valid entry. Navigation clamps at both ends.

use tunedeck_core::{Track, TrackId};

/// Play queue
///
/// ```text
/// [ A ][ B ][ C ][ D ]
///        ^
///      cursor
/// ```
#[derive(Debug, Clone, Default)]
pub struct Queue {
    tracks: Vec<Track>,
    cursor: Option<usize>,
}

impl Queue {
    /// Create new empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all tracks, resetting the cursor to the head
    pub fn replace(&mut self, tracks: Vec<Track>) {
        self.cursor = if tracks.is_empty() { None } else { Some(0) };
        self.tracks = tracks;
    }

    /// Append a track to the end
    ///
    /// The cursor moves to the new entry if the queue was empty.
    pub fn append(&mut self, track: Track) {
        self.tracks.push(track);
        if self.cursor.is_none() {
            self.cursor = Some(0);
        }
    }

    /// Remove all tracks
    pub fn clear(&mut self) {
        self.tracks.clear();
        self.cursor = None;
    }

    /// Number of tracks
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Check if queue is empty
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Cursor position
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Track under the cursor
    pub fn current(&self) -> Option<&Track> {
        self.cursor.and_then(|i| self.tracks.get(i))
    }

    /// Get track by index
    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    /// All tracks in order
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Check if there is an entry after the cursor
    pub fn has_next(&self) -> bool {
        matches!(self.cursor, Some(i) if i + 1 < self.tracks.len())
    }

    /// Check if there is an entry before the cursor
    pub fn has_previous(&self) -> bool {
        matches!(self.cursor, Some(i) if i > 0)
    }

    /// Move the cursor forward
    ///
    /// Returns the new current track, or `None` (cursor unchanged) at the end.
    pub fn advance(&mut self) -> Option<&Track> {
        if !self.has_next() {
            return None;
        }
        self.cursor = self.cursor.map(|i| i + 1);
        self.current()
    }

    /// Move the cursor back
    ///
    /// Returns the new current track, or `None` (cursor unchanged) at the head.
    pub fn retreat(&mut self) -> Option<&Track> {
        if !self.has_previous() {
            return None;
        }
        self.cursor = self.cursor.map(|i| i - 1);
        self.current()
    }

    /// Index of the first track with this id
    pub fn position_of(&self, id: &TrackId) -> Option<usize> {
        self.tracks.iter().position(|t| &t.id == id)
    }

    /// Overwrite the entry at `index`, leaving the cursor where it is
    ///
    /// Returns `false` if the index is out of bounds.
    pub fn replace_at(&mut self, index: usize, track: Track) -> bool {
        match self.tracks.get_mut(index) {
            Some(slot) => {
                *slot = track;
                true
            }
            None => false,
        }
    }

    /// Move the cursor to `index`
    ///
    /// Returns `false` (cursor unchanged) if the index is out of bounds.
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.tracks.len() {
            return false;
        }
        self.cursor = Some(index);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(id: &str) -> Track {
        Track::direct_audio(id, format!("Track {id}"), "Artist", format!("https://cdn.test/{id}.mp3"))
    }

    fn queue_of(ids: &[&str]) -> Queue {
        let mut queue = Queue::new();
        queue.replace(ids.iter().map(|id| track(id)).collect());
        queue
    }

    #[test]
    fn new_queue_is_empty() {
        let queue = Queue::new();
        assert!(queue.is_empty());
        assert_eq!(queue.cursor(), None);
        assert!(queue.current().is_none());
        assert!(!queue.has_next());
        assert!(!queue.has_previous());
    }

    #[test]
    fn replace_resets_cursor() {
        let mut queue = queue_of(&["1", "2", "3"]);
        queue.advance();
        assert_eq!(queue.cursor(), Some(1));

        queue.replace(vec![track("9")]);
        assert_eq!(queue.cursor(), Some(0));
        assert_eq!(queue.current().unwrap().id.as_str(), "9");

        queue.replace(Vec::new());
        assert_eq!(queue.cursor(), None);
    }

    #[test]
    fn advance_clamps_at_end() {
        let mut queue = queue_of(&["1", "2"]);

        assert_eq!(queue.advance().unwrap().id.as_str(), "2");
        assert!(queue.advance().is_none());
        assert_eq!(queue.cursor(), Some(1));
    }

    #[test]
    fn retreat_clamps_at_head() {
        let mut queue = queue_of(&["1", "2"]);

        assert!(queue.retreat().is_none());
        assert_eq!(queue.cursor(), Some(0));

        queue.advance();
        assert_eq!(queue.retreat().unwrap().id.as_str(), "1");
    }

    #[test]
    fn append_to_empty_sets_cursor() {
        let mut queue = Queue::new();
        queue.append(track("1"));
        assert_eq!(queue.cursor(), Some(0));

        queue.append(track("2"));
        assert_eq!(queue.cursor(), Some(0));
        assert!(queue.has_next());
    }

    #[test]
    fn select_and_position_of() {
        let mut queue = queue_of(&["1", "2", "3"]);

        let index = queue.position_of(&TrackId::from("3")).unwrap();
        assert!(queue.select(index));
        assert_eq!(queue.cursor(), Some(2));

        assert!(!queue.select(3));
        assert_eq!(queue.cursor(), Some(2));
        assert!(queue.position_of(&TrackId::from("missing")).is_none());
    }

    #[test]
    fn replace_at_keeps_cursor() {
        let mut queue = queue_of(&["1", "2"]);

        assert!(queue.replace_at(1, track("2").with_duration(213.0)));
        assert_eq!(queue.cursor(), Some(0));
        assert!((queue.get(1).unwrap().duration - 213.0).abs() < f64::EPSILON);

        assert!(!queue.replace_at(2, track("3")));
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn clear_empties_queue() {
        let mut queue = queue_of(&["1", "2"]);
        queue.clear();
        assert!(queue.is_empty());
        assert_eq!(queue.cursor(), None);
    }
}
