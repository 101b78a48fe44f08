use crate::library::Track;

/// Result of replacing the playlist contents from the store.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReloadOutcome {
    /// Name of the track that was current before the reload, if any.
    pub previous: Option<String>,
    /// Whether that track was found again and the cursor moved with it.
    pub restored: bool,
}

/// Ordered tracks plus the current-track cursor.
///
/// Invariant: `current < tracks.len()` whenever the playlist is non-empty;
/// `current` is 0 and meaningless when it is empty.
#[derive(Debug, Default)]
pub struct Playlist {
    tracks: Vec<Track>,
    current: usize,
}

impl Playlist {
    pub fn new(tracks: Vec<Track>) -> Self {
        Self { tracks, current: 0 }
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.tracks.get(self.current)
    }

    /// Move the cursor. Out-of-range indices are ignored.
    pub fn set_current(&mut self, index: usize) -> bool {
        if index < self.tracks.len() {
            self.current = index;
            true
        } else {
            false
        }
    }

    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.tracks.iter().position(|t| t.name == name)
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.position_of(name).is_some()
    }

    /// `(current + 1) mod len`, or `None` when empty.
    pub fn next_index(&self) -> Option<usize> {
        if self.tracks.is_empty() {
            return None;
        }
        Some((self.current + 1) % self.tracks.len())
    }

    /// `(current - 1 + len) mod len`, or `None` when empty.
    pub fn prev_index(&self) -> Option<usize> {
        if self.tracks.is_empty() {
            return None;
        }
        let len = self.tracks.len();
        Some((self.current + len - 1) % len)
    }

    /// Replace the contents with `tracks` (as read back from the store).
    ///
    /// The cursor follows the previously current track when it is still
    /// present, otherwise it resets to 0. An empty read leaves the playlist
    /// untouched.
    pub fn reload(&mut self, tracks: Vec<Track>) -> ReloadOutcome {
        let previous = self.current_track().map(|t| t.name.clone());
        if tracks.is_empty() {
            return ReloadOutcome {
                restored: previous.is_some(),
                previous,
            };
        }

        self.tracks = tracks;
        let restored = match previous.as_deref().and_then(|n| self.position_of(n)) {
            Some(i) => {
                self.current = i;
                true
            }
            None => {
                self.current = 0;
                false
            }
        };

        ReloadOutcome { previous, restored }
    }
}
