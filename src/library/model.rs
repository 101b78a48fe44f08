use std::fmt;
use std::sync::Arc;

use super::display::display_name;

/// One imported audio file.
///
/// `content` is shared, so cloning a track (into the playlist or onto the
/// audio thread) never copies the audio bytes.
#[derive(Clone)]
pub struct Track {
    /// File name, unique within the store.
    pub name: String,
    /// `audio/*` content type recorded at import time.
    pub content_type: String,
    pub content: Arc<[u8]>,
    /// `name` with extension and track-number prefix removed.
    pub display: String,
}

impl Track {
    pub fn new(
        name: impl Into<String>,
        content_type: impl Into<String>,
        content: impl Into<Arc<[u8]>>,
    ) -> Self {
        let name = name.into();
        let display = display_name(&name);
        Self {
            name,
            content_type: content_type.into(),
            content: content.into(),
            display,
        }
    }

    /// Whether the audio thread should even try to decode this track.
    pub fn is_playable(&self) -> bool {
        !self.content.is_empty() && self.content_type.starts_with("audio/")
    }
}

impl fmt::Debug for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Track")
            .field("name", &self.name)
            .field("content_type", &self.content_type)
            .field("bytes", &self.content.len())
            .finish()
    }
}
