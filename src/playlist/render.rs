use std::ops::Range;

use super::model::Playlist;

/// Shown instead of rows when the playlist is empty.
pub const PLACEHOLDER: [&str; 2] = ["Drop songs here", "or press i to import"];

/// One visible playlist entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistRow {
    /// Index into the unfiltered playlist; selection always uses this.
    pub index: usize,
    /// 1-based position shown next to the name.
    pub number: usize,
    pub name: String,
    pub current: bool,
    /// Byte range of the filter match inside `name`, for highlighting.
    pub highlight: Option<Range<usize>>,
}

/// Case-insensitive substring test of `filter` against a display name.
pub fn matches_filter(display: &str, filter: &str) -> bool {
    filter.is_empty() || display.to_lowercase().contains(&filter.to_lowercase())
}

fn match_range(display: &str, filter: &str) -> Option<Range<usize>> {
    if filter.is_empty() {
        return None;
    }
    let lower = display.to_lowercase();
    // Byte offsets only line up when lowercasing kept the length.
    if lower.len() != display.len() {
        return None;
    }
    let start = lower.find(&filter.to_lowercase())?;
    let end = start + filter.to_lowercase().len();
    (display.is_char_boundary(start) && display.is_char_boundary(end)).then_some(start..end)
}

/// Rows for every track whose display name contains `filter`.
///
/// Filtering never touches the playlist itself or its cursor.
pub fn render_rows(playlist: &Playlist, filter: &str) -> Vec<PlaylistRow> {
    playlist
        .tracks()
        .iter()
        .enumerate()
        .filter(|(_, t)| matches_filter(&t.display, filter))
        .map(|(index, t)| PlaylistRow {
            index,
            number: index + 1,
            name: t.display.clone(),
            current: index == playlist.current(),
            highlight: match_range(&t.display, filter),
        })
        .collect()
}
