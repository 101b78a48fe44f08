//! The session object: everything the UI shows besides audio state.
//!
//! `App` owns the playlist, the lazily opened track store, the selection
//! cursor, the search and import prompts and the queue of blocking notices.

use std::collections::VecDeque;
use std::path::PathBuf;

use tracing::{debug, warn};

use crate::config::{ImportSettings, UiSettings};
use crate::library::import::{ImportReport, collect_candidates, ingest};
use crate::playlist::{Playlist, PlaylistRow, ReloadOutcome, matches_filter, render_rows};
use crate::store::LazyStore;

/// Which prompt, if any, receives typed characters.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Search,
    Import,
}

/// The main application model.
pub struct App {
    pub playlist: Playlist,
    pub store: LazyStore,
    /// Index into the unfiltered playlist of the highlighted row.
    pub selected: usize,
    pub mode: InputMode,
    pub filter_query: String,
    pub import_input: String,
    notices: VecDeque<String>,
    /// One-line message under the progress bar (load failures and the like).
    pub status: Option<String>,
    pub show_playlist: bool,
    pub follow_playback: bool,
}

impl App {
    pub fn new(playlist: Playlist, store: LazyStore, ui: &UiSettings) -> Self {
        Self {
            playlist,
            store,
            selected: 0,
            mode: InputMode::Normal,
            filter_query: String::new(),
            import_input: String::new(),
            notices: VecDeque::new(),
            status: None,
            show_playlist: ui.show_playlist,
            follow_playback: ui.follow_playback,
        }
    }

    pub fn has_tracks(&self) -> bool {
        !self.playlist.is_empty()
    }

    /// Rows of the playlist panel under the current filter.
    pub fn rows(&self) -> Vec<PlaylistRow> {
        render_rows(&self.playlist, self.filter_query.trim())
    }

    /// Original indices of the tracks visible under the current filter.
    pub fn display_indices(&self) -> Vec<usize> {
        let query = self.filter_query.trim();
        self.playlist
            .tracks()
            .iter()
            .enumerate()
            .filter(|(_, t)| matches_filter(&t.display, query))
            .map(|(i, _)| i)
            .collect()
    }

    /// Return the next visible index after `current`, wrapping around.
    pub fn next_in_view_from(&self, current: usize) -> Option<usize> {
        let display = self.display_indices();
        if display.is_empty() {
            return None;
        }
        match display.iter().position(|&i| i == current) {
            Some(p) => Some(display[(p + 1) % display.len()]),
            None => Some(display[0]),
        }
    }

    /// Return the previous visible index before `current`, wrapping around.
    pub fn prev_in_view_from(&self, current: usize) -> Option<usize> {
        let display = self.display_indices();
        if display.is_empty() {
            return None;
        }
        match display.iter().position(|&i| i == current) {
            Some(0) | None => Some(display[display.len() - 1]),
            Some(p) => Some(display[p - 1]),
        }
    }

    pub fn next(&mut self) {
        if let Some(next) = self.next_in_view_from(self.selected) {
            self.selected = next;
        }
    }

    pub fn prev(&mut self) {
        if let Some(prev) = self.prev_in_view_from(self.selected) {
            self.selected = prev;
        }
    }

    pub fn select_first(&mut self) {
        if let Some(&first) = self.display_indices().first() {
            self.selected = first;
        }
    }

    pub fn select_last(&mut self) {
        if let Some(&last) = self.display_indices().last() {
            self.selected = last;
        }
    }

    /// Move the selection to the playing track, unless the user is browsing a filtered view.
    pub fn follow(&mut self, current: usize) {
        if self.follow_playback && self.filter_query.trim().is_empty() {
            self.selected = current;
        }
    }

    /// Keep `selected` inside the visible rows, falling back to the first one.
    fn ensure_selected_visible(&mut self) {
        let display = self.display_indices();
        match display.first() {
            None => self.selected = 0,
            Some(&first) if !display.contains(&self.selected) => self.selected = first,
            Some(_) => {}
        }
    }

    pub fn enter_search_mode(&mut self) {
        self.mode = InputMode::Search;
        self.ensure_selected_visible();
    }

    /// Leave the search prompt, keeping the filter applied.
    pub fn exit_search_mode(&mut self) {
        self.mode = InputMode::Normal;
    }

    pub fn clear_filter(&mut self) {
        self.filter_query.clear();
        self.mode = InputMode::Normal;
        self.ensure_selected_visible();
    }

    pub fn push_filter_char(&mut self, c: char) {
        self.filter_query.push(c);
        self.ensure_selected_visible();
    }

    pub fn pop_filter_char(&mut self) {
        self.filter_query.pop();
        self.ensure_selected_visible();
    }

    pub fn enter_import_mode(&mut self) {
        self.mode = InputMode::Import;
        self.import_input.clear();
    }

    pub fn cancel_import(&mut self) {
        self.mode = InputMode::Normal;
        self.import_input.clear();
    }

    /// Close the import prompt and hand back what was typed.
    pub fn take_import_input(&mut self) -> String {
        self.mode = InputMode::Normal;
        std::mem::take(&mut self.import_input)
    }

    pub fn toggle_playlist(&mut self) {
        self.show_playlist = !self.show_playlist;
    }

    pub fn push_notice(&mut self, text: impl Into<String>) {
        self.notices.push_back(text.into());
    }

    /// The notice currently blocking input, if any.
    pub fn notice(&self) -> Option<&str> {
        self.notices.front().map(String::as_str)
    }

    pub fn dismiss_notice(&mut self) {
        self.notices.pop_front();
    }

    pub fn set_status(&mut self, text: impl Into<String>) {
        self.status = Some(text.into());
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    /// Import `paths` into the store and reload the playlist from it.
    ///
    /// Every notice the import produced is queued for display.
    pub fn import_paths(&mut self, paths: &[PathBuf], settings: &ImportSettings) -> ImportReport {
        let candidates = collect_candidates(paths, settings);
        if candidates.is_empty() {
            debug!(paths = paths.len(), "nothing importable");
            self.push_notice("No audio files found.");
            return ImportReport::default();
        }

        let selected = self.selected_name();
        let report = ingest(candidates, &mut self.playlist, &mut self.store);
        for notice in &report.notices {
            self.push_notice(notice.clone());
        }
        self.reselect(selected.as_deref());
        report
    }

    /// Reload the playlist from the store without telling the user about failures.
    pub fn reload_from_store(&mut self) -> Option<ReloadOutcome> {
        let tracks = match self.store.get().and_then(|s| s.get_all()) {
            Ok(tracks) => tracks,
            Err(e) => {
                warn!(error = %e, "could not load songs from the track store");
                return None;
            }
        };
        let selected = self.selected_name();
        let outcome = self.playlist.reload(tracks);
        self.reselect(selected.as_deref());
        Some(outcome)
    }

    fn selected_name(&self) -> Option<String> {
        self.playlist.get(self.selected).map(|t| t.name.clone())
    }

    /// Point the selection back at `name` after the playlist was rebuilt.
    fn reselect(&mut self, name: Option<&str>) {
        if let Some(i) = name.and_then(|n| self.playlist.position_of(n)) {
            self.selected = i;
        }
        self.ensure_selected_visible();
    }
}
