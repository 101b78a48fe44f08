use super::*;
use crate::config::{ImportSettings, UiSettings};
use crate::library::Track;
use crate::playlist::Playlist;
use crate::store::{LazyStore, TrackStore};
use tempfile::tempdir;

fn t(name: &str) -> Track {
    Track::new(name, "audio/mpeg", b"x".to_vec())
}

fn app(names: &[&str]) -> App {
    App::new(
        Playlist::new(names.iter().map(|n| t(n)).collect()),
        LazyStore::from_store(TrackStore::open_in_memory().unwrap()),
        &UiSettings::default(),
    )
}

#[test]
fn display_indices_respects_filter_query() {
    let mut app = app(&["Alpha.mp3", "Beta.mp3", "Gamma.mp3"]);
    app.push_filter_char('m');
    assert_eq!(app.display_indices(), vec![2]);
    assert_eq!(app.selected, 2);

    app.pop_filter_char();
    assert_eq!(app.display_indices(), vec![0, 1, 2]);
}

#[test]
fn filter_is_substring_not_fuzzy() {
    let mut app = app(&["Metallica - Blackened.mp3", "Black Sabbath - Paranoid.mp3"]);
    app.filter_query = "mtbk".into();
    assert!(app.display_indices().is_empty());

    app.filter_query = "black".into();
    assert_eq!(app.display_indices(), vec![0, 1]);
}

#[test]
fn whitespace_only_query_shows_everything() {
    let mut app = app(&["Alpha.mp3"]);
    app.filter_query = "   ".into();
    assert_eq!(app.display_indices(), vec![0]);
    assert_eq!(app.rows().len(), 1);
}

#[test]
fn next_prev_in_view_helpers_work() {
    let mut app = app(&["Alpha.mp3", "Beta.mp3", "Gamma.mp3"]);
    app.filter_query = "et".into(); // only Beta is visible

    assert_eq!(app.next_in_view_from(0), Some(1));
    assert_eq!(app.prev_in_view_from(0), Some(1));
    assert_eq!(app.next_in_view_from(1), Some(1));
    assert_eq!(app.prev_in_view_from(1), Some(1));
}

#[test]
fn selection_wraps_and_jumps() {
    let mut app = app(&["a.mp3", "b.mp3", "c.mp3"]);
    app.prev();
    assert_eq!(app.selected, 2);
    app.next();
    assert_eq!(app.selected, 0);

    app.select_last();
    assert_eq!(app.selected, 2);
    app.select_first();
    assert_eq!(app.selected, 0);
}

#[test]
fn selection_on_empty_playlist_stays_put() {
    let mut app = app(&[]);
    app.next();
    app.prev();
    app.select_last();
    assert_eq!(app.selected, 0);
    assert!(!app.has_tracks());
}

#[test]
fn follow_skips_filtered_views() {
    let mut app = app(&["a.mp3", "b.mp3", "c.mp3"]);
    app.follow(2);
    assert_eq!(app.selected, 2);

    app.filter_query = "a".into();
    app.follow(1);
    assert_eq!(app.selected, 2);

    app.follow_playback = false;
    app.filter_query.clear();
    app.follow(0);
    assert_eq!(app.selected, 2);
}

#[test]
fn filtering_leaves_playlist_cursor_alone() {
    let mut app = app(&["a.mp3", "b.mp3"]);
    app.playlist.set_current(1);
    app.enter_search_mode();
    for c in "zzz".chars() {
        app.push_filter_char(c);
    }
    assert!(app.rows().is_empty());
    assert_eq!(app.playlist.current(), 1);
    assert_eq!(app.playlist.len(), 2);

    app.clear_filter();
    assert_eq!(app.mode, InputMode::Normal);
    assert_eq!(app.rows().len(), 2);
}

#[test]
fn notices_queue_in_order() {
    let mut app = app(&[]);
    assert!(app.notice().is_none());
    app.push_notice("first");
    app.push_notice("second");
    assert_eq!(app.notice(), Some("first"));
    app.dismiss_notice();
    assert_eq!(app.notice(), Some("second"));
    app.dismiss_notice();
    assert!(app.notice().is_none());
}

#[test]
fn import_prompt_hands_back_input() {
    let mut app = app(&[]);
    app.enter_import_mode();
    assert_eq!(app.mode, InputMode::Import);
    app.import_input.push_str("/music");
    assert_eq!(app.take_import_input(), "/music");
    assert_eq!(app.mode, InputMode::Normal);
    assert!(app.import_input.is_empty());

    app.enter_import_mode();
    app.import_input.push_str("x");
    app.cancel_import();
    assert!(app.import_input.is_empty());
}

#[test]
fn import_paths_queues_notices_and_reloads() {
    let dir = tempdir().unwrap();
    let song = dir.path().join("01 - Song.mp3");
    std::fs::write(&song, b"bytes").unwrap();

    let mut app = app(&[]);
    let report = app.import_paths(&[song.clone()], &ImportSettings::default());
    assert_eq!(report.saved, 1);
    assert_eq!(app.playlist.len(), 1);
    assert_eq!(app.notice(), Some("Successfully saved 1 songs!"));

    app.dismiss_notice();
    let report = app.import_paths(&[song], &ImportSettings::default());
    assert_eq!(report.saved, 0);
    assert_eq!(app.playlist.len(), 1);
    assert!(
        app.notice()
            .unwrap()
            .starts_with("All selected songs are already in the playlist:")
    );
}

#[test]
fn import_keeps_the_highlight_on_the_same_song() {
    let first = tempdir().unwrap();
    for name in ["b.mp3", "c.mp3"] {
        std::fs::write(first.path().join(name), b"bytes").unwrap();
    }
    let second = tempdir().unwrap();
    std::fs::write(second.path().join("a.mp3"), b"bytes").unwrap();

    let mut app = app(&[]);
    app.import_paths(&[first.path().to_path_buf()], &ImportSettings::default());
    app.select_last();
    assert_eq!(app.playlist.get(app.selected).unwrap().name, "c.mp3");

    // "a.mp3" sorts first and pushes everything down one row.
    app.import_paths(&[second.path().to_path_buf()], &ImportSettings::default());
    assert_eq!(app.playlist.len(), 3);
    assert_eq!(app.selected, 2);
    assert_eq!(app.playlist.get(app.selected).unwrap().name, "c.mp3");
}

#[test]
fn reload_keeps_the_highlight_on_the_same_song() {
    let mut app = app(&[]);
    app.store.get().unwrap().put(&t("m.mp3")).unwrap();
    app.reload_from_store().unwrap();
    assert_eq!(app.selected, 0);

    app.store.get().unwrap().put(&t("a.mp3")).unwrap();
    app.reload_from_store().unwrap();
    assert_eq!(app.selected, 1);
    assert_eq!(app.playlist.get(1).unwrap().name, "m.mp3");
}

#[test]
fn import_of_nothing_audio_says_so() {
    let dir = tempdir().unwrap();
    let txt = dir.path().join("notes.txt");
    std::fs::write(&txt, b"hi").unwrap();

    let mut app = app(&[]);
    app.import_paths(&[txt], &ImportSettings::default());
    assert_eq!(app.notice(), Some("No audio files found."));
}

#[test]
fn reload_from_store_reads_persisted_tracks() {
    let mut app = app(&[]);
    app.store.get().unwrap().put(&t("b.mp3")).unwrap();
    app.store.get().unwrap().put(&t("a.mp3")).unwrap();

    let outcome = app.reload_from_store().unwrap();
    assert_eq!(outcome.previous, None);
    let names: Vec<&str> = app.playlist.tracks().iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["a.mp3", "b.mp3"]);
}

#[test]
fn reload_from_unreachable_store_is_silent() {
    let mut app = App::new(Playlist::default(), LazyStore::new(None), &UiSettings::default());
    assert!(app.reload_from_store().is_none());
    assert!(app.notice().is_none());
}
