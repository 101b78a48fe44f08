use super::*;
use crate::library::Track;

fn t(name: &str) -> Track {
    Track::new(name, "audio/mpeg", b"x".to_vec())
}

fn playlist(names: &[&str]) -> Playlist {
    Playlist::new(names.iter().map(|n| t(n)).collect())
}

#[test]
fn next_and_prev_index_wrap() {
    let mut p = playlist(&["a.mp3", "b.mp3", "c.mp3"]);
    assert_eq!(p.next_index(), Some(1));
    assert_eq!(p.prev_index(), Some(2));

    p.set_current(2);
    assert_eq!(p.next_index(), Some(0));
    assert_eq!(p.prev_index(), Some(1));

    let empty = Playlist::default();
    assert_eq!(empty.next_index(), None);
    assert_eq!(empty.prev_index(), None);
}

#[test]
fn set_current_rejects_out_of_range() {
    let mut p = playlist(&["a.mp3", "b.mp3"]);
    assert!(p.set_current(1));
    assert!(!p.set_current(2));
    assert_eq!(p.current(), 1);
}

#[test]
fn reload_keeps_current_track_position() {
    let mut p = playlist(&["b.mp3", "d.mp3"]);
    p.set_current(1);

    let outcome = p.reload(vec![t("a.mp3"), t("b.mp3"), t("c.mp3"), t("d.mp3")]);
    assert_eq!(outcome.previous.as_deref(), Some("d.mp3"));
    assert!(outcome.restored);
    assert_eq!(p.current(), 3);
    assert_eq!(p.current_track().unwrap().name, "d.mp3");
}

#[test]
fn reload_resets_cursor_when_current_is_gone() {
    let mut p = playlist(&["a.mp3", "z.mp3"]);
    p.set_current(1);

    let outcome = p.reload(vec![t("a.mp3"), t("b.mp3")]);
    assert!(!outcome.restored);
    assert_eq!(p.current(), 0);
}

#[test]
fn reload_from_empty_has_no_previous() {
    let mut p = Playlist::default();
    let outcome = p.reload(vec![t("a.mp3")]);
    assert_eq!(outcome, ReloadOutcome::default());
    assert_eq!(p.len(), 1);
}

#[test]
fn reload_with_nothing_stored_keeps_playlist() {
    let mut p = playlist(&["a.mp3"]);
    p.reload(Vec::new());
    assert_eq!(p.len(), 1);
}

#[test]
fn render_rows_strips_names_and_marks_current() {
    let mut p = playlist(&["01 - Alpha.mp3", "02 - Beta.mp3"]);
    p.set_current(1);

    let rows = render_rows(&p, "");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].name, "Alpha");
    assert_eq!(rows[0].number, 1);
    assert!(!rows[0].current);
    assert_eq!(rows[1].name, "Beta");
    assert!(rows[1].current);
}

#[test]
fn render_rows_filter_keeps_original_indices() {
    let p = playlist(&["Alpha.mp3", "Beta.mp3", "Gamma.mp3"]);

    let rows = render_rows(&p, "amm");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].index, 2);
    assert_eq!(rows[0].number, 3);
    assert_eq!(rows[0].highlight, Some(1..4));
}

#[test]
fn filter_is_case_insensitive() {
    let p = playlist(&["Interstellar Theme.mp3"]);
    assert_eq!(render_rows(&p, "STELLAR").len(), 1);
    assert!(matches_filter("Interstellar Theme", "theme"));
}

#[test]
fn filter_without_matches_leaves_playlist_untouched() {
    let mut p = playlist(&["Alpha.mp3", "Beta.mp3"]);
    p.set_current(1);

    let rows = render_rows(&p, "nothing like this");
    assert!(rows.is_empty());
    assert_eq!(p.len(), 2);
    assert_eq!(p.current(), 1);
}

#[test]
fn filter_does_not_match_stripped_prefix_or_extension() {
    let p = playlist(&["03 - Song.mp3"]);
    assert!(render_rows(&p, "03").is_empty());
    assert!(render_rows(&p, "mp3").is_empty());
}
