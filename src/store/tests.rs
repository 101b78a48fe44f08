use super::*;
use crate::library::Track;
use tempfile::tempdir;

fn track(name: &str, bytes: &[u8]) -> Track {
    Track::new(name, "audio/mpeg", bytes.to_vec())
}

#[test]
fn open_creates_schema_on_first_use() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("tracks.db");

    let store = TrackStore::open(&path).unwrap();
    assert!(path.exists());
    assert_eq!(store.schema_version().unwrap(), SCHEMA_VERSION);
    assert_eq!(store.len().unwrap(), 0);
}

#[test]
fn put_overwrites_on_name_collision() {
    let store = TrackStore::open_in_memory().unwrap();
    store.put(&track("a.mp3", b"first")).unwrap();
    store
        .put(&Track::new("a.mp3", "audio/ogg", b"second".to_vec()))
        .unwrap();

    let all = store.get_all().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(&all[0].content[..], b"second");
    assert_eq!(all[0].content_type, "audio/ogg");
}

#[test]
fn get_all_returns_tracks_ordered_by_name() {
    let mut store = TrackStore::open_in_memory().unwrap();
    let saved = store
        .put_all(&[
            track("c.mp3", b"c"),
            track("a.mp3", b"a"),
            track("b.mp3", b"b"),
        ])
        .unwrap();
    assert_eq!(saved, 3);

    let names: Vec<String> = store.get_all().unwrap().into_iter().map(|t| t.name).collect();
    assert_eq!(names, vec!["a.mp3", "b.mp3", "c.mp3"]);
    assert_eq!(store.len().unwrap(), 3);
}

#[test]
fn tracks_survive_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tracks.db");

    {
        let store = TrackStore::open(&path).unwrap();
        store.put(&track("01 - Song.mp3", b"bytes")).unwrap();
    }

    let store = TrackStore::open(&path).unwrap();
    let all = store.get_all().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].name, "01 - Song.mp3");
    assert_eq!(all[0].display, "Song");
    assert_eq!(&all[0].content[..], b"bytes");
}

#[test]
fn newer_schema_is_refused() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tracks.db");
    {
        let conn = rusqlite::Connection::open(&path).unwrap();
        conn.pragma_update(None, "user_version", SCHEMA_VERSION + 1)
            .unwrap();
    }

    match TrackStore::open(&path) {
        Err(StoreError::UnsupportedSchema { found, supported }) => {
            assert_eq!(found, SCHEMA_VERSION + 1);
            assert_eq!(supported, SCHEMA_VERSION);
        }
        other => panic!("expected UnsupportedSchema, got {:?}", other.err()),
    }
}

#[test]
fn lazy_store_without_location_reports_error() {
    let mut lazy = LazyStore::new(None);
    assert!(matches!(lazy.get(), Err(StoreError::NoLocation)));
    assert!(!lazy.is_open());
}

#[test]
fn lazy_store_retries_after_failed_open() {
    let dir = tempdir().unwrap();
    // A regular file where the parent directory should be makes the first open fail.
    let blocker = dir.path().join("data");
    std::fs::write(&blocker, b"not a directory").unwrap();
    let path = blocker.join("tracks.db");

    let mut lazy = LazyStore::new(Some(path.clone()));
    assert!(lazy.get().is_err());
    assert!(!lazy.is_open());

    std::fs::remove_file(&blocker).unwrap();
    assert!(lazy.get().is_ok());
    assert!(lazy.is_open());
    assert_eq!(lazy.path(), Some(&path));
}
