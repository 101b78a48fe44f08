use super::*;
use std::sync::mpsc;

fn handle() -> (MprisHandle, Arc<Mutex<SharedState>>) {
    let state = Arc::new(Mutex::new(SharedState::default()));
    (
        MprisHandle {
            state: state.clone(),
        },
        state,
    )
}

#[test]
fn set_track_metadata_sets_and_clears_shared_state() {
    let (handle, state) = handle();

    handle.set_track_metadata(
        Some(7),
        Some("Interstellar Theme"),
        Some(Duration::from_micros(1_234_567)),
    );
    {
        let s = state.lock().unwrap();
        assert_eq!(s.title.as_deref(), Some("Interstellar Theme"));
        assert_eq!(s.length_micros, Some(1_234_567));
        assert_eq!(
            s.track_id.as_ref().map(|p| p.as_str()),
            Some("/org/mpris/MediaPlayer2/track/7")
        );
    }

    handle.set_track_metadata(None, None, None);
    {
        let s = state.lock().unwrap();
        assert_eq!(s.title, None);
        assert_eq!(s.length_micros, None);
        assert!(s.track_id.is_none());
    }
}

#[test]
fn playback_status_maps_state_to_mpris_strings() {
    let (handle, state) = handle();
    let (tx, _rx) = mpsc::channel::<ControlCmd>();
    let iface = PlayerIface {
        remote: Remote(tx),
        state,
    };

    assert_eq!(iface.playback_status(), "Stopped");
    handle.set_playback(PlaybackState::Playing);
    assert_eq!(iface.playback_status(), "Playing");
    handle.set_playback(PlaybackState::Paused);
    assert_eq!(iface.playback_status(), "Paused");
}

#[test]
fn metadata_includes_expected_keys_when_present() {
    let (handle, state) = handle();
    let (tx, _rx) = mpsc::channel::<ControlCmd>();
    let iface = PlayerIface {
        remote: Remote(tx),
        state,
    };

    handle.set_artist("Spidey Player");
    handle.set_track_metadata(Some(1), Some("Title"), Some(Duration::from_secs(42)));

    let map = iface.metadata();
    for k in ["mpris:trackid", "xesam:title", "xesam:artist", "mpris:length"] {
        assert!(map.contains_key(k), "missing key: {k}");
    }
}

#[test]
fn metadata_without_track_has_no_id_or_artist() {
    let (handle, state) = handle();
    let (tx, _rx) = mpsc::channel::<ControlCmd>();
    let iface = PlayerIface {
        remote: Remote(tx),
        state,
    };
    handle.set_artist("Spidey Player");

    let map = iface.metadata();
    assert!(!map.contains_key("mpris:trackid"));
    assert!(!map.contains_key("xesam:artist"));
    assert!(!map.contains_key("mpris:length"));
}

#[test]
fn player_methods_forward_commands() {
    let (_handle, state) = handle();
    let (tx, rx) = mpsc::channel::<ControlCmd>();
    let iface = PlayerIface {
        remote: Remote(tx),
        state,
    };

    iface.play_pause();
    iface.next();
    iface.previous();
    iface.stop();

    let got: Vec<ControlCmd> = rx.try_iter().collect();
    assert_eq!(
        got,
        vec![
            ControlCmd::PlayPause,
            ControlCmd::Next,
            ControlCmd::Prev,
            ControlCmd::Stop
        ]
    );
}

#[test]
fn quit_and_commands_after_shutdown_are_harmless() {
    let (tx, rx) = mpsc::channel::<ControlCmd>();
    let root = RootIface {
        remote: Remote(tx),
    };
    root.quit();
    assert_eq!(rx.try_recv().ok(), Some(ControlCmd::Quit));

    drop(rx);
    root.quit();
}

#[test]
fn blank_artist_is_not_reported() {
    let (handle, state) = handle();
    handle.set_artist("   ");
    handle.set_track_metadata(Some(0), Some("Title"), None);

    let map = state.lock().unwrap().metadata();
    assert!(map.contains_key("xesam:title"));
    assert!(!map.contains_key("xesam:artist"));
}
