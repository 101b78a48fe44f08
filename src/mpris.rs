//! MPRIS D-Bus service so desktop media keys and `playerctl` can drive playback.
//!
//! The service lives on its own thread. Method calls turn into [`ControlCmd`]s
//! on a channel that the event loop drains, and property reads are answered
//! from a snapshot the event loop keeps current through [`MprisHandle`].

use std::collections::HashMap;
use std::sync::{Arc, Mutex, mpsc::Sender};
use std::thread;
use std::time::Duration;

use async_io::{Timer, block_on};
use tracing::{debug, info, warn};
use zbus::{Connection, interface};
use zvariant::{OwnedObjectPath, OwnedValue, Value};

use crate::audio::PlaybackState;

const OBJECT_PATH: &str = "/org/mpris/MediaPlayer2";
const BUS_NAME: &str = "org.mpris.MediaPlayer2.spidey";
const IDENTITY: &str = "spidey";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ControlCmd {
    Quit,
    Play,
    Pause,
    PlayPause,
    Stop,
    Next,
    Prev,
}

#[derive(Debug, Default)]
struct SharedState {
    playback: PlaybackState,
    title: Option<String>,
    artist: Option<String>,
    track_id: Option<OwnedObjectPath>,
    length_micros: Option<i64>,
}

impl SharedState {
    fn status(&self) -> &'static str {
        match self.playback {
            PlaybackState::Stopped => "Stopped",
            PlaybackState::Playing => "Playing",
            PlaybackState::Paused => "Paused",
        }
    }

    /// `xesam:`/`mpris:` entries for the loaded track. The artist is only
    /// reported alongside a title.
    fn metadata(&self) -> HashMap<String, OwnedValue> {
        let mut entries: Vec<(&str, Value<'static>)> = Vec::new();
        if let Some(id) = &self.track_id {
            entries.push(("mpris:trackid", Value::from(id.clone().into_inner())));
        }
        entries.push((
            "xesam:title",
            Value::from(self.title.clone().unwrap_or_default()),
        ));
        if let (Some(_), Some(artist)) = (&self.title, &self.artist) {
            entries.push(("xesam:artist", Value::from(vec![artist.clone()])));
        }
        if let Some(length) = self.length_micros {
            entries.push(("mpris:length", Value::from(length)));
        }

        entries
            .into_iter()
            .filter_map(|(key, value)| Some((key.to_string(), OwnedValue::try_from(value).ok()?)))
            .collect()
    }
}

type Shared = Arc<Mutex<SharedState>>;

/// Event-loop side of the service: pushes what the bus should report.
pub struct MprisHandle {
    state: Shared,
}

impl MprisHandle {
    fn update(&self, apply: impl FnOnce(&mut SharedState)) {
        if let Ok(mut s) = self.state.lock() {
            apply(&mut s);
        }
    }

    pub fn set_playback(&self, playback: PlaybackState) {
        self.update(|s| s.playback = playback);
    }

    /// Artist reported for every track (there is no per-track metadata).
    pub fn set_artist(&self, artist: &str) {
        let artist = Some(artist.to_string()).filter(|a| !a.trim().is_empty());
        self.update(|s| s.artist = artist);
    }

    /// Publish the loaded track, or clear it with `None`.
    pub fn set_track_metadata(
        &self,
        index: Option<usize>,
        title: Option<&str>,
        length: Option<Duration>,
    ) {
        let track_id =
            index.and_then(|i| OwnedObjectPath::try_from(format!("{OBJECT_PATH}/track/{i}")).ok());
        self.update(|s| {
            s.title = title.map(str::to_string);
            s.track_id = track_id;
            s.length_micros = length.map(|d| d.as_micros().min(i64::MAX as u128) as i64);
        });
    }
}

/// Command sender shared by both interfaces.
#[derive(Clone)]
struct Remote(Sender<ControlCmd>);

impl Remote {
    fn send(&self, cmd: ControlCmd) {
        if let Err(e) = self.0.send(cmd) {
            debug!(cmd = ?e.0, "event loop gone, dropping MPRIS command");
        }
    }
}

struct RootIface {
    remote: Remote,
}

#[interface(name = "org.mpris.MediaPlayer2")]
impl RootIface {
    fn raise(&self) {}

    fn quit(&self) {
        self.remote.send(ControlCmd::Quit);
    }

    #[zbus(property)]
    fn can_quit(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_raise(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn has_track_list(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn identity(&self) -> &str {
        IDENTITY
    }

    #[zbus(property)]
    fn supported_uri_schemes(&self) -> Vec<String> {
        Vec::new()
    }

    #[zbus(property)]
    fn supported_mime_types(&self) -> Vec<String> {
        Vec::new()
    }
}

struct PlayerIface {
    remote: Remote,
    state: Shared,
}

impl PlayerIface {
    fn read<T>(&self, get: impl FnOnce(&SharedState) -> T) -> Option<T> {
        self.state.lock().ok().map(|s| get(&s))
    }
}

#[interface(name = "org.mpris.MediaPlayer2.Player")]
impl PlayerIface {
    fn next(&self) {
        self.remote.send(ControlCmd::Next);
    }

    fn previous(&self) {
        self.remote.send(ControlCmd::Prev);
    }

    fn play(&self) {
        self.remote.send(ControlCmd::Play);
    }

    fn pause(&self) {
        self.remote.send(ControlCmd::Pause);
    }

    fn play_pause(&self) {
        self.remote.send(ControlCmd::PlayPause);
    }

    fn stop(&self) {
        self.remote.send(ControlCmd::Stop);
    }

    #[zbus(property)]
    fn playback_status(&self) -> &str {
        self.read(SharedState::status).unwrap_or("Stopped")
    }

    #[zbus(property)]
    fn can_control(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_play(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_pause(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_next(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_previous(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn metadata(&self) -> HashMap<String, OwnedValue> {
        self.read(SharedState::metadata).unwrap_or_default()
    }
}

/// Claim the bus name and export both interfaces.
async fn serve(remote: Remote, state: Shared) -> zbus::Result<Connection> {
    zbus::connection::Builder::session()?
        .name(BUS_NAME)?
        .serve_at(
            OBJECT_PATH,
            RootIface {
                remote: remote.clone(),
            },
        )?
        .serve_at(OBJECT_PATH, PlayerIface { remote, state })?
        .build()
        .await
}

/// Start the service thread. Without a session bus the player runs on
/// without media keys and the returned handle just records state.
pub fn spawn_mpris(tx: Sender<ControlCmd>) -> MprisHandle {
    let state = Shared::default();
    let service_state = Arc::clone(&state);

    let spawned = thread::Builder::new()
        .name("mpris".into())
        .spawn(move || {
            block_on(async move {
                let _connection = match serve(Remote(tx), service_state).await {
                    Ok(connection) => connection,
                    Err(e) => {
                        warn!(error = %e, "MPRIS service unavailable");
                        return;
                    }
                };
                info!(name = BUS_NAME, "MPRIS service registered");
                // Requests are served only while the connection is held.
                loop {
                    Timer::after(Duration::from_secs(3600)).await;
                }
            })
        });
    if let Err(e) = spawned {
        warn!(error = %e, "could not start the MPRIS thread");
    }

    MprisHandle { state }
}

#[cfg(test)]
mod tests;
