use crate::app::App;
use crate::audio::{PlaybackInfo, PlaybackState};
use crate::mpris::MprisHandle;

/// What MPRIS last saw, so the shared state is only touched on change.
pub type MprisSnapshot = (Option<String>, Option<std::time::Duration>, PlaybackState);

pub fn snapshot(info: &PlaybackInfo, state: PlaybackState) -> MprisSnapshot {
    (info.name.clone(), info.duration, state)
}

pub fn update_mpris(mpris: &MprisHandle, app: &App, info: &PlaybackInfo, state: PlaybackState) {
    let index = info
        .name
        .as_deref()
        .and_then(|name| app.playlist.position_of(name));
    let title = index
        .and_then(|i| app.playlist.get(i))
        .map(|t| t.display.as_str());

    mpris.set_track_metadata(index, title, info.duration);
    mpris.set_playback(state);
}
