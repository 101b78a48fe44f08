use std::path::PathBuf;

use tracing::{debug, info};

use crate::app::App;
use crate::audio::{AudioError, AudioOutput, PlaybackController, PlaybackState};
use crate::config;
use crate::playlist::Playlist;
use crate::store::LazyStore;

/// Build the session from the persisted tracks. A store that cannot be
/// opened leaves the playlist empty; the error is only logged.
pub fn build_app(settings: &config::Settings) -> App {
    let store = LazyStore::new(config::resolve_store_path(settings));
    let mut app = App::new(Playlist::default(), store, &settings.ui);
    if let Some(outcome) = app.reload_from_store() {
        debug!(?outcome, "reloaded playlist");
    }
    info!(
        path = ?app.store.path(),
        open = app.store.is_open(),
        tracks = app.playlist.len(),
        "track store ready"
    );
    app
}

pub fn apply_playback_defaults<O: AudioOutput>(
    controller: &mut PlaybackController<O>,
    settings: &config::Settings,
) {
    controller.set_modes(settings.playback.shuffle, settings.playback.repeat);
}

/// Import paths given on the command line.
pub fn import_cli_paths(app: &mut App, paths: &[PathBuf], settings: &config::Settings) {
    if paths.is_empty() {
        return;
    }
    let report = app.import_paths(paths, &settings.import);
    info!(
        saved = report.saved,
        duplicates = report.duplicates.len(),
        "imported command-line paths"
    );
}

/// Load the current track paused when nothing has been loaded yet and
/// playback is idle.
pub fn load_first_if_idle<O: AudioOutput>(
    app: &mut App,
    controller: &mut PlaybackController<O>,
) -> Result<(), AudioError> {
    if controller.loaded().is_some()
        || controller.state() != PlaybackState::Stopped
        || !app.has_tracks()
    {
        return Ok(());
    }
    let index = app.playlist.current();
    controller.load_track(&mut app.playlist, index, false)
}
