use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use crate::playlist::Playlist;

use super::error::AudioError;
use super::output::AudioOutput;
use super::types::{PlaybackInfo, PlaybackState};

/// Transport logic over one [`AudioOutput`].
///
/// The controller keeps the intended state (what the user asked for) so a
/// pause is visible to the rest of the UI immediately, before the audio
/// thread has caught up.
pub struct PlaybackController<O: AudioOutput> {
    output: O,
    state: PlaybackState,
    shuffle: bool,
    repeat: bool,
    restart_threshold: Duration,
    /// Name of the track handed to the output last.
    loaded: Option<String>,
    rng: StdRng,
}

impl<O: AudioOutput> PlaybackController<O> {
    pub fn new(output: O, restart_threshold: Duration) -> Self {
        Self::with_rng(output, restart_threshold, StdRng::from_os_rng())
    }

    pub fn with_rng(output: O, restart_threshold: Duration, rng: StdRng) -> Self {
        Self {
            output,
            state: PlaybackState::Stopped,
            shuffle: false,
            repeat: false,
            restart_threshold,
            loaded: None,
            rng,
        }
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn loaded(&self) -> Option<&str> {
        self.loaded.as_deref()
    }

    pub fn shuffle(&self) -> bool {
        self.shuffle
    }

    pub fn repeat(&self) -> bool {
        self.repeat
    }

    pub fn set_modes(&mut self, shuffle: bool, repeat: bool) {
        self.shuffle = shuffle;
        self.repeat = repeat;
    }

    pub fn toggle_shuffle(&mut self) -> bool {
        self.shuffle = !self.shuffle;
        self.shuffle
    }

    pub fn toggle_repeat(&mut self) -> bool {
        self.repeat = !self.repeat;
        self.repeat
    }

    pub fn info(&self) -> PlaybackInfo {
        self.output.snapshot()
    }

    /// Play/pause. Starts the current track when nothing is loaded yet.
    pub fn toggle_play(&mut self, playlist: &mut Playlist) -> Result<(), AudioError> {
        if playlist.is_empty() {
            return Ok(());
        }
        match self.state {
            PlaybackState::Playing => self.pause(),
            PlaybackState::Paused | PlaybackState::Stopped if self.loaded.is_some() => self.play(),
            _ => self.load_track(playlist, playlist.current(), true),
        }
    }

    pub fn play(&mut self) -> Result<(), AudioError> {
        if self.loaded.is_none() {
            return Ok(());
        }
        self.output.play()?;
        self.state = PlaybackState::Playing;
        Ok(())
    }

    pub fn pause(&mut self) -> Result<(), AudioError> {
        if self.state != PlaybackState::Playing {
            return Ok(());
        }
        self.output.pause()?;
        self.state = PlaybackState::Paused;
        Ok(())
    }

    /// Pause and rewind to the start of the loaded track.
    pub fn stop(&mut self) -> Result<(), AudioError> {
        if self.loaded.is_none() {
            return Ok(());
        }
        self.output.pause()?;
        self.output.seek_to(Duration::ZERO)?;
        self.state = PlaybackState::Stopped;
        Ok(())
    }

    /// Load the track at `index`, making it current.
    ///
    /// An unplayable track is refused before anything changes.
    pub fn load_track(
        &mut self,
        playlist: &mut Playlist,
        index: usize,
        autoplay: bool,
    ) -> Result<(), AudioError> {
        let track = playlist
            .get(index)
            .ok_or(AudioError::NoSuchTrack(index))?;
        if !track.is_playable() {
            warn!(name = %track.name, content_type = %track.content_type, "refusing to load unplayable track");
            return Err(AudioError::Unplayable {
                name: track.name.clone(),
                content_type: track.content_type.clone(),
                len: track.content.len(),
            });
        }

        self.output.load(track, autoplay)?;
        debug!(index, name = %track.name, autoplay, "loaded track");
        self.loaded = Some(track.name.clone());
        playlist.set_current(index);
        self.state = if autoplay {
            PlaybackState::Playing
        } else {
            PlaybackState::Paused
        };
        Ok(())
    }

    fn random_index(&mut self, len: usize) -> Option<usize> {
        (len > 0).then(|| self.rng.random_range(0..len))
    }

    pub fn next(&mut self, playlist: &mut Playlist) -> Result<(), AudioError> {
        let index = if self.shuffle {
            self.random_index(playlist.len())
        } else {
            playlist.next_index()
        };
        match index {
            Some(i) => self.load_track(playlist, i, true),
            None => Ok(()),
        }
    }

    /// Restart the current track when past the threshold, otherwise go back one.
    pub fn prev(&mut self, playlist: &mut Playlist) -> Result<(), AudioError> {
        if self.loaded.is_some() && self.output.snapshot().elapsed > self.restart_threshold {
            return self.output.seek_to(Duration::ZERO);
        }
        let index = if self.shuffle {
            self.random_index(playlist.len())
        } else {
            playlist.prev_index()
        };
        match index {
            Some(i) => self.load_track(playlist, i, true),
            None => Ok(()),
        }
    }

    /// Handle the end of `name`. Events for a track that is no longer loaded are ignored.
    pub fn on_ended(&mut self, playlist: &mut Playlist, name: &str) -> Result<(), AudioError> {
        if self.loaded.as_deref() != Some(name) {
            debug!(name, "ignoring end of a track that is no longer loaded");
            return Ok(());
        }
        if self.repeat {
            self.output.seek_to(Duration::ZERO)?;
            self.output.play()?;
            self.state = PlaybackState::Playing;
            return Ok(());
        }
        self.next(playlist)
    }

    /// The output refused to play; nothing is audible.
    pub fn on_play_failed(&mut self) {
        if self.state == PlaybackState::Playing {
            self.state = PlaybackState::Paused;
        }
    }

    /// The output could not decode `name` and kept what it had.
    ///
    /// Ignored when another load was issued after `name`: that one is still
    /// on its way and decides what ends up playing.
    pub fn on_load_failed(&mut self, playlist: &mut Playlist, name: &str) {
        if self.loaded.as_deref() != Some(name) {
            debug!(name, "ignoring load failure superseded by a later load");
            return;
        }
        let info = self.output.snapshot();
        self.loaded = info.name.clone();
        self.state = match (&info.name, info.playing) {
            (None, _) => PlaybackState::Stopped,
            (Some(_), true) => PlaybackState::Playing,
            (Some(_), false) => PlaybackState::Paused,
        };
        if let Some(i) = info.name.as_deref().and_then(|n| playlist.position_of(n)) {
            playlist.set_current(i);
        }
    }

    /// Absolute seek, clamped to the track bounds (lower bound only when the length is unknown).
    pub fn seek_to(&mut self, position: Duration) -> Result<(), AudioError> {
        if self.loaded.is_none() {
            return Ok(());
        }
        let target = match self.output.snapshot().duration {
            Some(total) => position.min(total),
            None => position,
        };
        self.output.seek_to(target)
    }

    /// Relative seek by `delta_secs`, clamped like [`Self::seek_to`].
    pub fn seek_by(&mut self, delta_secs: i64) -> Result<(), AudioError> {
        let elapsed = self.output.snapshot().elapsed;
        let magnitude = Duration::from_secs(delta_secs.unsigned_abs());
        let target = if delta_secs >= 0 {
            elapsed.saturating_add(magnitude)
        } else {
            elapsed.saturating_sub(magnitude)
        };
        self.seek_to(target)
    }

    /// Seek to `fraction` of the track length. No-op while the length is unknown.
    pub fn seek_fraction(&mut self, fraction: f64) -> Result<(), AudioError> {
        let Some(total) = self.output.snapshot().duration else {
            return Ok(());
        };
        if !fraction.is_finite() {
            return Ok(());
        }
        self.seek_to(total.mul_f64(fraction.clamp(0.0, 1.0)))
    }
}
