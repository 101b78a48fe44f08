use std::time::Duration;

use crate::library::Track;

use super::error::AudioError;
use super::types::PlaybackInfo;

/// The single audio output the controller drives.
///
/// Implemented by [`super::AudioPlayer`] over the audio thread; tests use an
/// in-memory fake.
pub trait AudioOutput {
    /// Replace whatever is loaded with `track` at position 0.
    fn load(&mut self, track: &Track, autoplay: bool) -> Result<(), AudioError>;
    fn play(&mut self) -> Result<(), AudioError>;
    fn pause(&mut self) -> Result<(), AudioError>;
    fn seek_to(&mut self, position: Duration) -> Result<(), AudioError>;
    /// Latest published playback state.
    fn snapshot(&self) -> PlaybackInfo;
}
