//! Audio-related small types and handles.
//!
//! Commands sent to the audio thread, events it reports back, and the
//! playback snapshot it publishes for the UI and MPRIS.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::library::Track;

/// Transport state as the controller sees it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

#[derive(Debug)]
pub enum AudioCmd {
    /// Replace the current sink with `track`, starting at 0.
    Load { track: Track, autoplay: bool },
    /// Resume, restarting from 0 if the sink has run dry.
    Play,
    Pause,
    /// Jump to an absolute position in the current track.
    SeekTo(Duration),
    /// Quit the audio thread, optionally fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}

/// Reported by the audio thread on its event channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioEvent {
    /// The named track played to its end.
    Ended { name: String },
    /// The track could not be decoded; the previous sink is still in place.
    LoadFailed { name: String, reason: String },
    /// No audio output is available.
    PlayFailed { reason: String },
}

#[derive(Debug, Clone, Default, PartialEq)]
/// Runtime playback information shared with the UI.
pub struct PlaybackInfo {
    /// Name of the loaded track, if any.
    pub name: Option<String>,
    /// Elapsed playback time for the current track.
    pub elapsed: Duration,
    /// Total length, when the decoder knows it.
    pub duration: Option<Duration>,
    /// Whether audio is actually coming out.
    pub playing: bool,
}

pub type PlaybackHandle = Arc<Mutex<PlaybackInfo>>;
