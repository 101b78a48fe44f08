use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/spidey/config.toml` or `~/.config/spidey/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `SPIDEY__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub audio: AudioSettings,
    pub ui: UiSettings,
    pub controls: ControlsSettings,
    pub playback: PlaybackSettings,
    pub store: StoreSettings,
    pub import: ImportSettings,
    pub visualizer: VisualizerSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Fade-out duration when quitting (milliseconds).
    /// Set to 0 to stop immediately.
    pub quit_fade_out_ms: u64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            quit_fade_out_ms: 300,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// Whether the playlist cursor follows the current track.
    pub follow_playback: bool,

    /// The text rendered inside the top header box.
    pub header_text: String,

    /// Secondary line under the song title. Tags are not read, so this is static.
    pub artist_text: String,

    /// Whether the playlist panel starts visible.
    pub show_playlist: bool,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            follow_playback: true,
            header_text: " ~ spidey ~ ".to_string(),
            artist_text: "Spidey Player".to_string(),
            show_playlist: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Number of seconds to seek when pressing Left / Right.
    pub scrub_seconds: u64,
    /// Past this many seconds, "previous" restarts the current track instead.
    pub restart_threshold_secs: u64,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self {
            scrub_seconds: 5,
            restart_threshold_secs: 5,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Whether shuffle starts enabled.
    pub shuffle: bool,
    /// Whether repeat starts enabled (a finished track restarts).
    #[serde(alias = "repeat_one", alias = "repeat-one")]
    pub repeat: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Location of the track database. Defaults to `$XDG_DATA_HOME/spidey/tracks.db`.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ImportSettings {
    /// File extensions to accept on import (case-insensitive, without dot).
    /// Extensions without a known audio content type are ignored.
    pub extensions: Vec<String>,
    /// Whether to follow symlinks when importing a directory.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            extensions: vec![
                "mp3".into(),
                "flac".into(),
                "wav".into(),
                "ogg".into(),
                "m4a".into(),
            ],
            follow_links: true,
            include_hidden: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VisualizerSettings {
    /// FFT window length in samples. Must be a power of two; yields `fft_size / 2` bins.
    pub fft_size: usize,
    /// Time smoothing between frames, in `[0, 1)`.
    pub smoothing: f32,
    /// Decibel value mapped to magnitude 0.
    pub min_db: f32,
    /// Decibel value mapped to magnitude 255.
    pub max_db: f32,
    /// Bar height multiplier applied to each magnitude.
    pub height_scale: f32,
    /// How far the cover box grows at full average magnitude.
    pub pulse_factor: f32,
    /// Delay between rendered frames (milliseconds).
    pub frame_interval_ms: u64,
}

impl Default for VisualizerSettings {
    fn default() -> Self {
        Self {
            fft_size: 256,
            smoothing: 0.8,
            min_db: -100.0,
            max_db: -30.0,
            height_scale: 1.5,
            pulse_factor: 0.1,
            frame_interval_ms: 33,
        }
    }
}
