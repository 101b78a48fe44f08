//! Playback: the transport controller and the rodio-backed output it drives.

mod controller;
mod error;
mod output;
mod player;
mod sink;
mod thread;
mod types;

pub use controller::PlaybackController;
pub use error::AudioError;
pub use output::AudioOutput;
pub use player::AudioPlayer;
pub use types::{AudioEvent, PlaybackInfo, PlaybackState};
