use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::library::Track;
use crate::visualizer::SampleTap;

use super::error::AudioError;
use super::output::AudioOutput;
use super::thread::spawn_audio_thread;
use super::types::{AudioCmd, AudioEvent, PlaybackHandle, PlaybackInfo};

/// Handle to the audio thread, which owns the output stream and the one sink.
pub struct AudioPlayer {
    tx: Sender<AudioCmd>,
    playback: PlaybackHandle,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl AudioPlayer {
    /// Spawn the audio thread. Decoded samples are copied into `tap`.
    pub fn new(tap: SampleTap) -> (Self, Receiver<AudioEvent>) {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let (event_tx, event_rx) = mpsc::channel::<AudioEvent>();
        let playback_info: PlaybackHandle = Arc::new(Mutex::new(PlaybackInfo::default()));

        let audio_handle = spawn_audio_thread(rx, playback_info.clone(), event_tx, tap);

        let player = Self {
            tx,
            playback: playback_info,
            join: Mutex::new(Some(audio_handle)),
        };
        (player, event_rx)
    }

    pub fn send(&self, cmd: AudioCmd) -> Result<(), AudioError> {
        self.tx.send(cmd).map_err(|_| AudioError::Disconnected)
    }

    fn update(&self, f: impl FnOnce(&mut PlaybackInfo)) {
        if let Ok(mut info) = self.playback.lock() {
            f(&mut info);
        }
    }

    pub fn quit_softly(&self, fade_out: Duration) {
        let _ = self.send(AudioCmd::Quit {
            fade_out_ms: fade_out.as_millis() as u64,
        });

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}

// The shared info is updated right away so the UI does not show stale
// position between a command and the thread's next publish.
impl AudioOutput for AudioPlayer {
    fn load(&mut self, track: &Track, autoplay: bool) -> Result<(), AudioError> {
        self.send(AudioCmd::Load {
            track: track.clone(),
            autoplay,
        })?;
        self.update(|info| info.elapsed = Duration::ZERO);
        Ok(())
    }

    fn play(&mut self) -> Result<(), AudioError> {
        self.send(AudioCmd::Play)
    }

    fn pause(&mut self) -> Result<(), AudioError> {
        self.send(AudioCmd::Pause)?;
        self.update(|info| info.playing = false);
        Ok(())
    }

    fn seek_to(&mut self, position: Duration) -> Result<(), AudioError> {
        self.send(AudioCmd::SeekTo(position))?;
        self.update(|info| info.elapsed = position);
        Ok(())
    }

    fn snapshot(&self) -> PlaybackInfo {
        self.playback
            .lock()
            .map(|info| info.clone())
            .unwrap_or_default()
    }
}
