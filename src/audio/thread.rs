use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, error, warn};

use crate::library::Track;
use crate::visualizer::SampleTap;

use super::error::AudioError;
use super::sink::create_sink_at;
use super::types::{AudioCmd, AudioEvent, PlaybackHandle};

/// How often the thread wakes up to publish elapsed time and notice the end of a track.
const TICK: Duration = Duration::from_millis(50);

struct Loaded {
    track: Track,
    sink: Sink,
    duration: Option<Duration>,
}

/// Everything the audio thread owns besides the output stream.
struct Deck {
    loaded: Option<Loaded>,
    paused: bool,
    // Track start time and accumulated elapsed when paused.
    started_at: Option<Instant>,
    accumulated: Duration,
    tap: SampleTap,
    events: Sender<AudioEvent>,
    /// Why the output stream could not be opened, if it could not.
    output_error: Option<String>,
}

impl Deck {
    fn elapsed(&self) -> Duration {
        self.accumulated + self.started_at.map_or(Duration::ZERO, |st| st.elapsed())
    }

    fn emit(&self, event: AudioEvent) {
        let _ = self.events.send(event);
    }

    fn no_output(&self) {
        let detail = self.output_error.as_deref().unwrap_or("no device");
        self.emit(AudioEvent::PlayFailed {
            reason: AudioError::NoOutput(detail.to_string()).to_string(),
        });
    }

    fn load(&mut self, stream: Option<&OutputStream>, track: Track, autoplay: bool) {
        let Some(stream) = stream else {
            self.no_output();
            return;
        };
        let (sink, duration) = match create_sink_at(stream, &track, Duration::ZERO, &self.tap) {
            Ok(built) => built,
            Err(e) => {
                warn!(name = %track.name, error = %e, "keeping previous track");
                self.emit(AudioEvent::LoadFailed {
                    name: track.name.clone(),
                    reason: e.to_string(),
                });
                return;
            }
        };

        if let Some(old) = self.loaded.take() {
            old.sink.stop();
        }
        self.tap.clear();
        if autoplay {
            sink.play();
        }
        debug!(name = %track.name, ?duration, autoplay, "sink ready");
        self.loaded = Some(Loaded {
            track,
            sink,
            duration,
        });
        self.paused = !autoplay;
        self.accumulated = Duration::ZERO;
        self.started_at = autoplay.then(Instant::now);
    }

    /// Replace the sink with a fresh one positioned at `position`, keeping the paused state.
    fn rebuild_at(&mut self, stream: &OutputStream, position: Duration) {
        let Some(current) = self.loaded.as_mut() else {
            return;
        };
        let (sink, duration) = match create_sink_at(stream, &current.track, position, &self.tap)
        {
            Ok(built) => built,
            Err(e) => {
                warn!(name = %current.track.name, error = %e, "seek failed");
                return;
            }
        };
        current.sink.stop();
        if !self.paused {
            sink.play();
        }
        current.sink = sink;
        current.duration = duration.or(current.duration);
        self.accumulated = position;
        self.started_at = (!self.paused).then(Instant::now);
    }

    fn play(&mut self, stream: Option<&OutputStream>) {
        let Some(stream) = stream else {
            self.no_output();
            return;
        };
        let Some(current) = self.loaded.as_ref() else {
            return;
        };
        if !self.paused {
            return;
        }
        self.paused = false;
        if current.sink.empty() {
            // Played to the end earlier: start over.
            self.rebuild_at(stream, Duration::ZERO);
        } else {
            current.sink.play();
            self.started_at = Some(Instant::now());
        }
    }

    fn pause(&mut self) {
        let Some(current) = self.loaded.as_ref() else {
            return;
        };
        if self.paused {
            return;
        }
        current.sink.pause();
        if let Some(st) = self.started_at.take() {
            self.accumulated += st.elapsed();
        }
        self.paused = true;
    }

    fn seek_to(&mut self, stream: Option<&OutputStream>, position: Duration) {
        // Scrubbing: rebuild the current sink and skip into the track.
        if let Some(stream) = stream {
            self.rebuild_at(stream, position);
        }
    }

    /// Report the end of the current track once, leaving it paused at the end.
    fn check_ended(&mut self) {
        let ended = match self.loaded.as_ref() {
            Some(current) if !self.paused && current.sink.empty() => current.track.name.clone(),
            _ => return,
        };
        if let Some(st) = self.started_at.take() {
            self.accumulated += st.elapsed();
        }
        self.paused = true;
        debug!(name = %ended, "track ended");
        self.emit(AudioEvent::Ended { name: ended });
    }

    fn publish(&self, playback_info: &PlaybackHandle) {
        if let Ok(mut info) = playback_info.lock() {
            match self.loaded.as_ref() {
                Some(current) => {
                    let elapsed = self.elapsed();
                    info.name = Some(current.track.name.clone());
                    info.elapsed = current.duration.map_or(elapsed, |d| elapsed.min(d));
                    info.duration = current.duration;
                    info.playing = !self.paused;
                }
                None => {
                    info.name = None;
                    info.elapsed = Duration::ZERO;
                    info.duration = None;
                    info.playing = false;
                }
            }
        }
    }
}

fn fade_out_sink(sink: &Sink, fade_out_ms: u64) {
    if fade_out_ms == 0 {
        sink.set_volume(0.0);
        return;
    }
    let steps: u64 = 20;
    let step_ms = (fade_out_ms / steps).max(1);
    for step in 1..=steps {
        let t = step as f32 / steps as f32;
        sink.set_volume(1.0 - t);
        thread::sleep(Duration::from_millis(step_ms));
    }
    sink.set_volume(0.0);
}

pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    playback_info: PlaybackHandle,
    events: Sender<AudioEvent>,
    tap: SampleTap,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let (stream, output_error) = match OutputStreamBuilder::open_default_stream() {
            Ok(mut stream) => {
                // rodio logs to stderr when OutputStream is dropped, which would
                // scribble over the TUI.
                stream.log_on_drop(false);
                (Some(stream), None)
            }
            Err(e) => {
                error!(error = %e, "no audio output device; playback disabled");
                (None, Some(e.to_string()))
            }
        };

        let mut deck = Deck {
            loaded: None,
            paused: true,
            started_at: None,
            accumulated: Duration::ZERO,
            tap,
            events,
            output_error,
        };

        loop {
            match rx.recv_timeout(TICK) {
                Ok(AudioCmd::Load { track, autoplay }) => deck.load(stream.as_ref(), track, autoplay),
                Ok(AudioCmd::Play) => deck.play(stream.as_ref()),
                Ok(AudioCmd::Pause) => deck.pause(),
                Ok(AudioCmd::SeekTo(position)) => deck.seek_to(stream.as_ref(), position),
                Ok(AudioCmd::Quit { fade_out_ms }) => {
                    if let Some(current) = deck.loaded.as_ref() {
                        if !deck.paused {
                            // Fade out gently before stopping.
                            fade_out_sink(&current.sink, fade_out_ms);
                        }
                        current.sink.stop();
                    }
                    deck.paused = true;
                    deck.publish(&playback_info);
                    break;
                }
                Err(RecvTimeoutError::Timeout) => deck.check_ended(),
                Err(RecvTimeoutError::Disconnected) => break,
            }
            deck.publish(&playback_info);
        }
    })
}
