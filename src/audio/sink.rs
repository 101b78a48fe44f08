//! Utilities for creating `rodio` sinks from `Track` values.
//!
//! The helper here decodes the stored bytes and prepares a paused `Sink` at
//! the requested start position, with the visualizer tap spliced in.

use std::io::Cursor;
use std::path::Path;
use std::time::Duration;

use rodio::{Decoder, OutputStream, Sink, Source};

use crate::library::Track;
use crate::visualizer::{SampleTap, TapSource};

use super::error::AudioError;

/// Create a paused `Sink` for `track` that starts playback at `start_at`.
///
/// Also returns the track length when the decoder can tell.
pub(super) fn create_sink_at(
    stream: &OutputStream,
    track: &Track,
    start_at: Duration,
    tap: &SampleTap,
) -> Result<(Sink, Option<Duration>), AudioError> {
    let mut builder = Decoder::builder()
        .with_data(Cursor::new(track.content.clone()))
        .with_byte_len(track.content.len() as u64);
    if let Some(ext) = Path::new(&track.name).extension().and_then(|e| e.to_str()) {
        builder = builder.with_hint(ext);
    }
    let decoder = builder.build().map_err(|e| AudioError::Decode {
        name: track.name.clone(),
        reason: e.to_string(),
    })?;
    let duration = decoder.total_duration();

    // `skip_duration` is our seeking primitive; even Duration::ZERO is fine.
    let source = TapSource::new(decoder.skip_duration(start_at), tap.clone());

    let sink = Sink::connect_new(stream.mixer());
    sink.append(source);
    sink.pause();
    Ok((sink, duration))
}
