use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rodio::Source;

/// Ring buffer of recent mono samples, shared between the audio thread and the UI.
#[derive(Clone, Debug)]
pub struct SampleTap {
    inner: Arc<Mutex<VecDeque<f32>>>,
    capacity: usize,
}

impl SampleTap {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            inner: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    /// Append one mono sample, dropping the oldest when full.
    ///
    /// Never blocks: the sample is dropped if the UI holds the lock.
    pub fn push(&self, sample: f32) {
        if let Ok(mut buf) = self.inner.try_lock() {
            if buf.len() >= self.capacity {
                buf.pop_front();
            }
            buf.push_back(sample);
        }
    }

    pub fn clear(&self) {
        if let Ok(mut buf) = self.inner.lock() {
            buf.clear();
        }
    }

    /// The newest `n` samples, oldest first, zero-padded at the front.
    pub fn latest_mono(&self, n: usize) -> Vec<f32> {
        let mut out = vec![0.0; n];
        if let Ok(buf) = self.inner.lock() {
            let take = n.min(buf.len());
            let skip = buf.len() - take;
            for (slot, s) in out[n - take..].iter_mut().zip(buf.iter().skip(skip)) {
                *slot = *s;
            }
        }
        out
    }
}

/// Source wrapper that copies a mono downmix of everything it yields into a [`SampleTap`].
pub struct TapSource<S> {
    inner: S,
    tap: SampleTap,
    frame_sum: f32,
    frame_pos: u16,
}

impl<S> TapSource<S>
where
    S: Source<Item = f32>,
{
    pub fn new(inner: S, tap: SampleTap) -> Self {
        Self {
            inner,
            tap,
            frame_sum: 0.0,
            frame_pos: 0,
        }
    }
}

impl<S> Iterator for TapSource<S>
where
    S: Source<Item = f32>,
{
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        let sample = self.inner.next()?;

        let channels = self.inner.channels().max(1);
        self.frame_sum += sample;
        self.frame_pos += 1;
        if self.frame_pos >= channels {
            self.tap.push(self.frame_sum / channels as f32);
            self.frame_sum = 0.0;
            self.frame_pos = 0;
        }

        Some(sample)
    }
}

impl<S> Source for TapSource<S>
where
    S: Source<Item = f32>,
{
    fn current_span_len(&self) -> Option<usize> {
        self.inner.current_span_len()
    }

    fn channels(&self) -> u16 {
        self.inner.channels()
    }

    fn sample_rate(&self) -> u32 {
        self.inner.sample_rate()
    }

    fn total_duration(&self) -> Option<Duration> {
        self.inner.total_duration()
    }

    fn try_seek(&mut self, pos: Duration) -> Result<(), rodio::source::SeekError> {
        self.frame_sum = 0.0;
        self.frame_pos = 0;
        self.inner.try_seek(pos)
    }
}
