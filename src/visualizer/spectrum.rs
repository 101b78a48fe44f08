//! Frequency analysis of the tapped signal.
//!
//! Mirrors what a browser `AnalyserNode` reports through
//! `getByteFrequencyData`: Blackman window, FFT magnitude normalized by the
//! window length, exponential smoothing across frames, then a linear map of
//! decibels in `[min_db, max_db]` onto `0..=255`.

use std::f32::consts::PI;
use std::sync::Arc;

use rustfft::{Fft, FftPlanner, num_complex::Complex};

use crate::config::VisualizerSettings;

/// One snapshot of frequency-bin magnitudes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Frame {
    pub bins: Vec<u8>,
}

impl Frame {
    /// Average magnitude over all bins (0.0 for an empty frame).
    pub fn mean(&self) -> f32 {
        if self.bins.is_empty() {
            return 0.0;
        }
        let sum: u32 = self.bins.iter().map(|&b| b as u32).sum();
        sum as f32 / self.bins.len() as f32
    }

    /// Scale factor for the pulsing cover: `1 + (mean / 256) * factor`.
    pub fn pulse_scale(&self, factor: f32) -> f32 {
        1.0 + (self.mean() / 256.0) * factor
    }
}

fn blackman(n: usize) -> Vec<f32> {
    const A0: f32 = 0.42;
    const A1: f32 = 0.5;
    const A2: f32 = 0.08;
    (0..n)
        .map(|i| {
            let x = i as f32 / n as f32;
            A0 - A1 * (2.0 * PI * x).cos() + A2 * (4.0 * PI * x).cos()
        })
        .collect()
}

pub struct SpectrumAnalyzer {
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    smoothed: Vec<f32>,
    scratch: Vec<Complex<f32>>,
    smoothing: f32,
    min_db: f32,
    max_db: f32,
}

impl SpectrumAnalyzer {
    pub fn new(settings: &VisualizerSettings) -> Self {
        let size = settings.fft_size;
        let mut planner = FftPlanner::<f32>::new();
        Self {
            fft: planner.plan_fft_forward(size),
            window: blackman(size),
            smoothed: vec![0.0; size / 2],
            scratch: Vec::with_capacity(size),
            smoothing: settings.smoothing,
            min_db: settings.min_db,
            max_db: settings.max_db,
        }
    }

    pub fn fft_size(&self) -> usize {
        self.window.len()
    }

    /// Forget the smoothing history.
    pub fn reset(&mut self) {
        self.smoothed.iter_mut().for_each(|v| *v = 0.0);
    }

    /// Analyze the newest `fft_size` samples. Shorter input is zero-padded at the front.
    pub fn analyze(&mut self, samples: &[f32]) -> Frame {
        let n = self.fft_size();
        let take = samples.len().min(n);
        let pad = n - take;
        let tail = &samples[samples.len() - take..];

        self.scratch.clear();
        self.scratch
            .extend(std::iter::repeat_n(Complex::new(0.0, 0.0), pad));
        self.scratch.extend(
            tail.iter()
                .zip(&self.window[pad..])
                .map(|(s, w)| Complex::new(s * w, 0.0)),
        );
        self.fft.process(&mut self.scratch);

        let (smoothing, min_db) = (self.smoothing, self.min_db);
        let range = self.max_db - min_db;
        let bins = self
            .smoothed
            .iter_mut()
            .zip(&self.scratch)
            .map(|(prev, c)| {
                let magnitude = c.norm() / n as f32;
                *prev = smoothing * *prev + (1.0 - smoothing) * magnitude;
                let db = 20.0 * prev.log10();
                if !db.is_finite() {
                    return 0;
                }
                (255.0 / range * (db - min_db)).clamp(0.0, 255.0) as u8
            })
            .collect();

        Frame { bins }
    }
}
