//! Real-time frequency visualizer.
//!
//! The audio thread feeds a [`SampleTap`]; on every frame tick the UI thread
//! asks [`Visualizer::tick`] for a fresh [`Frame`] and paints it. Frames are
//! only produced while the visualizer runs, and [`Visualizer::stop`] clears the
//! last one immediately.

mod spectrum;
mod tap;
mod widget;

pub use spectrum::{Frame, SpectrumAnalyzer};
pub use tap::{SampleTap, TapSource};
pub use widget::{CoverWidget, SpectrumWidget};

use crate::config::VisualizerSettings;

pub struct Visualizer {
    analyzer: SpectrumAnalyzer,
    tap: SampleTap,
    running: bool,
    frame: Option<Frame>,
}

impl Visualizer {
    pub fn new(settings: &VisualizerSettings, tap: SampleTap) -> Self {
        Self {
            analyzer: SpectrumAnalyzer::new(settings),
            tap,
            running: false,
            frame: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn start(&mut self) {
        if !self.running {
            tracing::debug!("visualizer started");
        }
        self.running = true;
    }

    /// Stop producing frames. Takes effect before the next tick.
    pub fn stop(&mut self) {
        if self.running {
            tracing::debug!("visualizer stopped");
        }
        self.running = false;
        self.frame = None;
        self.analyzer.reset();
    }

    /// Compute the frame for this tick, or `None` while stopped.
    pub fn tick(&mut self) -> Option<&Frame> {
        if !self.running {
            return None;
        }
        let samples = self.tap.latest_mono(self.analyzer.fft_size());
        self.frame = Some(self.analyzer.analyze(&samples));
        self.frame.as_ref()
    }

    /// The last computed frame, if the visualizer is running.
    pub fn frame(&self) -> Option<&Frame> {
        self.frame.as_ref()
    }
}

#[cfg(test)]
mod tests;
