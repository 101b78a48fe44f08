use std::f32::consts::PI;

use super::widget::{bar_eighths, bar_width, cover_rect, gradient};
use super::*;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier};
use ratatui::widgets::Widget;

fn settings() -> VisualizerSettings {
    VisualizerSettings::default()
}

fn sine(bin: usize, n: usize) -> Vec<f32> {
    (0..n)
        .map(|i| (2.0 * PI * bin as f32 * i as f32 / n as f32).sin())
        .collect()
}

#[test]
fn silence_maps_to_zero_bins() {
    let mut analyzer = SpectrumAnalyzer::new(&settings());
    let frame = analyzer.analyze(&vec![0.0; 256]);
    assert_eq!(frame.bins.len(), 128);
    assert!(frame.bins.iter().all(|&b| b == 0));
}

#[test]
fn sine_peaks_at_its_bin() {
    let mut analyzer = SpectrumAnalyzer::new(&settings());
    let frame = analyzer.analyze(&sine(16, 256));

    let peak = frame
        .bins
        .iter()
        .enumerate()
        .max_by_key(|(_, b)| **b)
        .map(|(i, _)| i)
        .unwrap();
    assert_eq!(peak, 16);
    assert_eq!(frame.bins[16], 255);
    assert!(frame.bins[100] < frame.bins[16]);
}

#[test]
fn smoothing_decays_instead_of_dropping() {
    let mut analyzer = SpectrumAnalyzer::new(&settings());
    analyzer.analyze(&sine(16, 256));
    let after = analyzer.analyze(&vec![0.0; 256]);
    assert!(after.bins[16] > 0);

    analyzer.reset();
    let cleared = analyzer.analyze(&vec![0.0; 256]);
    assert_eq!(cleared.bins[16], 0);
}

#[test]
fn short_input_is_padded() {
    let mut analyzer = SpectrumAnalyzer::new(&settings());
    let frame = analyzer.analyze(&[0.0; 10]);
    assert_eq!(frame.bins.len(), 128);
}

#[test]
fn pulse_scale_follows_mean() {
    let quiet = Frame { bins: vec![0; 4] };
    assert_eq!(quiet.pulse_scale(0.1), 1.0);

    let loud = Frame { bins: vec![128; 4] };
    assert!((loud.mean() - 128.0).abs() < f32::EPSILON);
    assert!((loud.pulse_scale(0.1) - 1.05).abs() < 1e-6);

    assert_eq!(Frame::default().mean(), 0.0);
}

#[test]
fn tap_returns_newest_samples_padded() {
    let tap = SampleTap::new(4);
    for s in [1.0, 2.0, 3.0, 4.0, 5.0] {
        tap.push(s);
    }
    assert_eq!(tap.latest_mono(3), vec![3.0, 4.0, 5.0]);
    assert_eq!(tap.latest_mono(6), vec![0.0, 0.0, 2.0, 3.0, 4.0, 5.0]);

    tap.clear();
    assert_eq!(tap.latest_mono(2), vec![0.0, 0.0]);
}

#[test]
fn no_frames_after_stop() {
    let tap = SampleTap::new(1024);
    for s in sine(16, 256) {
        tap.push(s);
    }
    let mut vis = Visualizer::new(&settings(), tap);
    assert!(vis.tick().is_none());

    vis.start();
    assert!(vis.tick().is_some());
    assert!(vis.frame().is_some());

    vis.stop();
    assert!(vis.frame().is_none());
    assert!(vis.tick().is_none());
    assert!(!vis.is_running());
}

#[test]
fn bar_geometry() {
    assert_eq!(bar_width(128, 128), 2);
    assert_eq!(bar_width(10, 128), 1);
    assert_eq!(bar_eighths(0, 1.5, 10), 0);
    // 255 * 1.5 of 510 is three quarters of the height
    assert_eq!(bar_eighths(255, 1.5, 10), 60);
    assert_eq!(bar_eighths(255, 3.0, 10), 80);
}

#[test]
fn gradient_endpoints() {
    assert_eq!(gradient(0.0), Color::Rgb(0, 242, 234));
    assert_eq!(gradient(1.0), Color::Rgb(255, 0, 85));
}

#[test]
fn cover_rect_is_centered_and_grows() {
    let area = Rect::new(0, 0, 22, 11);
    assert_eq!(cover_rect(area, 1.1, 1.1), area);

    let small = cover_rect(area, 1.0, 1.1);
    assert_eq!(small.width, 20);
    assert_eq!(small.height, 10);
    assert_eq!(small.x, 1);
    assert_eq!(small.y, 0);
}

fn render_spectrum(bins: Vec<u8>, height_scale: f32, area: Rect) -> Buffer {
    let frame = Frame { bins };
    let mut buf = Buffer::empty(area);
    SpectrumWidget::new(Some(&frame), height_scale).render(area, &mut buf);
    buf
}

#[test]
fn spectrum_bars_fill_from_the_bottom_with_a_dim_cap() {
    // Five rows, one-cell bars at x = 0, 2, 4, 6.
    let area = Rect::new(0, 0, 8, 5);
    let mut bins = vec![255, 102, 0, 64];
    bins.resize(20, 0);
    let buf = render_spectrum(bins, 2.0, area);

    // Full-height bar: base color at the bottom, top color at the top, no cap.
    for y in 0..5 {
        assert_eq!(buf[(0, y)].symbol(), "█");
    }
    assert_eq!(buf[(0, 4)].fg, Color::Rgb(0, 242, 234));
    assert_eq!(buf[(0, 0)].fg, Color::Rgb(255, 0, 85));
    assert!(!buf[(0, 0)].modifier.contains(Modifier::DIM));

    // Two full cells, then the reflection right above them.
    assert_eq!(buf[(2, 4)].symbol(), "█");
    assert_eq!(buf[(2, 3)].symbol(), "█");
    assert_eq!(buf[(2, 3)].fg, gradient(0.25));
    assert_eq!(buf[(2, 2)].symbol(), "▁");
    assert_eq!(buf[(2, 2)].fg, gradient(0.5));
    assert!(buf[(2, 2)].modifier.contains(Modifier::DIM));
    assert!(!buf[(2, 3)].modifier.contains(Modifier::DIM));
    assert_eq!(buf[(2, 1)].symbol(), " ");

    // A silent bin draws nothing at all.
    for y in 0..5 {
        assert_eq!(buf[(4, y)].symbol(), " ");
    }

    // One full cell plus a quarter cell, capped above.
    assert_eq!(buf[(6, 4)].symbol(), "█");
    assert_eq!(buf[(6, 3)].symbol(), "▂");
    assert_eq!(buf[(6, 2)].symbol(), "▁");
    assert!(buf[(6, 2)].modifier.contains(Modifier::DIM));

    // Gaps between bars stay empty.
    for y in 0..5 {
        assert_eq!(buf[(1, y)].symbol(), " ");
        assert_eq!(buf[(7, y)].symbol(), " ");
    }
}

#[test]
fn height_scale_stretches_the_bars() {
    let area = Rect::new(0, 0, 8, 5);
    let mut bins = vec![102];
    bins.resize(20, 0);

    let short = render_spectrum(bins.clone(), 1.0, area);
    assert_eq!(short[(0, 4)].symbol(), "█");
    assert_eq!(short[(0, 3)].symbol(), "▁");
    assert!(short[(0, 3)].modifier.contains(Modifier::DIM));

    let tall = render_spectrum(bins, 5.0, area);
    for y in 0..5 {
        assert_eq!(tall[(0, y)].symbol(), "█");
        assert!(!tall[(0, y)].modifier.contains(Modifier::DIM));
    }
}

#[test]
fn spectrum_without_a_frame_leaves_the_area_blank() {
    let area = Rect::new(0, 0, 6, 3);
    let mut buf = Buffer::empty(area);
    SpectrumWidget::new(None, 1.5).render(area, &mut buf);
    assert_eq!(buf, Buffer::empty(area));
}
