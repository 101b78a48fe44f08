use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, BorderType, Borders, Widget},
};

use super::spectrum::Frame;

const BASE_COLOR: (u8, u8, u8) = (0, 242, 234);
const TOP_COLOR: (u8, u8, u8) = (255, 0, 85);

/// Scaled magnitude that fills the whole bar area.
const FULL_SCALE: f32 = 255.0 * 2.0;

const EIGHTHS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Width in cells of each bar, before the one-cell gap.
///
/// Bars are wider than one bin per column, so only the lower part of the
/// spectrum fits; the high bins are mostly empty anyway.
pub fn bar_width(area_width: u16, bins: usize) -> u16 {
    if bins == 0 {
        return 1;
    }
    ((area_width as f32 * 2.5 / bins as f32).floor() as u16).max(1)
}

/// Bar height in eighths of a cell for magnitude `value`.
pub fn bar_eighths(value: u8, height_scale: f32, rows: u16) -> u32 {
    let frac = (value as f32 * height_scale / FULL_SCALE).clamp(0.0, 1.0);
    (frac * rows as f32 * 8.0).round() as u32
}

/// Color at `t` in `[0, 1]` between the base and top of a bar.
pub fn gradient(t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    let lerp = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
    Color::Rgb(
        lerp(BASE_COLOR.0, TOP_COLOR.0),
        lerp(BASE_COLOR.1, TOP_COLOR.1),
        lerp(BASE_COLOR.2, TOP_COLOR.2),
    )
}

/// Bar chart of one [`Frame`], with a dimmed reflection cell above each bar.
pub struct SpectrumWidget<'a> {
    frame: Option<&'a Frame>,
    height_scale: f32,
    block: Option<Block<'a>>,
}

impl<'a> SpectrumWidget<'a> {
    pub fn new(frame: Option<&'a Frame>, height_scale: f32) -> Self {
        Self {
            frame,
            height_scale,
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }
}

impl Widget for SpectrumWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = match self.block {
            Some(block) => {
                let inner = block.inner(area);
                block.render(area, buf);
                inner
            }
            None => area,
        };
        if inner.width == 0 || inner.height == 0 {
            return;
        }
        let Some(frame) = self.frame else {
            return;
        };

        let rows = inner.height;
        let width = bar_width(inner.width, frame.bins.len());
        let bottom = inner.y + rows - 1;

        let mut x = inner.x;
        for &value in &frame.bins {
            if x >= inner.right() {
                break;
            }
            let eighths = bar_eighths(value, self.height_scale, rows);
            let full = (eighths / 8) as u16;
            let partial = (eighths % 8) as usize;
            let drawn = full + u16::from(partial > 0);

            for dx in 0..width {
                let cx = x + dx;
                if cx >= inner.right() {
                    break;
                }
                for row in 0..drawn {
                    let y = bottom - row;
                    let ch = if row < full { '█' } else { EIGHTHS[partial - 1] };
                    let t = row as f32 / (rows.max(2) - 1) as f32;
                    buf[(cx, y)].set_char(ch).set_fg(gradient(t));
                }
                if drawn > 0 && drawn < rows {
                    let y = bottom - drawn;
                    let t = drawn as f32 / (rows.max(2) - 1) as f32;
                    buf[(cx, y)]
                        .set_char('▁')
                        .set_style(Style::default().fg(gradient(t)).add_modifier(Modifier::DIM));
                }
            }

            x = x.saturating_add(width + 1);
        }
    }
}

/// Centered sub-rectangle of `area` for a cover at `scale`, where `max_scale` fills `area`.
pub fn cover_rect(area: Rect, scale: f32, max_scale: f32) -> Rect {
    let ratio = if max_scale > 0.0 {
        (scale / max_scale).clamp(0.0, 1.0)
    } else {
        1.0
    };
    let w = ((area.width as f32 * ratio).round() as u16).min(area.width);
    let h = ((area.height as f32 * ratio).round() as u16).min(area.height);
    Rect {
        x: area.x + (area.width - w) / 2,
        y: area.y + (area.height - h) / 2,
        width: w,
        height: h,
    }
}

/// The "album art" box: a note glyph inside a rounded border that pulses with the music.
pub struct CoverWidget {
    scale: f32,
    max_scale: f32,
}

impl CoverWidget {
    pub fn new(scale: f32, max_scale: f32) -> Self {
        Self { scale, max_scale }
    }
}

impl Widget for CoverWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let rect = cover_rect(area, self.scale, self.max_scale);
        if rect.width < 3 || rect.height < 3 {
            return;
        }
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(gradient(1.0)));
        let inner = block.inner(rect);
        block.render(rect, buf);

        if inner.width > 0 && inner.height > 0 {
            let x = inner.x + inner.width / 2;
            let y = inner.y + inner.height / 2;
            buf[(x, y)].set_char('♫').set_fg(gradient(0.0));
        }
    }
}
