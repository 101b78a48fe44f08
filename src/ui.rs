//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`. The
//! screen geometry comes from [`layout`], which the event loop also uses to
//! map mouse clicks onto the progress bar.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock, time::Duration};

use crate::app::{App, InputMode};
use crate::audio::{PlaybackInfo, PlaybackState};
use crate::config::Settings;
use crate::playlist::{PLACEHOLDER, PlaylistRow};
use crate::visualizer::{CoverWidget, Frame as SpectrumFrame, SpectrumWidget};

const ACCENT: Color = Color::Rgb(0, 242, 234);
const HOT: Color = Color::Rgb(255, 0, 85);

static CONTROLS_MAP: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut map = BTreeMap::new();
    map.insert("space/p", "play/pause");
    map.insert("h/l", "prev/next song");
    // ←/→ is filled dynamically from config.
    map.insert("j/k", "up/down");
    map.insert("gg/G", "top/bottom");
    map.insert("enter", "play selected song");
    map.insert("/", "search");
    map.insert("i", "import");
    map.insert("s", "shuffle");
    map.insert("r", "repeat");
    map.insert("v", "playlist");
    map.insert("q", "quit");
    map
});

/// Render the controls help text, incorporating scrub seconds.
fn controls_text(scrub_seconds: u64) -> String {
    // Keep the rendered order stable and human-friendly.
    let order = [
        "space/p", "h/l", "←/→", "j/k", "enter", "gg/G", "/", "i", "s", "r", "v", "q",
    ];
    order
        .iter()
        .filter_map(|k| {
            if *k == "←/→" {
                Some(format!("[←/→] seek -/+{}s", scrub_seconds))
            } else {
                CONTROLS_MAP.get(*k).map(|v| format!("[{}] {}", k, v))
            }
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Format a duration as `m:ss`; unknown durations show as `0:00`.
pub fn format_time(d: Option<Duration>) -> String {
    let secs = d.map_or(0, |d| d.as_secs());
    format!("{}:{:02}", secs / 60, secs % 60)
}

fn now_playing_block() -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .title(" now playing ")
        .padding(Padding::horizontal(1))
}

/// Screen regions, shared by drawing and mouse hit-testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Areas {
    pub header: Rect,
    pub cover: Rect,
    pub visualizer: Rect,
    pub playlist: Option<Rect>,
    pub now_playing: Rect,
    /// The one-row progress bar inside the now-playing box.
    pub progress: Rect,
    pub footer: Rect,
}

pub fn layout(area: Rect, show_playlist: bool) -> Areas {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(6),
            Constraint::Length(6),
            Constraint::Length(4),
        ])
        .split(area);

    let (player, playlist) = if show_playlist {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(rows[1]);
        (cols[0], Some(cols[1]))
    } else {
        (rows[1], None)
    };

    let stage = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(45), Constraint::Min(3)])
        .split(player);

    let now_inner = now_playing_block().inner(rows[2]);
    let progress = Rect {
        x: now_inner.x,
        y: now_inner.y.saturating_add(2),
        width: now_inner.width,
        height: now_inner.height.saturating_sub(2).min(1),
    };

    Areas {
        header: rows[0],
        cover: stage[0],
        visualizer: stage[1],
        playlist,
        now_playing: rows[2],
        progress,
        footer: rows[3],
    }
}

/// Fraction of the progress bar under a click at (`column`, `row`), if it hit the bar.
pub fn progress_fraction(progress: Rect, column: u16, row: u16) -> Option<f64> {
    if progress.width == 0 || row != progress.y {
        return None;
    }
    if column < progress.x || column >= progress.right() {
        return None;
    }
    Some((column - progress.x) as f64 / progress.width as f64)
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    // Keep the popup smaller and avoid covering the entire UI.
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width: width.min(r.width),
        height: height.min(r.height),
    }
}

/// Audio-side state the UI shows next to the session.
pub struct NowPlaying<'a> {
    pub info: &'a PlaybackInfo,
    pub state: PlaybackState,
    pub shuffle: bool,
    pub repeat: bool,
    pub spectrum: Option<&'a SpectrumFrame>,
}

fn row_item(row: &PlaylistRow) -> ListItem<'static> {
    let mut spans = vec![Span::styled(
        format!("{:>3}  ", row.number),
        Style::default().fg(Color::DarkGray),
    )];

    let base = if row.current {
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    match row.highlight.clone() {
        Some(range) => {
            spans.push(Span::styled(row.name[..range.start].to_string(), base));
            spans.push(Span::styled(
                row.name[range.clone()].to_string(),
                base.fg(HOT).add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled(row.name[range.end..].to_string(), base));
        }
        None => spans.push(Span::styled(row.name.clone(), base)),
    }
    if row.current {
        spans.push(Span::styled("  ♪", Style::default().fg(ACCENT)));
    }
    ListItem::new(Line::from(spans))
}

fn draw_playlist(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" playlist ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if !app.has_tracks() {
        let mut lines = vec![Line::default(); (inner.height / 2).saturating_sub(1) as usize];
        lines.push(Line::from(PLACEHOLDER[0]).fg(Color::Gray));
        lines.push(Line::from(PLACEHOLDER[1]).fg(Color::DarkGray));
        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
        return;
    }

    let q = app.filter_query.trim();
    let searching = app.mode == InputMode::Search;
    let list_area = if searching || !q.is_empty() {
        let parts = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(inner);
        let cursor = if searching { "_" } else { "" };
        let search = Paragraph::new(Line::from(vec![
            Span::styled("/ ", Style::default().fg(ACCENT)),
            Span::raw(format!("{}{}", app.filter_query, cursor)),
        ]));
        frame.render_widget(search, parts[0]);
        parts[1]
    } else {
        inner
    };

    let rows = app.rows();
    if rows.is_empty() {
        frame.render_widget(
            Paragraph::new("No matches").alignment(Alignment::Center).fg(Color::DarkGray),
            list_area,
        );
        return;
    }

    // Center the selected item when possible by creating a visible window.
    // Only build ListItems for the visible window.
    let total = rows.len();
    let list_height = list_area.height as usize;
    let sel_pos = rows.iter().position(|r| r.index == app.selected).unwrap_or(0);
    let (start, end, selected_pos_in_visible) = if total <= list_height || list_height == 0 {
        (0, total, sel_pos)
    } else {
        let half = list_height / 2;
        let mut start = sel_pos.saturating_sub(half);
        if start + list_height > total {
            start = total - list_height;
        }
        (start, start + list_height, sel_pos - start)
    };

    let items: Vec<ListItem> = rows[start..end].iter().map(row_item).collect();
    let list = List::new(items)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ratatui::widgets::ListState::default();
    state.select(Some(selected_pos_in_visible));
    frame.render_stateful_widget(list, list_area, &mut state);
}

fn draw_now_playing(frame: &mut Frame, app: &App, now: &NowPlaying, settings: &Settings, area: Rect) {
    let block = now_playing_block();
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1); 4])
        .split(inner);

    let title = now
        .info
        .name
        .as_deref()
        .and_then(|n| app.playlist.position_of(n))
        .and_then(|i| app.playlist.get(i))
        .map(|t| t.display.clone())
        .unwrap_or_else(|| "No song loaded".to_string());
    frame.render_widget(
        Paragraph::new(title).add_modifier(Modifier::BOLD),
        lines[0],
    );
    frame.render_widget(
        Paragraph::new(settings.ui.artist_text.as_str()).fg(Color::Gray),
        lines[1],
    );

    let ratio = match now.info.duration {
        Some(total) if !total.is_zero() => {
            (now.info.elapsed.as_secs_f64() / total.as_secs_f64()).clamp(0.0, 1.0)
        }
        _ => 0.0,
    };
    let label = format!(
        "{} / {}",
        format_time(Some(now.info.elapsed)),
        format_time(now.info.duration)
    );
    let gauge = Gauge::default()
        .ratio(ratio)
        .label(label)
        .gauge_style(Style::default().fg(ACCENT).bg(Color::Black));
    frame.render_widget(gauge, lines[2]);

    let state = match now.state {
        PlaybackState::Playing => "▶ Playing",
        PlaybackState::Paused => "⏸ Paused",
        PlaybackState::Stopped => "■ Stopped",
    };
    let mut spans = vec![
        Span::styled(state, Style::default().fg(ACCENT)),
        Span::raw(" • "),
        Span::raw(if now.shuffle { "Shuffle: ON" } else { "Shuffle: OFF" }),
        Span::raw(" • "),
        Span::raw(if now.repeat { "Repeat: ONE" } else { "Repeat: OFF" }),
    ];
    if let Some(status) = &app.status {
        spans.push(Span::raw(" • "));
        spans.push(Span::styled(status.clone(), Style::default().fg(HOT)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), lines[3]);
}

fn draw_notice(frame: &mut Frame, text: &str) {
    let area = frame.area();
    let lines = text.lines().count() as u16;
    let width = text.lines().map(|l| l.chars().count()).max().unwrap_or(0) as u16 + 6;
    let popup = centered_rect_sized(width.max(40), lines + 4, area);
    frame.render_widget(Clear, popup);
    let paragraph = Paragraph::new(text.to_string())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(HOT))
                .title(" notice (enter closes) ")
                .padding(Padding::uniform(1)),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, popup);
}

fn draw_import_prompt(frame: &mut Frame, input: &str) {
    let popup = centered_rect_sized(72, 6, frame.area());
    frame.render_widget(Clear, popup);
    let text = vec![
        Line::from("Files or folders to import (quote paths with spaces):").fg(Color::Gray),
        Line::from(format!("{}_", input)),
    ];
    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(ACCENT))
                .title(" import (enter imports, esc cancels) ")
                .padding(Padding::horizontal(1)),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, popup);
}

/// Render the entire UI into the provided `frame`.
pub fn draw(frame: &mut Frame, app: &App, now: &NowPlaying, settings: &Settings) {
    let areas = layout(frame.area(), app.show_playlist);

    // Header
    let header = Paragraph::new(settings.ui.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" spidey ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, areas.header);

    // Cover pulses with the average magnitude of the current frame.
    let pulse = settings.visualizer.pulse_factor;
    let scale = now.spectrum.map_or(1.0, |f| f.pulse_scale(pulse));
    frame.render_widget(CoverWidget::new(scale, 1.0 + pulse), areas.cover);

    let spectrum = SpectrumWidget::new(now.spectrum, settings.visualizer.height_scale)
        .block(Block::default().borders(Borders::ALL).title(" visualizer "));
    frame.render_widget(spectrum, areas.visualizer);

    if let Some(area) = areas.playlist {
        draw_playlist(frame, app, area);
    }

    draw_now_playing(frame, app, now, settings, areas.now_playing);

    let footer = Paragraph::new(controls_text(settings.controls.scrub_seconds))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, areas.footer);

    if app.mode == InputMode::Import {
        draw_import_prompt(frame, &app.import_input);
    }
    if let Some(text) = app.notice() {
        draw_notice(frame, text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::Track;
    use crate::playlist::Playlist;
    use crate::store::LazyStore;
    use ratatui::{Terminal, backend::TestBackend};

    #[test]
    fn format_time_is_minutes_and_padded_seconds() {
        assert_eq!(format_time(None), "0:00");
        assert_eq!(format_time(Some(Duration::from_secs(5))), "0:05");
        assert_eq!(format_time(Some(Duration::from_millis(65_900))), "1:05");
        assert_eq!(format_time(Some(Duration::from_secs(3600))), "60:00");
    }

    #[test]
    fn controls_text_mentions_scrub_step() {
        let text = controls_text(7);
        assert!(text.contains("[←/→] seek -/+7s"));
        assert!(text.starts_with("[space/p] play/pause"));
        assert!(text.ends_with("[q] quit"));
    }

    #[test]
    fn layout_drops_playlist_when_hidden() {
        let area = Rect::new(0, 0, 100, 40);
        let shown = layout(area, true);
        assert!(shown.playlist.is_some());
        assert!(shown.cover.width < area.width);

        let hidden = layout(area, false);
        assert!(hidden.playlist.is_none());
        assert_eq!(hidden.cover.width, area.width);
    }

    #[test]
    fn progress_bar_sits_inside_now_playing() {
        let areas = layout(Rect::new(0, 0, 100, 40), true);
        assert_eq!(areas.progress.height, 1);
        assert_eq!(areas.progress.y, areas.now_playing.y + 3);
        assert_eq!(areas.progress.x, areas.now_playing.x + 2);
        assert_eq!(areas.progress.width, areas.now_playing.width - 4);
    }

    fn screen_lines(app: &App) -> Vec<String> {
        let settings = Settings::default();
        let info = PlaybackInfo::default();
        let now = NowPlaying {
            info: &info,
            state: PlaybackState::Stopped,
            shuffle: false,
            repeat: false,
            spectrum: None,
        };
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal
            .draw(|frame| draw(frame, app, &now, &settings))
            .unwrap();
        let buf = terminal.backend().buffer();
        (0..buf.area.height)
            .map(|y| (0..buf.area.width).map(|x| buf[(x, y)].symbol()).collect())
            .collect()
    }

    #[test]
    fn empty_playlist_shows_the_drop_prompt() {
        let app = App::new(
            Playlist::default(),
            LazyStore::new(None),
            &Settings::default().ui,
        );
        let lines = screen_lines(&app);
        let first = lines.iter().position(|l| l.contains(PLACEHOLDER[0]));
        let second = lines.iter().position(|l| l.contains(PLACEHOLDER[1]));
        assert!(first.is_some(), "missing {:?}", PLACEHOLDER[0]);
        assert_eq!(second, first.map(|y| y + 1));
    }

    #[test]
    fn placeholder_gives_way_to_tracks() {
        let tracks = vec![Track::new("01 - Intro.mp3", "audio/mpeg", b"x".to_vec())];
        let app = App::new(
            Playlist::new(tracks),
            LazyStore::new(None),
            &Settings::default().ui,
        );
        let lines = screen_lines(&app);
        assert!(lines.iter().all(|l| !l.contains(PLACEHOLDER[0])));
        assert!(lines.iter().any(|l| l.contains("Intro")));
    }

    #[test]
    fn progress_fraction_maps_columns() {
        let bar = Rect::new(10, 5, 40, 1);
        assert_eq!(progress_fraction(bar, 10, 5), Some(0.0));
        assert_eq!(progress_fraction(bar, 30, 5), Some(0.5));
        assert_eq!(progress_fraction(bar, 9, 5), None);
        assert_eq!(progress_fraction(bar, 50, 5), None);
        assert_eq!(progress_fraction(bar, 30, 6), None);
    }
}
