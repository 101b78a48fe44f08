use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use ratatui::layout::Rect;
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{debug, warn};

use crate::app::{App, InputMode};
use crate::audio::{AudioError, AudioEvent, AudioOutput, PlaybackController};
use crate::config;
use crate::library::import::parse_path_list;
use crate::mpris::{ControlCmd, MprisHandle};
use crate::runtime::mpris_sync::{MprisSnapshot, snapshot, update_mpris};
use crate::runtime::startup::load_first_if_idle;
use crate::ui::{self, NowPlaying};
use crate::visualizer::Visualizer;

/// State tracked by the runtime event loop across iterations.
#[derive(Debug, Default)]
pub struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
    /// Last playback snapshot emitted to MPRIS.
    last_mpris: Option<MprisSnapshot>,
    /// Track the selection last followed, so it only jumps on track changes.
    last_followed: Option<String>,
    /// Terminal area of the last draw, for mouse hit-testing.
    screen: Rect,
}

/// Whether the loop should keep going after handling an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Main terminal event loop: drains audio and MPRIS events, ticks the
/// visualizer, draws and handles input. Returns `Ok(())` when shutdown is
/// requested.
#[allow(clippy::too_many_arguments)]
pub fn run<O: AudioOutput>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    controller: &mut PlaybackController<O>,
    audio_events: &mpsc::Receiver<AudioEvent>,
    visualizer: &mut Visualizer,
    mpris: &MprisHandle,
    control_rx: &mpsc::Receiver<ControlCmd>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    let frame_interval = Duration::from_millis(settings.visualizer.frame_interval_ms);

    loop {
        while let Ok(ev) = audio_events.try_recv() {
            handle_audio_event(ev, app, controller);
        }

        while let Ok(cmd) = control_rx.try_recv() {
            if handle_control_cmd(cmd, app, controller) == Flow::Quit {
                return Ok(());
            }
        }

        sync_visualizer(controller, visualizer);
        visualizer.tick();

        follow_loaded_track(app, controller, state);

        let info = controller.info();
        let seen = snapshot(&info, controller.state());
        if state.last_mpris.as_ref() != Some(&seen) {
            update_mpris(mpris, app, &info, controller.state());
            state.last_mpris = Some(seen);
        }

        let now = NowPlaying {
            info: &info,
            state: controller.state(),
            shuffle: controller.shuffle(),
            repeat: controller.repeat(),
            spectrum: visualizer.frame(),
        };
        let screen = &mut state.screen;
        terminal.draw(|f| {
            *screen = f.area();
            ui::draw(f, app, &now, settings);
        })?;

        if !event::poll(frame_interval)? {
            continue;
        }
        let flow = match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                handle_key_event(key, settings, app, controller, state)
            }
            Event::Paste(text) => {
                handle_paste(&text, settings, app, controller);
                Flow::Continue
            }
            Event::Mouse(mouse) => {
                handle_mouse(mouse, app, controller, state.screen);
                Flow::Continue
            }
            _ => Flow::Continue,
        };
        if flow == Flow::Quit {
            return Ok(());
        }
        // A pause stops frames before the next tick.
        sync_visualizer(controller, visualizer);
    }
}

/// Run the visualizer exactly while audio is meant to be playing.
pub fn sync_visualizer<O: AudioOutput>(
    controller: &PlaybackController<O>,
    visualizer: &mut Visualizer,
) {
    match (controller.is_playing(), visualizer.is_running()) {
        (true, false) => visualizer.start(),
        (false, true) => visualizer.stop(),
        _ => {}
    }
}

fn follow_loaded_track<O: AudioOutput>(
    app: &mut App,
    controller: &PlaybackController<O>,
    state: &mut EventLoopState,
) {
    let loaded = controller.loaded();
    if loaded == state.last_followed.as_deref() {
        return;
    }
    state.last_followed = loaded.map(str::to_string);
    if let Some(index) = loaded.and_then(|name| app.playlist.position_of(name)) {
        app.follow(index);
    }
}

/// Show a failed transport operation in the status line.
fn report(app: &mut App, result: Result<(), AudioError>) {
    match result {
        Ok(()) => {}
        Err(e) => {
            warn!(error = %e, "playback command failed");
            app.set_status(e.to_string());
        }
    }
}

pub fn handle_audio_event<O: AudioOutput>(
    ev: AudioEvent,
    app: &mut App,
    controller: &mut PlaybackController<O>,
) {
    match ev {
        AudioEvent::Ended { name } => {
            debug!(%name, "track ended");
            let result = controller.on_ended(&mut app.playlist, &name);
            report(app, result);
        }
        AudioEvent::LoadFailed { name, reason } => {
            controller.on_load_failed(&mut app.playlist, &name);
            app.set_status(format!("Could not play {name}: {reason}"));
        }
        AudioEvent::PlayFailed { reason } => {
            controller.on_play_failed();
            app.set_status(format!("Playback failed: {reason}"));
        }
    }
}

pub fn handle_control_cmd<O: AudioOutput>(
    cmd: ControlCmd,
    app: &mut App,
    controller: &mut PlaybackController<O>,
) -> Flow {
    let result = match cmd {
        ControlCmd::Quit => return Flow::Quit,
        ControlCmd::Play if controller.loaded().is_some() => controller.play(),
        ControlCmd::Play | ControlCmd::PlayPause => controller.toggle_play(&mut app.playlist),
        ControlCmd::Pause => controller.pause(),
        ControlCmd::Stop => controller.stop(),
        ControlCmd::Next => controller.next(&mut app.playlist),
        ControlCmd::Prev => controller.prev(&mut app.playlist),
    };
    report(app, result);
    Flow::Continue
}

pub fn handle_key_event<O: AudioOutput>(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    controller: &mut PlaybackController<O>,
    state: &mut EventLoopState,
) -> Flow {
    // A notice blocks everything until it is acknowledged.
    if app.notice().is_some() {
        state.pending_gg = false;
        if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
            app.dismiss_notice();
        }
        return Flow::Continue;
    }

    match app.mode {
        InputMode::Search => {
            state.pending_gg = false;
            handle_search_key(key, app, controller);
            Flow::Continue
        }
        InputMode::Import => {
            state.pending_gg = false;
            handle_import_key(key, settings, app, controller);
            Flow::Continue
        }
        InputMode::Normal => handle_normal_key(key, settings, app, controller, state),
    }
}

fn handle_search_key<O: AudioOutput>(
    key: KeyEvent,
    app: &mut App,
    controller: &mut PlaybackController<O>,
) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => app.clear_filter(),
        KeyCode::Backspace => app.pop_filter_char(),
        KeyCode::Down => app.next(),
        KeyCode::Up => app.prev(),
        KeyCode::Char('j') | KeyCode::Char('n') if ctrl => app.next(),
        KeyCode::Char('k') | KeyCode::Char('p') if ctrl => app.prev(),
        KeyCode::Char(c) if !c.is_control() => app.push_filter_char(c),
        KeyCode::Enter => {
            if app.display_indices().is_empty() {
                return;
            }
            app.exit_search_mode();
            play_selected(app, controller);
        }
        _ => {}
    }
}

fn handle_import_key<O: AudioOutput>(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    controller: &mut PlaybackController<O>,
) {
    match key.code {
        KeyCode::Esc => app.cancel_import(),
        KeyCode::Backspace => {
            app.import_input.pop();
        }
        KeyCode::Char(c) if !c.is_control() => app.import_input.push(c),
        KeyCode::Enter => {
            let input = app.take_import_input();
            import_text(&input, settings, app, controller);
        }
        _ => {}
    }
}

fn handle_normal_key<O: AudioOutput>(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    controller: &mut PlaybackController<O>,
    state: &mut EventLoopState,
) -> Flow {
    let gg = std::mem::take(&mut state.pending_gg);
    let scrub = settings.controls.scrub_seconds.min(i64::MAX as u64) as i64;

    let result = match key.code {
        KeyCode::Char('q') => return Flow::Quit,
        KeyCode::Char(' ') | KeyCode::Char('p') => controller.toggle_play(&mut app.playlist),
        KeyCode::Right => controller.seek_by(scrub),
        KeyCode::Left => controller.seek_by(-scrub),
        KeyCode::Char('l') => controller.next(&mut app.playlist),
        KeyCode::Char('h') => controller.prev(&mut app.playlist),
        KeyCode::Char('s') => {
            let on = controller.toggle_shuffle();
            debug!(on, "shuffle toggled");
            Ok(())
        }
        KeyCode::Char('r') => {
            let on = controller.toggle_repeat();
            debug!(on, "repeat toggled");
            Ok(())
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.next();
            Ok(())
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.prev();
            Ok(())
        }
        KeyCode::Char('g') => {
            if gg {
                app.select_first();
            } else {
                state.pending_gg = true;
            }
            Ok(())
        }
        KeyCode::Char('G') => {
            app.select_last();
            Ok(())
        }
        KeyCode::Enter => {
            play_selected(app, controller);
            Ok(())
        }
        KeyCode::Char('/') => {
            app.enter_search_mode();
            Ok(())
        }
        KeyCode::Char('i') => {
            app.enter_import_mode();
            Ok(())
        }
        KeyCode::Char('v') => {
            app.toggle_playlist();
            Ok(())
        }
        KeyCode::Esc => {
            app.clear_filter();
            app.clear_status();
            Ok(())
        }
        _ => Ok(()),
    };
    report(app, result);
    Flow::Continue
}

/// Play the highlighted row from the start, even if it is the one playing.
fn play_selected<O: AudioOutput>(app: &mut App, controller: &mut PlaybackController<O>) {
    if !app.has_tracks() {
        return;
    }
    let selected = app.selected;
    let result = controller.load_track(&mut app.playlist, selected, true);
    if result.is_ok() {
        app.clear_status();
    }
    report(app, result);
}

/// Bracketed paste, which is also how terminals deliver dropped files.
pub fn handle_paste<O: AudioOutput>(
    text: &str,
    settings: &config::Settings,
    app: &mut App,
    controller: &mut PlaybackController<O>,
) {
    if app.notice().is_some() {
        return;
    }
    match app.mode {
        InputMode::Import => app.import_input.push_str(text.trim_end()),
        InputMode::Search => {}
        InputMode::Normal => import_text(text, settings, app, controller),
    }
}

fn import_text<O: AudioOutput>(
    text: &str,
    settings: &config::Settings,
    app: &mut App,
    controller: &mut PlaybackController<O>,
) {
    let paths = parse_path_list(text);
    if paths.is_empty() {
        return;
    }
    let imported = app.import_paths(&paths, &settings.import);
    if imported.reload.is_some() {
        let result = load_first_if_idle(app, controller);
        report(app, result);
    }
}

fn handle_mouse<O: AudioOutput>(
    mouse: MouseEvent,
    app: &mut App,
    controller: &mut PlaybackController<O>,
    screen: Rect,
) {
    if app.notice().is_some() || app.mode == InputMode::Import {
        return;
    }
    if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
        let areas = ui::layout(screen, app.show_playlist);
        if let Some(fraction) = ui::progress_fraction(areas.progress, mouse.column, mouse.row) {
            let result = controller.seek_fraction(fraction);
            report(app, result);
        }
    }
}
