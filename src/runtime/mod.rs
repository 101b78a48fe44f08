use std::env;
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use crate::audio::{AudioPlayer, PlaybackController};
use crate::mpris::ControlCmd;
use crate::visualizer::{SampleTap, Visualizer};

mod event_loop;
mod logging;
mod mpris_sync;
mod settings;
mod startup;


pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, fallback) = settings::load_settings();
    let log_path = logging::init(&settings);
    if let Some(reason) = fallback {
        warn!("{reason}");
    }
    info!(log = ?log_path, "spidey starting");

    let cli_paths: Vec<PathBuf> = env::args_os().skip(1).map(PathBuf::from).collect();

    let mut app = startup::build_app(&settings);

    // The tap holds a few windows so a late frame still finds enough samples.
    let tap = SampleTap::new(settings.visualizer.fft_size * 4);
    let (audio_player, audio_events) = AudioPlayer::new(tap.clone());
    let mut controller = PlaybackController::new(
        audio_player,
        Duration::from_secs(settings.controls.restart_threshold_secs),
    );
    startup::apply_playback_defaults(&mut controller, &settings);
    let mut visualizer = Visualizer::new(&settings.visualizer, tap);

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris = crate::mpris::spawn_mpris(control_tx);
    mpris.set_artist(&settings.ui.artist_text);

    startup::import_cli_paths(&mut app, &cli_paths, &settings);
    if let Err(e) = startup::load_first_if_idle(&mut app, &mut controller) {
        warn!(error = %e, "could not load the first track");
        app.set_status(e.to_string());
    }

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result: Result<(), Box<dyn std::error::Error>> = (|| {
        let mut state = event_loop::EventLoopState::default();

        event_loop::run(
            &mut terminal,
            &settings,
            &mut app,
            &mut controller,
            &audio_events,
            &mut visualizer,
            &mpris,
            &control_rx,
            &mut state,
        )
    })();

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    controller
        .output()
        .quit_softly(Duration::from_millis(settings.audio.quit_fade_out_ms));
    info!("spidey stopped");

    run_result
}
