use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::{self, Settings};

const LOG_FILE: &str = "spidey.log";
const LOG_ENV: &str = "SPIDEY_LOG";

/// Directory for the log file: next to the track store, else the data dir.
pub fn log_dir(settings: &Settings) -> Option<PathBuf> {
    config::resolve_store_path(settings)
        .and_then(|p| p.parent().map(Path::to_path_buf))
        .filter(|p| !p.as_os_str().is_empty())
        .or_else(config::default_data_dir)
}

/// Install the global subscriber writing to `spidey.log`.
///
/// The terminal belongs to the UI, so nothing is ever written to stdout or
/// stderr. Returns the log path, or `None` when logging stays disabled.
pub fn init(settings: &Settings) -> Option<PathBuf> {
    let dir = log_dir(settings)?;
    fs::create_dir_all(&dir).ok()?;
    let path = dir.join(LOG_FILE);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .ok()?;

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_env_filter(filter)
        .with_ansi(false)
        .try_init()
        .ok()?;

    Some(path)
}
