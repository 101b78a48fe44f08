//! Import of picked or dropped files into the track store.
//!
//! Paths arrive as free text (import prompt, CLI arguments, or a terminal
//! paste produced by dragging files onto the window). They are expanded into
//! audio candidates, split against the current playlist by name, and the new
//! ones are written to the store before the playlist is reloaded from it.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

use crate::config::ImportSettings;
use crate::playlist::{Playlist, ReloadOutcome};
use crate::store::{LazyStore, StoreError};

use super::model::Track;

/// How many duplicate names a notice lists before eliding the rest.
const NOTICE_NAME_LIMIT: usize = 5;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A file accepted for import, not read yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub name: String,
    pub path: PathBuf,
    pub content_type: &'static str,
}

/// Candidates split against the playlist.
#[derive(Debug, Default)]
pub struct Partition {
    pub fresh: Vec<Candidate>,
    pub duplicates: Vec<String>,
}

/// What an import did, for the caller to show and act on.
#[derive(Debug, Default)]
pub struct ImportReport {
    pub saved: usize,
    pub duplicates: Vec<String>,
    /// Blocking notices, in the order they should be shown.
    pub notices: Vec<String>,
    /// Set when the playlist was reloaded from the store.
    pub reload: Option<ReloadOutcome>,
}

/// Map a file extension to the `audio/*` content type recorded with the track.
fn known_content_type(ext: &str) -> Option<&'static str> {
    let ct = match ext {
        "mp3" => "audio/mpeg",
        "flac" => "audio/flac",
        "wav" | "wave" => "audio/wav",
        "ogg" | "oga" | "opus" => "audio/ogg",
        "m4a" | "mp4" => "audio/mp4",
        "aac" => "audio/aac",
        "aif" | "aiff" => "audio/aiff",
        "webm" => "audio/webm",
        _ => return None,
    };
    Some(ct)
}

/// Content type for `path` when its extension is both configured and a known audio type.
pub fn content_type_for(path: &Path, settings: &ImportSettings) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let allowed = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .any(|e| e == ext);
    if allowed { known_content_type(&ext) } else { None }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Split free text into paths.
///
/// Accepts what terminals paste for dropped files: single- or double-quoted
/// paths, backslash-escaped spaces, and `file://` URIs, separated by
/// whitespace or newlines. Text that names an existing path as a whole is
/// taken verbatim so typed paths with spaces need no quoting.
pub fn parse_path_list(input: &str) -> Vec<PathBuf> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    if Path::new(trimmed).exists() {
        return vec![PathBuf::from(trimmed)];
    }

    let mut out = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quote: Option<char> = None;
    let mut chars = trimmed.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), c) => current.push(c),
            (None, '\'' | '"') => {
                quote = Some(c);
                in_token = true;
            }
            (None, '\\') => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
                in_token = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_token {
                    out.push(token_to_path(&current));
                    current.clear();
                    in_token = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_token = true;
            }
        }
    }
    if in_token {
        out.push(token_to_path(&current));
    }
    out
}

fn token_to_path(token: &str) -> PathBuf {
    match token.strip_prefix("file://") {
        Some(rest) => PathBuf::from(percent_decode(rest)),
        None => PathBuf::from(token),
    }
}

fn percent_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).ok();
            if let Some(b) = hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                out.push(b);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn candidate_for(path: &Path, settings: &ImportSettings) -> Option<Candidate> {
    let content_type = content_type_for(path, settings)?;
    let name = path.file_name()?.to_str()?.to_string();
    Some(Candidate {
        name,
        path: path.to_path_buf(),
        content_type,
    })
}

/// Expand files and directories into audio candidates.
///
/// Directories are walked recursively; anything without an audio content
/// type is skipped, as are missing paths.
pub fn collect_candidates(paths: &[PathBuf], settings: &ImportSettings) -> Vec<Candidate> {
    let mut seen: HashSet<PathBuf> = HashSet::new();
    let mut out = Vec::new();

    for path in paths {
        if path.is_dir() {
            for entry in WalkDir::new(path)
                .follow_links(settings.follow_links)
                .into_iter()
                .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
                .filter_map(Result::ok)
            {
                let p = entry.path();
                if p.is_file() && seen.insert(p.to_path_buf()) {
                    if let Some(c) = candidate_for(p, settings) {
                        out.push(c);
                    }
                }
            }
        } else if path.is_file() {
            if seen.insert(path.clone()) {
                match candidate_for(path, settings) {
                    Some(c) => out.push(c),
                    None => debug!(path = %path.display(), "skipping non-audio file"),
                }
            }
        } else {
            warn!(path = %path.display(), "import path does not exist");
        }
    }

    out
}

/// Split `candidates` into names already in `playlist` and new files.
pub fn partition(candidates: Vec<Candidate>, playlist: &Playlist) -> Partition {
    let mut part = Partition::default();
    for c in candidates {
        if playlist.contains_name(&c.name) {
            part.duplicates.push(c.name);
        } else {
            part.fresh.push(c);
        }
    }
    part
}

fn list_names(names: &[String]) -> String {
    let mut text = names
        .iter()
        .take(NOTICE_NAME_LIMIT)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("\n");
    if names.len() > NOTICE_NAME_LIMIT {
        text.push_str("\n...");
    }
    text
}

/// Notice text for skipped duplicates.
pub fn duplicate_notice(duplicates: &[String], nothing_new: bool) -> String {
    if nothing_new {
        format!(
            "All selected songs are already in the playlist:\n{}",
            list_names(duplicates)
        )
    } else {
        format!(
            "Skipping {} duplicate songs:\n{}",
            duplicates.len(),
            list_names(duplicates)
        )
    }
}

fn read_tracks(fresh: &[Candidate]) -> Result<Vec<Track>, ImportError> {
    fresh
        .iter()
        .map(|c| {
            let bytes = fs::read(&c.path).map_err(|source| ImportError::Read {
                path: c.path.clone(),
                source,
            })?;
            Ok(Track::new(c.name.clone(), c.content_type, bytes))
        })
        .collect()
}

fn persist(fresh: &[Candidate], store: &mut LazyStore) -> Result<usize, ImportError> {
    let tracks = read_tracks(fresh)?;
    let saved = store.get()?.put_all(&tracks)?;
    Ok(saved)
}

/// Persist the new candidates and reload `playlist` from the store.
///
/// Duplicates (by name, against the playlist as it is now) are never
/// written. Every write completes before the reload. A failed write leaves
/// the playlist as it was and reports a notice; a failed reload is only
/// logged.
pub fn ingest(
    candidates: Vec<Candidate>,
    playlist: &mut Playlist,
    store: &mut LazyStore,
) -> ImportReport {
    let mut report = ImportReport::default();
    if candidates.is_empty() {
        return report;
    }

    let Partition { fresh, duplicates } = partition(candidates, playlist);
    if !duplicates.is_empty() {
        report.notices.push(duplicate_notice(&duplicates, fresh.is_empty()));
    }
    report.duplicates = duplicates;
    if fresh.is_empty() {
        return report;
    }

    match persist(&fresh, store) {
        Ok(saved) => {
            let total = store.get().and_then(|s| s.len()).ok();
            info!(saved, ?total, "saved songs to the track store");
            report.saved = saved;
            report.notices.push(format!("Successfully saved {saved} songs!"));
        }
        Err(e) => {
            error!(error = %e, "error saving songs");
            report.notices.push("Error saving songs.".to_string());
            return report;
        }
    }

    match store.get().and_then(|s| s.get_all()) {
        Ok(tracks) => report.reload = Some(playlist.reload(tracks)),
        Err(e) => error!(error = %e, "error fetching songs from the track store"),
    }

    report
}
