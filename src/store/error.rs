use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no location for the track store (set store.path, XDG_DATA_HOME or HOME)")]
    NoLocation,
    #[error("failed to create store directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("store schema version {found} is newer than supported version {supported}")]
    UnsupportedSchema { found: i64, supported: i64 },
    #[error("track store unavailable: {0}")]
    Sqlite(#[from] rusqlite::Error),
}
