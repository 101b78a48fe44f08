use std::path::PathBuf;

use tracing::warn;

use super::error::StoreError;
use super::sqlite::TrackStore;

/// A track store that is opened on first use.
///
/// A failed open is not remembered: the next `get` tries again, so an import
/// can still succeed after the startup load could not reach the database.
pub struct LazyStore {
    path: Option<PathBuf>,
    store: Option<TrackStore>,
}

impl LazyStore {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path, store: None }
    }

    /// Wrap an already opened store.
    #[cfg(test)]
    pub fn from_store(store: TrackStore) -> Self {
        Self {
            path: None,
            store: Some(store),
        }
    }

    pub fn path(&self) -> Option<&PathBuf> {
        self.path.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.store.is_some()
    }

    pub fn get(&mut self) -> Result<&mut TrackStore, StoreError> {
        if self.store.is_none() {
            let path = self.path.as_ref().ok_or(StoreError::NoLocation)?;
            match TrackStore::open(path) {
                Ok(s) => self.store = Some(s),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to open track store");
                    return Err(e);
                }
            }
        }
        self.store.as_mut().ok_or(StoreError::NoLocation)
    }
}
