use std::fs;
use std::path::Path;
use std::sync::Arc;

use rusqlite::{Connection, params};
use tracing::{debug, info};

use crate::library::Track;

use super::error::StoreError;

/// Schema version written to `PRAGMA user_version`.
pub const SCHEMA_VERSION: i64 = 1;

const CREATE_TABLES_V1: &str = r"
    CREATE TABLE IF NOT EXISTS tracks(
        name TEXT PRIMARY KEY,
        content BLOB NOT NULL,
        content_type TEXT NOT NULL
    );
";

const PUT_TRACK: &str = "
    INSERT OR REPLACE INTO tracks (name, content, content_type) VALUES (?1, ?2, ?3)
";

const GET_ALL_TRACKS: &str = "
    SELECT name, content, content_type FROM tracks ORDER BY name
";

const COUNT_TRACKS: &str = "SELECT COUNT(*) FROM tracks";

pub struct TrackStore {
    conn: Connection,
}

impl TrackStore {
    /// Open (creating if needed) the database at `path`.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|source| StoreError::CreateDir {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let conn = Connection::open(path)?;
        let mut store = TrackStore { conn };
        store.migrate()?;
        info!(path = %path.display(), "opened track store");
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let mut store = TrackStore { conn };
        store.migrate()?;
        Ok(store)
    }

    pub fn schema_version(&self) -> Result<i64, StoreError> {
        let v = self
            .conn
            .pragma_query_value(None, "user_version", |row| row.get(0))?;
        Ok(v)
    }

    fn migrate(&mut self) -> Result<(), StoreError> {
        let found = self.schema_version()?;
        if found > SCHEMA_VERSION {
            return Err(StoreError::UnsupportedSchema {
                found,
                supported: SCHEMA_VERSION,
            });
        }
        if found == SCHEMA_VERSION {
            return Ok(());
        }

        debug!(from = found, to = SCHEMA_VERSION, "creating track store schema");
        let tx = self.conn.transaction()?;
        tx.execute_batch(CREATE_TABLES_V1)?;
        tx.pragma_update(None, "user_version", SCHEMA_VERSION)?;
        tx.commit()?;
        Ok(())
    }

    /// Upsert one track by name.
    #[cfg(test)]
    pub fn put(&self, track: &Track) -> Result<(), StoreError> {
        self.conn.execute(
            PUT_TRACK,
            params![track.name, &track.content[..], track.content_type],
        )?;
        Ok(())
    }

    /// Upsert every track in one transaction. Nothing is written if any insert fails.
    pub fn put_all(&mut self, tracks: &[Track]) -> Result<usize, StoreError> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare_cached(PUT_TRACK)?;
            for track in tracks {
                stmt.execute(params![track.name, &track.content[..], track.content_type])?;
            }
        }
        tx.commit()?;
        Ok(tracks.len())
    }

    /// Every stored track, ordered by name.
    pub fn get_all(&self) -> Result<Vec<Track>, StoreError> {
        let mut stmt = self.conn.prepare(GET_ALL_TRACKS)?;
        let tracks = stmt
            .query_map([], |row| {
                let name: String = row.get(0)?;
                let content: Vec<u8> = row.get(1)?;
                let content_type: String = row.get(2)?;
                Ok(Track::new(name, content_type, Arc::<[u8]>::from(content)))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tracks)
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        let n: i64 = self.conn.query_row(COUNT_TRACKS, [], |row| row.get(0))?;
        Ok(n.max(0) as usize)
    }
}
