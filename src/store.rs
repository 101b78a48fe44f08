//! Persistent track store.
//!
//! One SQLite database holding one table of `name -> (content, content_type)`
//! records. The schema is versioned through `PRAGMA user_version` and created
//! on first use.

mod error;
mod lazy;
mod sqlite;

pub use error::StoreError;
pub use lazy::LazyStore;
pub use sqlite::{SCHEMA_VERSION, TrackStore};

#[cfg(test)]
mod tests;
