//! The in-memory playlist and its rendered rows.
//!
//! `Playlist` mirrors the track store and carries the current-track cursor;
//! `render` turns it (optionally filtered) into the rows the UI draws.

mod model;
mod render;

pub use model::{Playlist, ReloadOutcome};
pub use render::{PLACEHOLDER, PlaylistRow, matches_filter, render_rows};

#[cfg(test)]
mod tests;
