//! Application module: exposes the session model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and holds the playlist, track
//! store, selection, prompts and notices.

mod model;

pub use model::*;

#[cfg(test)]
mod tests;
