//! Track model and the import path into the store.
//!
//! `model` holds the `Track` value shared by the store, playlist and audio
//! thread, `display` derives the human-facing name from a file name and
//! `import` turns picked or dropped paths into stored tracks.

mod display;
pub mod import;
mod model;

pub use display::display_name;
pub use model::Track;
