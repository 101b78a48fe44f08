//! Configuration loader and schema types.
//!
//! This module exposes the configuration schema used to drive runtime
//! behavior and helpers to resolve the config, store and log locations.

mod load;
mod schema;

pub use load::{default_data_dir, resolve_store_path};
pub use schema::*;
