//! Emotune Server Library
//!
//! Emotion-driven music companion: frame classification, mood-based song
//! recommendations, wake-up alarms and MIDI generation behind an HTTP API.

pub mod alarms;
pub mod catalog_store;
pub mod classifier;
pub mod config;
pub mod emotion;
pub mod midi;
pub mod nudge;
pub mod pipeline;
pub mod recommendation;
pub mod server;
pub mod sqlite_persistence;
pub mod video;

#[cfg(test)]
mod test_utils;

// Re-export commonly used types for convenience
pub use catalog_store::{CatalogStore, SqliteCatalogStore};
pub use emotion::Emotion;
pub use server::{make_app, run_server, RequestsLoggingLevel, ServerState};
