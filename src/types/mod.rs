//! Core types for bpm-playlist.
//!
//! This module re-exports the data types shared across the pipeline:
//! - [`TrackRecord`]: A normalized saved track from the library provider
//! - [`LibrarySnapshot`]: A timestamped list of saved tracks
//! - [`TempoRecord`]: A cached tempo lookup outcome for one track

mod snapshot;
mod tempo;
mod track;

// Re-export all types at the module level
pub use snapshot::{LibrarySnapshot, DEFAULT_SNAPSHOT_MAX_AGE};
pub use tempo::TempoRecord;
pub use track::{cache_key, TrackRecord};
