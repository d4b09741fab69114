//! Cache module for on-disk JSON records.
//!
//! Provides the atomic JSON store and the two cache domains built on it:
//! the single-slot library snapshot and the per-track tempo records.

pub mod snapshot;
pub mod store;
pub mod tempo;

// Re-export commonly used types
pub use snapshot::{SnapshotCache, SNAPSHOT_FILE};
pub use store::JsonStore;
pub use tempo::{TempoCache, TEMPO_DIR};
