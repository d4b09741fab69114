//! Single-slot cache for the library snapshot.

use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::info;

use super::JsonStore;
use crate::types::LibrarySnapshot;

/// Key of the snapshot record inside the cache directory.
pub const SNAPSHOT_FILE: &str = "liked_tracks";

/// Holds at most one [`LibrarySnapshot`], checked for freshness on load.
#[derive(Debug, Clone)]
pub struct SnapshotCache {
    store: JsonStore,
    max_age: Duration,
}

impl SnapshotCache {
    /// Creates a snapshot cache in `cache_dir` with the given freshness window.
    pub fn new(cache_dir: &Path, max_age: Duration) -> Self {
        Self {
            store: JsonStore::new(cache_dir),
            max_age,
        }
    }

    /// Loads the stored snapshot without checking freshness.
    pub fn load(&self) -> Option<LibrarySnapshot> {
        self.store.load(SNAPSHOT_FILE)
    }

    /// Loads the stored snapshot if it is still fresh.
    pub fn load_fresh(&self) -> Option<LibrarySnapshot> {
        self.load_fresh_at(Utc::now())
    }

    /// Loads the stored snapshot if it is fresh at `now`.
    pub fn load_fresh_at(&self, now: DateTime<Utc>) -> Option<LibrarySnapshot> {
        let snapshot = self.load()?;
        if snapshot.is_fresh_at(now, self.max_age) {
            Some(snapshot)
        } else if snapshot.tracks.is_empty() {
            info!("Cached library snapshot is empty, fetching fresh data");
            None
        } else {
            info!(
                "Cached library snapshot from {} is stale, fetching fresh data",
                snapshot.timestamp.to_rfc3339()
            );
            None
        }
    }

    /// Replaces the stored snapshot. Returns true if it was persisted.
    pub fn save(&self, snapshot: &LibrarySnapshot) -> bool {
        let saved = self.store.save(SNAPSHOT_FILE, snapshot);
        if saved {
            info!(
                "Saved {} liked tracks to cache at {}",
                snapshot.tracks.len(),
                self.store.path_for(SNAPSHOT_FILE).display()
            );
        }
        saved
    }
}
