//! Per-track tempo cache. Entries never expire.

use std::path::Path;

use super::JsonStore;
use crate::types::{cache_key, TempoRecord};

/// Subdirectory of the cache directory holding one file per track.
pub const TEMPO_DIR: &str = "bpm";

/// Maps track ids to [`TempoRecord`]s, one JSON file each.
#[derive(Debug, Clone)]
pub struct TempoCache {
    store: JsonStore,
}

impl TempoCache {
    /// Creates a tempo cache under `<cache_dir>/bpm`.
    pub fn new(cache_dir: &Path) -> Self {
        Self {
            store: JsonStore::new(cache_dir.join(TEMPO_DIR)),
        }
    }

    /// Returns the record for a track, if one was ever written.
    pub fn get(&self, track_id: &str) -> Option<TempoRecord> {
        self.store.load(&cache_key(track_id))
    }

    /// Stores the record for a track. Returns true if it was persisted.
    pub fn put(&self, track_id: &str, record: TempoRecord) -> bool {
        self.store.save(&cache_key(track_id), &record)
    }

    /// Returns true if a record file exists for the track.
    pub fn contains(&self, track_id: &str) -> bool {
        self.store.contains(&cache_key(track_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn negative_entry_is_distinct_from_missing() {
        let dir = tempdir().unwrap();
        let cache = TempoCache::new(dir.path());

        assert_eq!(cache.get("B"), None);
        cache.put("B", TempoRecord::not_found());
        assert_eq!(cache.get("B"), Some(TempoRecord::not_found()));
        assert!(cache.contains("B"));
    }

    #[test]
    fn found_entry_round_trips() {
        let dir = tempdir().unwrap();
        let cache = TempoCache::new(dir.path());
        cache.put("A", TempoRecord::found(180.0));
        assert_eq!(cache.get("A"), Some(TempoRecord::found(180.0)));
        assert!(dir.path().join("bpm").join("A.json").is_file());
    }

    #[test]
    fn record_without_bpm_key_is_a_miss() {
        let dir = tempdir().unwrap();
        let cache = TempoCache::new(dir.path());
        std::fs::create_dir_all(dir.path().join("bpm")).unwrap();
        std::fs::write(dir.path().join("bpm").join("C.json"), r#"{"tempo": 120}"#).unwrap();
        assert_eq!(cache.get("C"), None);
    }

    #[test]
    fn reads_files_written_by_older_versions() {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("bpm")).unwrap();
        std::fs::write(dir.path().join("bpm").join("D.json"), r#"{"bpm": 92.5}"#).unwrap();
        let cache = TempoCache::new(dir.path());
        assert_eq!(cache.get("D"), Some(TempoRecord::found(92.5)));
    }

    #[test]
    fn unsafe_ids_stay_inside_cache_dir() {
        let dir = tempdir().unwrap();
        let cache = TempoCache::new(dir.path());
        cache.put("../escape", TempoRecord::found(100.0));
        assert_eq!(cache.get("../escape"), Some(TempoRecord::found(100.0)));
        assert!(!dir.path().join("escape.json").exists());
    }
}
