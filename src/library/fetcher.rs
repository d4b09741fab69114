//! Snapshot-cached fetch of the full saved-track library.
//!
//! A fresh cached snapshot short-circuits the network entirely. Otherwise
//! the provider is paged until it reports no further page. A transport
//! error mid-way keeps what was collected and stops paging. Whatever was
//! fetched replaces the snapshot.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use super::provider::{LibraryProvider, DEFAULT_PAGE_SIZE};
use crate::cache::SnapshotCache;
use crate::types::{LibrarySnapshot, TrackRecord};

/// Result of a library fetch, by how the tracks were obtained.
#[derive(Debug, Clone, PartialEq)]
pub enum LibraryFetch {
    /// Served from a fresh cached snapshot; no network access.
    Cached(Vec<TrackRecord>),
    /// Every page was fetched; the snapshot cache was rewritten.
    Complete(Vec<TrackRecord>),
    /// Paging stopped on an error; holds the tracks fetched before it.
    /// The snapshot cache was rewritten with them.
    Partial(Vec<TrackRecord>),
}

impl LibraryFetch {
    /// Returns the fetched tracks.
    pub fn tracks(&self) -> &[TrackRecord] {
        match self {
            LibraryFetch::Cached(tracks)
            | LibraryFetch::Complete(tracks)
            | LibraryFetch::Partial(tracks) => tracks,
        }
    }

    /// Returns true if paging was cut short by an error.
    pub fn is_partial(&self) -> bool {
        matches!(self, LibraryFetch::Partial(_))
    }
}

/// Fetches the saved-track library through the snapshot cache.
pub struct LibraryFetcher {
    cache: SnapshotCache,
    page_size: u32,
}

impl LibraryFetcher {
    /// Creates a fetcher with the default page size.
    pub fn new(cache: SnapshotCache) -> Self {
        Self::with_page_size(cache, DEFAULT_PAGE_SIZE)
    }

    /// Creates a fetcher with a specific page size (at least 1).
    pub fn with_page_size(cache: SnapshotCache, page_size: u32) -> Self {
        Self {
            cache,
            page_size: page_size.max(1),
        }
    }

    /// Returns the saved tracks, from cache when fresh unless `refresh` is set.
    pub fn fetch<P>(&self, provider: &P, refresh: bool) -> LibraryFetch
    where
        P: LibraryProvider + ?Sized,
    {
        self.fetch_at(provider, refresh, Utc::now())
    }

    /// Like [`fetch`](Self::fetch), evaluating freshness at `now`.
    pub fn fetch_at<P>(&self, provider: &P, refresh: bool, now: DateTime<Utc>) -> LibraryFetch
    where
        P: LibraryProvider + ?Sized,
    {
        if refresh {
            info!("Ignoring cached library snapshot (refresh requested)");
        } else if let Some(snapshot) = self.cache.load_fresh_at(now) {
            info!(
                "Loading {} liked tracks from local cache (fetched {})",
                snapshot.tracks.len(),
                snapshot.timestamp.to_rfc3339()
            );
            return LibraryFetch::Cached(snapshot.tracks);
        }

        info!("Fetching liked tracks from Spotify...");
        let (tracks, complete) = self.fetch_all(provider);
        info!("Total liked tracks fetched: {}", tracks.len());

        self.cache.save(&LibrarySnapshot::new(tracks.clone()));

        if complete {
            LibraryFetch::Complete(tracks)
        } else {
            warn!(
                "Library fetch was incomplete; cached {} tracks until the next refresh",
                tracks.len()
            );
            LibraryFetch::Partial(tracks)
        }
    }

    /// Pages through the provider. Returns the tracks and whether every page arrived.
    fn fetch_all<P>(&self, provider: &P) -> (Vec<TrackRecord>, bool)
    where
        P: LibraryProvider + ?Sized,
    {
        let mut tracks = Vec::new();
        let mut offset: u32 = 0;
        let mut skipped = 0usize;

        loop {
            let page = match provider.saved_tracks(self.page_size, offset) {
                Ok(page) => page,
                Err(e) => {
                    warn!("Error fetching liked tracks at offset {}: {}", offset, e.message);
                    return (tracks, false);
                }
            };

            if page.items.is_empty() {
                break;
            }

            for item in &page.items {
                match item.normalize() {
                    Some(track) => tracks.push(track),
                    None => skipped += 1,
                }
            }
            offset += page.items.len() as u32;

            if !page.has_next {
                break;
            }
            info!("Fetched {} liked tracks so far...", tracks.len());
        }

        if skipped > 0 {
            debug!("Skipped {} saved entries without id, name or artist", skipped);
        }
        (tracks, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AppError, Result};
    use crate::library::provider::{RawArtist, RawTrack, SavedTrackItem, SavedTracksPage};
    use crate::types::DEFAULT_SNAPSHOT_MAX_AGE;
    use std::cell::RefCell;
    use tempfile::tempdir;

    /// Serves a fixed list of items, optionally failing at one offset.
    struct FakeLibrary {
        items: Vec<SavedTrackItem>,
        fail_at_offset: Option<u32>,
        calls: RefCell<Vec<(u32, u32)>>,
    }

    impl FakeLibrary {
        fn new(count: usize) -> Self {
            let items = (0..count)
                .map(|i| track_item(&format!("id{}", i), &format!("Song{}", i), "Artist"))
                .collect();
            Self {
                items,
                fail_at_offset: None,
                calls: RefCell::new(Vec::new()),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.borrow().len()
        }
    }

    impl LibraryProvider for FakeLibrary {
        fn saved_tracks(&self, limit: u32, offset: u32) -> Result<SavedTracksPage> {
            self.calls.borrow_mut().push((limit, offset));
            if self.fail_at_offset == Some(offset) {
                return Err(AppError::http_status("Saved tracks", 502, "bad gateway"));
            }
            let start = (offset as usize).min(self.items.len());
            let end = (start + limit as usize).min(self.items.len());
            Ok(SavedTracksPage {
                items: self.items[start..end].to_vec(),
                has_next: end < self.items.len(),
            })
        }
    }

    fn track_item(id: &str, name: &str, artist: &str) -> SavedTrackItem {
        SavedTrackItem {
            track: Some(RawTrack {
                id: Some(id.to_string()),
                name: Some(name.to_string()),
                artists: Some(vec![RawArtist {
                    name: Some(artist.to_string()),
                }]),
                external_ids: None,
            }),
        }
    }

    fn fetcher(dir: &std::path::Path) -> LibraryFetcher {
        LibraryFetcher::new(SnapshotCache::new(dir, DEFAULT_SNAPSHOT_MAX_AGE))
    }

    #[test]
    fn pages_until_no_next_page() {
        let dir = tempdir().unwrap();
        let library = FakeLibrary::new(120);

        let outcome = fetcher(dir.path()).fetch(&library, false);

        assert!(matches!(outcome, LibraryFetch::Complete(_)));
        assert_eq!(outcome.tracks().len(), 120);
        assert_eq!(
            *library.calls.borrow(),
            vec![(50, 0), (50, 50), (50, 100)]
        );
    }

    #[test]
    fn complete_fetch_writes_snapshot() {
        let dir = tempdir().unwrap();
        let library = FakeLibrary::new(3);
        fetcher(dir.path()).fetch(&library, false);

        let cache = SnapshotCache::new(dir.path(), DEFAULT_SNAPSHOT_MAX_AGE);
        assert_eq!(cache.load().unwrap().tracks.len(), 3);
    }

    #[test]
    fn fresh_snapshot_skips_network() {
        let dir = tempdir().unwrap();
        let library = FakeLibrary::new(3);
        let fetcher = fetcher(dir.path());

        fetcher.fetch(&library, false);
        let calls_after_first = library.call_count();
        let second = fetcher.fetch(&library, false);

        assert_eq!(library.call_count(), calls_after_first);
        assert!(matches!(second, LibraryFetch::Cached(_)));
        assert_eq!(second.tracks().len(), 3);
    }

    #[test]
    fn stale_snapshot_triggers_fetch_and_overwrite() {
        let dir = tempdir().unwrap();
        let cache = SnapshotCache::new(dir.path(), DEFAULT_SNAPSHOT_MAX_AGE);
        let old = Utc::now() - chrono::Duration::hours(30);
        cache.save(&LibrarySnapshot::with_timestamp(
            vec![TrackRecord::new("old", "Old", "Gone", None)],
            old,
        ));

        let library = FakeLibrary::new(2);
        let outcome = fetcher(dir.path()).fetch(&library, false);

        assert!(matches!(outcome, LibraryFetch::Complete(_)));
        assert_eq!(library.call_count(), 1);
        let stored = cache.load().unwrap();
        assert!(stored.timestamp > old);
        assert_eq!(stored.tracks[0].id, "id0");
    }

    #[test]
    fn refresh_bypasses_fresh_snapshot_and_rewrites_it() {
        let dir = tempdir().unwrap();
        let cache = SnapshotCache::new(dir.path(), DEFAULT_SNAPSHOT_MAX_AGE);
        cache.save(&LibrarySnapshot::new(vec![TrackRecord::new(
            "old", "Old", "Gone", None,
        )]));

        let library = FakeLibrary::new(2);
        let outcome = fetcher(dir.path()).fetch(&library, true);

        assert!(matches!(outcome, LibraryFetch::Complete(_)));
        assert_eq!(library.call_count(), 1);
        assert_eq!(cache.load().unwrap().tracks.len(), 2);
    }

    #[test]
    fn error_mid_paging_returns_partial_and_overwrites_snapshot() {
        let dir = tempdir().unwrap();
        let cache = SnapshotCache::new(dir.path(), DEFAULT_SNAPSHOT_MAX_AGE);
        let old = Utc::now() - chrono::Duration::hours(30);
        cache.save(&LibrarySnapshot::with_timestamp(
            vec![TrackRecord::new("old", "Old", "Gone", None)],
            old,
        ));

        let mut library = FakeLibrary::new(120);
        library.fail_at_offset = Some(50);
        let outcome = fetcher(dir.path()).fetch(&library, false);

        assert!(outcome.is_partial());
        assert_eq!(outcome.tracks().len(), 50);
        assert_eq!(library.call_count(), 2);

        let stored = cache.load().unwrap();
        assert!(stored.timestamp > old);
        assert_eq!(stored.tracks.len(), 50);
        assert_eq!(stored.tracks[0].id, "id0");
    }

    #[test]
    fn malformed_items_are_skipped() {
        let dir = tempdir().unwrap();
        let mut library = FakeLibrary::new(0);
        library.items = vec![
            track_item("A", "Song1", "X"),
            SavedTrackItem { track: None },
            track_item("", "NoId", "Y"),
            track_item("B", "Song2", "Y"),
        ];

        let outcome = fetcher(dir.path()).fetch(&library, false);
        let ids: Vec<&str> = outcome.tracks().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B"]);
    }

    #[test]
    fn empty_page_with_next_flag_stops_paging() {
        struct Endless;
        impl LibraryProvider for Endless {
            fn saved_tracks(&self, _limit: u32, _offset: u32) -> Result<SavedTracksPage> {
                Ok(SavedTracksPage {
                    items: Vec::new(),
                    has_next: true,
                })
            }
        }

        let dir = tempdir().unwrap();
        let outcome = fetcher(dir.path()).fetch(&Endless, false);
        assert_eq!(outcome, LibraryFetch::Complete(Vec::new()));
    }
}
