//! End-to-end playlist run.
//!
//! Fetches the library, resolves every tempo in order, filters by range and
//! publishes the result. All state lives in the cache directory, so a run
//! that stops early loses nothing already resolved.

use std::path::PathBuf;
use std::time::Duration;

use tracing::{info, warn};

use crate::cache::{SnapshotCache, TempoCache};
use crate::config::AppConfig;
use crate::error::Result;
use crate::filter::{filter_by_tempo, BpmRange};
use crate::library::{LibraryFetch, LibraryFetcher, LibraryProvider};
use crate::playlist::{publish, PlaylistProvider, PublishedPlaylist};
use crate::tempo::{RefreshPolicy, TempoProvider, TempoResolver};

/// Per-run switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Ignore a fresh library snapshot.
    pub refresh_library: bool,
    /// Which cached tempo records to look up again.
    pub refresh_tempo: RefreshPolicy,
    /// Stop after filtering.
    pub dry_run: bool,
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The library is empty.
    NoLikedTracks,
    /// No track has a known tempo inside the range.
    NoneInRange,
    /// Dry run; the matching ids, in library order.
    DryRun {
        matched: Vec<String>,
        partial_library: bool,
    },
    /// A playlist was created and filled.
    Published {
        playlist: PublishedPlaylist,
        partial_library: bool,
    },
}

/// Settings for one run, derived from [`AppConfig`].
#[derive(Debug, Clone)]
pub struct Pipeline {
    cache_dir: PathBuf,
    range: BpmRange,
    playlist_name: String,
    public: bool,
    snapshot_max_age: Duration,
    page_size: u32,
    lookup_interval: Duration,
}

impl Pipeline {
    /// Builds the pipeline, rejecting an invalid tempo range.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Ok(Self {
            cache_dir: config.effective_cache_path(),
            range: config.bpm_range()?,
            playlist_name: config.playlist_name.clone(),
            public: config.public,
            snapshot_max_age: config.snapshot_max_age,
            page_size: config.page_size,
            lookup_interval: config.lookup_interval,
        })
    }

    /// Returns the tempo range.
    pub fn range(&self) -> &BpmRange {
        &self.range
    }

    /// Runs once for `user_id`.
    ///
    /// Library and lookup failures degrade to fewer tracks; only a publish
    /// failure is returned as an error.
    pub fn run<L, T, P>(
        &self,
        library: &L,
        tempo: T,
        playlists: &P,
        user_id: &str,
        options: &RunOptions,
    ) -> Result<RunOutcome>
    where
        L: LibraryProvider + ?Sized,
        T: TempoProvider,
        P: PlaylistProvider + ?Sized,
    {
        let fetcher = LibraryFetcher::with_page_size(
            SnapshotCache::new(&self.cache_dir, self.snapshot_max_age),
            self.page_size,
        );
        let (tracks, partial_library) = match fetcher.fetch(library, options.refresh_library) {
            LibraryFetch::Cached(tracks) | LibraryFetch::Complete(tracks) => (tracks, false),
            LibraryFetch::Partial(tracks) => {
                warn!(
                    "Using {} liked tracks; the rest of the library could not be fetched",
                    tracks.len()
                );
                (tracks, true)
            }
        };

        if tracks.is_empty() {
            info!("No liked tracks found");
            return Ok(RunOutcome::NoLikedTracks);
        }

        let mut resolver = TempoResolver::new(
            TempoCache::new(&self.cache_dir),
            tempo,
            self.lookup_interval,
        )
        .with_refresh(options.refresh_tempo);

        if !resolver.provider().is_configured() {
            warn!("GetSongBPM API key is not configured; only cached tempos will be used");
        }

        let total = tracks.len();
        let mut resolved = Vec::with_capacity(total);
        for (i, track) in tracks.iter().enumerate() {
            info!("Processing track {}/{}: {} by {}", i + 1, total, track.name, track.artist);
            let resolution = resolver.resolve(track);
            resolved.push((track, resolution.bpm));
        }
        info!(
            "Resolved {} tracks with {} GetSongBPM lookups",
            total,
            resolver.network_calls()
        );

        let matched = filter_by_tempo(resolved, &self.range);
        info!("{} tracks within {} BPM", matched.len(), self.range);

        if matched.is_empty() {
            info!("No songs found within the specified BPM range");
            return Ok(RunOutcome::NoneInRange);
        }

        if options.dry_run {
            info!("Dry run: not creating playlist '{}'", self.playlist_name);
            return Ok(RunOutcome::DryRun {
                matched,
                partial_library,
            });
        }

        match publish(playlists, user_id, &self.playlist_name, self.public, &matched)? {
            Some(playlist) => Ok(RunOutcome::Published {
                playlist,
                partial_library,
            }),
            None => Ok(RunOutcome::NoneInRange),
        }
    }
}
