//! Cache-first tempo resolution.
//!
//! Each track id is looked up at most once: the outcome, found or not, is
//! written to the tempo cache before it is returned. Network lookups are
//! spaced by the rate limiter; cache hits never wait.

use std::time::Duration;

use tracing::{debug, info, warn};

use super::provider::{LookupError, TempoProvider};
use super::ratelimit::RateLimiter;
use crate::cache::TempoCache;
use crate::types::{TempoRecord, TrackRecord};

/// Where a resolved tempo came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TempoSource {
    /// An existing cache record.
    Cache,
    /// A provider lookup made during this call.
    Network,
    /// No credential; recorded as not found without a lookup.
    Unconfigured,
}

/// Tempo for one track plus its source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    pub bpm: Option<f64>,
    pub source: TempoSource,
}

/// When to ignore an existing cache record and look the track up again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefreshPolicy {
    /// Cached records are final.
    #[default]
    Never,
    /// Re-query tracks whose cached record is a negative entry.
    Missing,
    /// Re-query every track.
    All,
}

impl RefreshPolicy {
    fn bypasses(&self, record: &TempoRecord) -> bool {
        match self {
            RefreshPolicy::Never => false,
            RefreshPolicy::Missing => record.bpm.is_none(),
            RefreshPolicy::All => true,
        }
    }
}

/// Resolves tempos through the cache and a rate-limited provider.
pub struct TempoResolver<P> {
    cache: TempoCache,
    provider: P,
    limiter: RateLimiter,
    refresh: RefreshPolicy,
    network_calls: usize,
}

impl<P: TempoProvider> TempoResolver<P> {
    /// Creates a resolver spacing lookups by `min_interval`.
    pub fn new(cache: TempoCache, provider: P, min_interval: Duration) -> Self {
        Self {
            cache,
            provider,
            limiter: RateLimiter::new(min_interval),
            refresh: RefreshPolicy::Never,
            network_calls: 0,
        }
    }

    /// Sets the refresh policy.
    pub fn with_refresh(mut self, refresh: RefreshPolicy) -> Self {
        self.refresh = refresh;
        self
    }

    /// Returns the provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Returns the number of provider lookups made so far.
    pub fn network_calls(&self) -> usize {
        self.network_calls
    }

    /// Resolves the tempo of one track.
    pub fn resolve(&mut self, track: &TrackRecord) -> Resolution {
        let configured = self.provider.is_configured();

        if let Some(record) = self.cache.get(&track.id) {
            // without a credential a refresh could only overwrite good data
            if !configured || !self.refresh.bypasses(&record) {
                debug!(
                    "Loaded BPM ({:?}) from cache for '{}' ({})",
                    record.bpm, track.name, track.id
                );
                return Resolution {
                    bpm: record.bpm,
                    source: TempoSource::Cache,
                };
            }
            debug!("Refreshing cached BPM for '{}' ({})", track.name, track.id);
        }

        if !configured {
            debug!(
                "GetSongBPM API key is not configured, skipping lookup for '{}'",
                track.name
            );
            self.cache.put(&track.id, TempoRecord::not_found());
            return Resolution {
                bpm: None,
                source: TempoSource::Unconfigured,
            };
        }

        self.limiter.acquire();
        self.network_calls += 1;

        info!(
            "Fetching BPM from GetSongBPM for '{}' by '{}'...",
            track.name, track.artist
        );
        let bpm = match self.provider.lookup(&track.lookup_query()) {
            Ok(Some(bpm)) => {
                info!("Found BPM {} for '{}' by '{}'", bpm, track.name, track.artist);
                Some(bpm)
            }
            Ok(None) => {
                info!("BPM not found on GetSongBPM for '{}'", track.name);
                None
            }
            Err(LookupError::NotFound) => {
                info!(
                    "Song '{}' by '{}' not found on GetSongBPM (404)",
                    track.name, track.artist
                );
                None
            }
            Err(LookupError::Unauthorized(status)) => {
                warn!(
                    "GetSongBPM request unauthorized/forbidden ({}) for '{}'. Check the API key.",
                    status, track.name
                );
                None
            }
            Err(e) => {
                warn!("GetSongBPM lookup failed for '{}': {}", track.name, e);
                None
            }
        };

        self.cache.put(&track.id, TempoRecord { bpm });
        Resolution {
            bpm,
            source: TempoSource::Network,
        }
    }
}
