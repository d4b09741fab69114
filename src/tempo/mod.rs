//! Tempo (BPM) resolution.
//!
//! - [`TempoProvider`](provider::TempoProvider): free-text tempo lookup
//! - [`GetSongBpmClient`](getsongbpm::GetSongBpmClient): GetSongBPM search API
//! - [`RateLimiter`](ratelimit::RateLimiter): minimum spacing between lookups
//! - [`TempoResolver`](resolver::TempoResolver): cache-first resolution per track

pub mod getsongbpm;
pub mod provider;
pub mod ratelimit;
pub mod resolver;

// Re-export commonly used types
pub use getsongbpm::{
    parse_search_body, GetSongBpmClient, DEFAULT_LOOKUP_TIMEOUT, GETSONGBPM_API_URL,
    PLACEHOLDER_API_KEY,
};
pub use provider::{LookupError, TempoProvider};
pub use ratelimit::{RateLimiter, DEFAULT_MIN_INTERVAL};
pub use resolver::{RefreshPolicy, Resolution, TempoResolver, TempoSource};
