//! Minimum-interval rate limiter for sequential lookups.
//!
//! Blocks the calling thread until `min_interval` has passed since the
//! previous acquisition. Only meant for strictly sequential callers.

use std::thread;
use std::time::{Duration, Instant};

/// Default spacing between tempo lookups. GetSongBPM allows about one
/// request per second on the free tier.
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(1100);

/// Enforces a minimum delay between consecutive requests.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last: Option<Instant>,
}

impl RateLimiter {
    /// Creates a limiter. The first acquisition never waits.
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last: None,
        }
    }

    /// Returns the configured minimum interval.
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Waits until a request may be sent, then records it.
    ///
    /// Returns how long the call slept.
    pub fn acquire(&mut self) -> Duration {
        let waited = match self.last {
            Some(last) => {
                let elapsed = last.elapsed();
                if elapsed < self.min_interval {
                    let remaining = self.min_interval - elapsed;
                    thread::sleep(remaining);
                    remaining
                } else {
                    Duration::ZERO
                }
            }
            None => Duration::ZERO,
        };
        self.last = Some(Instant::now());
        waited
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_INTERVAL)
    }
}
