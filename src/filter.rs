//! Inclusive tempo range filter.

use std::fmt;

use tracing::debug;

use crate::error::{AppError, Result};
use crate::types::TrackRecord;

/// An inclusive BPM range `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BpmRange {
    min: f64,
    max: f64,
}

impl BpmRange {
    /// Creates a range. Both bounds must be finite and `min <= max`.
    pub fn new(min: f64, max: f64) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() {
            return Err(AppError::invalid_config(format!(
                "BPM bounds must be finite numbers, got {}-{}",
                min, max
            )));
        }
        if min > max {
            return Err(AppError::invalid_config(format!(
                "Minimum BPM ({}) is greater than maximum BPM ({})",
                min, max
            )));
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Returns true if `bpm` lies within the range, bounds included.
    pub fn contains(&self, bpm: f64) -> bool {
        self.min <= bpm && bpm <= self.max
    }
}

impl fmt::Display for BpmRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

/// Returns the ids of tracks whose tempo is known and inside `range`,
/// preserving input order. Tracks without a tempo never match.
pub fn filter_by_tempo<'a, I>(resolved: I, range: &BpmRange) -> Vec<String>
where
    I: IntoIterator<Item = (&'a TrackRecord, Option<f64>)>,
{
    resolved
        .into_iter()
        .filter_map(|(track, bpm)| match bpm {
            Some(bpm) if range.contains(bpm) => {
                debug!(
                    "Adding '{}' by {} (BPM: {:.2}) to playlist",
                    track.name, track.artist, bpm
                );
                Some(track.id.clone())
            }
            Some(bpm) => {
                debug!(
                    "Skipping '{}' by {} (BPM: {:.2} outside {})",
                    track.name, track.artist, bpm, range
                );
                None
            }
            None => {
                debug!("Skipping '{}' by {} (BPM unknown)", track.name, track.artist);
                None
            }
        })
        .collect()
}
