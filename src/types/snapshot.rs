//! Library snapshot: every saved track plus the time it was fetched.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::TrackRecord;

/// Default freshness window for a cached snapshot (24 hours).
pub const DEFAULT_SNAPSHOT_MAX_AGE: Duration = Duration::from_secs(24 * 60 * 60);

/// An ordered list of saved tracks with its creation timestamp.
///
/// Snapshots are replaced wholesale on refresh, never merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibrarySnapshot {
    /// When the tracks were fetched.
    #[serde(with = "timestamp_serde")]
    pub timestamp: DateTime<Utc>,

    /// Saved tracks in provider order.
    #[serde(alias = "songs")]
    pub tracks: Vec<TrackRecord>,
}

impl LibrarySnapshot {
    /// Creates a snapshot stamped with the current time.
    pub fn new(tracks: Vec<TrackRecord>) -> Self {
        Self::with_timestamp(tracks, Utc::now())
    }

    /// Creates a snapshot with an explicit timestamp.
    pub fn with_timestamp(tracks: Vec<TrackRecord>, timestamp: DateTime<Utc>) -> Self {
        Self { timestamp, tracks }
    }

    /// Returns true if the snapshot can be used instead of a fetch at `now`.
    ///
    /// Empty snapshots and snapshots stamped in the future are never fresh.
    pub fn is_fresh_at(&self, now: DateTime<Utc>, max_age: Duration) -> bool {
        if self.tracks.is_empty() {
            return false;
        }
        match now.signed_duration_since(self.timestamp).to_std() {
            Ok(age) => age < max_age,
            Err(_) => false,
        }
    }
}

/// Timestamps are written as RFC 3339 UTC.
///
/// Naive ISO-8601 strings (no offset) are read as local time, which is what
/// older cache files contain.
mod timestamp_serde {
    use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(time: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.to_rfc3339())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid timestamp: {}", raw)))
    }

    pub(super) fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        let naive = raw.parse::<NaiveDateTime>().ok()?;
        Local
            .from_local_datetime(&naive)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
    }
}
