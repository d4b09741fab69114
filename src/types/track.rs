//! Track type representing one saved track in the user's library.
//!
//! A TrackRecord is the minimal normalized form of a provider track entry.
//! Records are identified by the provider-assigned id.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A saved track normalized from a library provider response.
///
/// Immutable once created. Only tracks with an id, a name and a primary
/// artist are ever turned into a TrackRecord.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackRecord {
    /// Provider-assigned identifier (Spotify track id).
    pub id: String,

    /// Display name of the track.
    pub name: String,

    /// Name of the first listed artist.
    pub artist: String,

    /// International Standard Recording Code, when the provider has one.
    /// Carried through but not used for matching.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isrc: Option<String>,
}

impl TrackRecord {
    /// Creates a new TrackRecord.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        artist: impl Into<String>,
        isrc: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            artist: artist.into(),
            isrc,
        }
    }

    /// Returns the free-text lookup string sent to the tempo provider.
    ///
    /// Format: `song:<name> artist:<artist>`
    pub fn lookup_query(&self) -> String {
        format!("song:{} artist:{}", self.name, self.artist)
    }
}

/// Computes the file-safe cache key for a track id.
///
/// Plain ids (ASCII alphanumerics, `-` and `_`) are used as-is so cache
/// files stay human-inspectable. Anything else is replaced by the first
/// 16 hex characters of its SHA256 hash, prefixed with `h-`, so an id can
/// never name a path outside the cache directory.
pub fn cache_key(id: &str) -> String {
    let plain = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if plain {
        return id.to_string();
    }

    let mut hasher = Sha256::new();
    hasher.update(id.as_bytes());
    let result = hasher.finalize();
    // Take first 8 bytes (16 hex chars)
    format!("h-{}", hex::encode(&result[..8]))
}
