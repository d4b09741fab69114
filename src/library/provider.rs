//! Library provider interface and raw saved-track shapes.
//!
//! The raw types mirror the Spotify saved-tracks payload but every field is
//! optional, so one malformed entry never fails decoding of a whole page.

use serde::Deserialize;

use crate::error::Result;
use crate::types::TrackRecord;

/// Saved tracks requested per page. Spotify caps this endpoint at 50.
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// One entry of a saved-tracks page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SavedTrackItem {
    #[serde(default)]
    pub track: Option<RawTrack>,
}

/// Track object as returned by the provider.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTrack {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub artists: Option<Vec<RawArtist>>,
    #[serde(default)]
    pub external_ids: Option<RawExternalIds>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawArtist {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawExternalIds {
    #[serde(default)]
    pub isrc: Option<String>,
}

/// One page of saved tracks plus the provider's "more pages" signal.
#[derive(Debug, Clone, Default)]
pub struct SavedTracksPage {
    pub items: Vec<SavedTrackItem>,
    pub has_next: bool,
}

/// Paged, offset-based access to the user's saved tracks.
pub trait LibraryProvider {
    /// Returns up to `limit` saved tracks starting at `offset`.
    fn saved_tracks(&self, limit: u32, offset: u32) -> Result<SavedTracksPage>;
}

impl SavedTrackItem {
    /// Normalizes the entry into a [`TrackRecord`].
    ///
    /// Returns None unless the track has a non-empty id, name and first
    /// artist name.
    pub fn normalize(&self) -> Option<TrackRecord> {
        let track = self.track.as_ref()?;
        let id = non_empty(track.id.as_deref())?;
        let name = non_empty(track.name.as_deref())?;
        let artist = track
            .artists
            .as_ref()
            .and_then(|artists| artists.first())
            .and_then(|artist| non_empty(artist.name.as_deref()))?;
        let isrc = track
            .external_ids
            .as_ref()
            .and_then(|ids| non_empty(ids.isrc.as_deref()))
            .map(str::to_string);

        Some(TrackRecord::new(id, name, artist, isrc))
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
