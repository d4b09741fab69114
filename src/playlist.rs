//! Playlist publishing.
//!
//! Creates the target playlist and appends track ids in batches, because
//! the provider accepts at most 100 tracks per add call.

use tracing::info;

use crate::error::Result;

/// Maximum number of tracks per add-tracks call.
pub const MAX_TRACKS_PER_REQUEST: usize = 100;

/// Playlist write access for one user.
pub trait PlaylistProvider {
    /// Creates a playlist and returns its id.
    fn create_playlist(&self, user_id: &str, name: &str, public: bool) -> Result<String>;

    /// Appends tracks to a playlist. Called with at most 100 ids.
    fn add_tracks(&self, playlist_id: &str, track_ids: &[String]) -> Result<()>;
}

/// A playlist that was created and filled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedPlaylist {
    pub playlist_id: String,
    pub track_count: usize,
    pub batches: usize,
}

/// Creates `name` for `user_id` and adds `track_ids` in order.
///
/// Returns None without touching the provider when there is nothing to add.
pub fn publish<P>(
    provider: &P,
    user_id: &str,
    name: &str,
    public: bool,
    track_ids: &[String],
) -> Result<Option<PublishedPlaylist>>
where
    P: PlaylistProvider + ?Sized,
{
    if track_ids.is_empty() {
        info!("No tracks to add to the playlist");
        return Ok(None);
    }

    info!("Creating playlist '{}'...", name);
    let playlist_id = provider.create_playlist(user_id, name, public)?;
    info!("Playlist '{}' created with ID: {}", name, playlist_id);

    info!("Adding {} tracks to the playlist...", track_ids.len());
    let mut batches = 0;
    for batch in track_ids.chunks(MAX_TRACKS_PER_REQUEST) {
        provider.add_tracks(&playlist_id, batch)?;
        batches += 1;
    }
    info!("Tracks added successfully");

    Ok(Some(PublishedPlaylist {
        playlist_id,
        track_count: track_ids.len(),
        batches,
    }))
}
