//! Blocking Spotify Web API client.

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::Url;
use serde::de::DeserializeOwned;

use super::types::{
    AddTracksRequest, CreatePlaylistRequest, CurrentUser, PlaylistResponse, SavedTracksResponse,
};
use crate::error::{AppError, Result};
use crate::library::{LibraryProvider, SavedTracksPage};
use crate::playlist::PlaylistProvider;

/// Base URL of the Spotify Web API.
pub const API_BASE_URL: &str = "https://api.spotify.com/v1";

/// Per-request timeout for Spotify calls.
pub const DEFAULT_API_TIMEOUT: Duration = Duration::from_secs(30);

/// Returns the Spotify URI for a track id.
pub fn track_uri(track_id: &str) -> String {
    format!("spotify:track:{}", track_id)
}

/// Authenticated Spotify client. Holds the bearer token for one session.
pub struct SpotifyClient {
    http: Client,
    access_token: String,
    base_url: Url,
}

impl SpotifyClient {
    /// Creates a client using `access_token` for every request.
    pub fn new(access_token: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::transport("Creating Spotify HTTP client", e))?;

        Ok(Self {
            http,
            access_token: access_token.into(),
            base_url: parse_base(API_BASE_URL)?,
        })
    }

    /// Overrides the API base URL.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        self.base_url = parse_base(base_url)?;
        Ok(self)
    }

    /// Returns the profile of the authorized user.
    pub fn current_user(&self) -> Result<CurrentUser> {
        let url = self.endpoint(&["me"])?;
        self.send_json("Fetching current user", self.http.get(url))
    }

    /// Builds an endpoint URL from path segments, each percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                AppError::invalid_config(format!("Invalid API base URL: {}", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn send(&self, context: &str, request: RequestBuilder) -> Result<Response> {
        let response = request
            .bearer_auth(&self.access_token)
            .send()
            .map_err(|e| AppError::transport(context, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(AppError::http_status(context, status.as_u16(), &body));
        }
        Ok(response)
    }

    fn send_json<T: DeserializeOwned>(&self, context: &str, request: RequestBuilder) -> Result<T> {
        self.send(context, request)?
            .json()
            .map_err(|e| AppError::invalid_response(context, e))
    }
}

impl LibraryProvider for SpotifyClient {
    fn saved_tracks(&self, limit: u32, offset: u32) -> Result<SavedTracksPage> {
        let url = self.endpoint(&["me", "tracks"])?;
        let request = self
            .http
            .get(url)
            .query(&[("limit", limit), ("offset", offset)]);
        let response: SavedTracksResponse = self.send_json("Fetching saved tracks", request)?;
        Ok(response.into_page())
    }
}

impl PlaylistProvider for SpotifyClient {
    fn create_playlist(&self, user_id: &str, name: &str, public: bool) -> Result<String> {
        let url = self.endpoint(&["users", user_id, "playlists"])?;
        let request = self
            .http
            .post(url)
            .json(&CreatePlaylistRequest { name, public });
        let playlist: PlaylistResponse = self.send_json("Creating playlist", request)?;
        Ok(playlist.id)
    }

    fn add_tracks(&self, playlist_id: &str, track_ids: &[String]) -> Result<()> {
        let url = self.endpoint(&["playlists", playlist_id, "tracks"])?;
        let body = AddTracksRequest {
            uris: track_ids.iter().map(|id| track_uri(id)).collect(),
        };
        self.send("Adding tracks to playlist", self.http.post(url).json(&body))?;
        Ok(())
    }
}

fn parse_base(base_url: &str) -> Result<Url> {
    Url::parse(base_url)
        .map_err(|e| AppError::invalid_config(format!("Invalid API base URL {}: {}", base_url, e)))
}
