//! Spotify Web API access.
//!
//! - [`SpotifyAuth`](auth::SpotifyAuth): authorization-code OAuth with a token cache
//! - [`SpotifyClient`](client::SpotifyClient): saved tracks, user profile and playlists
//! - [`types`]: wire types for requests and responses

pub mod auth;
pub mod client;
pub mod types;

// Re-export commonly used types
pub use auth::{parse_redirect_code, SpotifyAuth, SCOPES, TOKEN_FILE};
pub use client::{track_uri, SpotifyClient, API_BASE_URL, DEFAULT_API_TIMEOUT};
pub use types::{CurrentUser, TokenRecord};
