//! Runtime configuration.
//!
//! Contains credentials, the tempo range, playlist options and cache
//! location. Built from environment variables, then overridden by CLI flags,
//! and passed explicitly into every component.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{AppError, Result};
use crate::filter::BpmRange;
use crate::library::DEFAULT_PAGE_SIZE;
use crate::spotify::DEFAULT_API_TIMEOUT;
use crate::tempo::{DEFAULT_LOOKUP_TIMEOUT, DEFAULT_MIN_INTERVAL, PLACEHOLDER_API_KEY};
use crate::types::DEFAULT_SNAPSHOT_MAX_AGE;

/// Redirect URI used when SPOTIFY_REDIRECT_URI is unset.
/// Must match the URI registered in the Spotify Developer Dashboard.
pub const DEFAULT_REDIRECT_URI: &str = "https://127.0.0.1:8888/callback";

/// Playlist name used when none is given.
pub const DEFAULT_PLAYLIST_NAME: &str = "180 BPM Running Hits";

/// Default lower tempo bound.
pub const DEFAULT_MIN_BPM: f64 = 175.0;

/// Default upper tempo bound.
pub const DEFAULT_MAX_BPM: f64 = 185.0;

/// Spotify application credentials, all present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpotifyCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

/// Runtime configuration for one run.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Spotify application client id.
    pub client_id: Option<String>,

    /// Spotify application client secret.
    pub client_secret: Option<String>,

    /// OAuth redirect URI.
    pub redirect_uri: String,

    /// GetSongBPM API key. None disables tempo lookups.
    pub getsongbpm_api_key: Option<String>,

    /// Directory for the snapshot, tempo and token caches.
    /// If None, uses the platform-specific default cache location.
    pub cache_path: Option<PathBuf>,

    /// Name of the playlist to create.
    pub playlist_name: String,

    /// Whether the created playlist is public.
    pub public: bool,

    /// Lower tempo bound (inclusive).
    pub min_bpm: f64,

    /// Upper tempo bound (inclusive).
    pub max_bpm: f64,

    /// Freshness window of the library snapshot.
    pub snapshot_max_age: Duration,

    /// Saved tracks requested per page (1-50).
    pub page_size: u32,

    /// Minimum spacing between tempo lookups.
    pub lookup_interval: Duration,

    /// Per-request timeout for tempo lookups.
    pub lookup_timeout: Duration,

    /// Per-request timeout for Spotify calls.
    pub api_timeout: Duration,
}

impl AppConfig {
    /// Creates an AppConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an AppConfig from environment variables.
    ///
    /// Reads the following environment variables:
    /// - `SPOTIFY_CLIENT_ID` - Spotify application client id
    /// - `SPOTIFY_CLIENT_SECRET` - Spotify application client secret
    /// - `SPOTIFY_REDIRECT_URI` - OAuth redirect URI
    /// - `GETSONGBPM_API_KEY` - GetSongBPM API key
    /// - `BPM_PLAYLIST_CACHE_PATH` - Cache directory
    /// - `BPM_PLAYLIST_NAME` - Playlist name
    /// - `BPM_PLAYLIST_MIN` - Lower tempo bound
    /// - `BPM_PLAYLIST_MAX` - Upper tempo bound
    ///
    /// Falls back to defaults for unset or unparseable variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        config.client_id = var("SPOTIFY_CLIENT_ID");
        config.client_secret = var("SPOTIFY_CLIENT_SECRET");

        if let Some(uri) = var("SPOTIFY_REDIRECT_URI") {
            config.redirect_uri = uri;
        }

        config.getsongbpm_api_key = normalize_api_key(var("GETSONGBPM_API_KEY"));

        if let Some(path) = var("BPM_PLAYLIST_CACHE_PATH") {
            config.cache_path = Some(PathBuf::from(path));
        }

        if let Some(name) = var("BPM_PLAYLIST_NAME") {
            config.playlist_name = name;
        }

        if let Some(min) = var("BPM_PLAYLIST_MIN").and_then(|v| v.parse::<f64>().ok()) {
            config.min_bpm = min;
        }

        if let Some(max) = var("BPM_PLAYLIST_MAX").and_then(|v| v.parse::<f64>().ok()) {
            config.max_bpm = max;
        }

        config
    }

    /// Returns the Spotify credentials, or a MISSING_CREDENTIALS error
    /// naming every unset variable.
    pub fn spotify_credentials(&self) -> Result<SpotifyCredentials> {
        let mut missing = Vec::new();
        if self.client_id.is_none() {
            missing.push("SPOTIFY_CLIENT_ID");
        }
        if self.client_secret.is_none() {
            missing.push("SPOTIFY_CLIENT_SECRET");
        }
        if self.redirect_uri.trim().is_empty() {
            missing.push("SPOTIFY_REDIRECT_URI");
        }

        match (&self.client_id, &self.client_secret) {
            (Some(id), Some(secret)) if missing.is_empty() => Ok(SpotifyCredentials {
                client_id: id.clone(),
                client_secret: secret.clone(),
                redirect_uri: self.redirect_uri.clone(),
            }),
            _ => Err(AppError::missing_credentials(&missing)),
        }
    }

    /// Returns the tempo range.
    pub fn bpm_range(&self) -> Result<BpmRange> {
        BpmRange::new(self.min_bpm, self.max_bpm)
    }

    /// Returns the effective cache path, using platform defaults if not specified.
    pub fn effective_cache_path(&self) -> PathBuf {
        if let Some(ref path) = self.cache_path {
            path.clone()
        } else {
            default_cache_path()
        }
    }

    /// Validates the configuration.
    ///
    /// Returns an error message if validation fails, None otherwise.
    pub fn validate(&self) -> Option<String> {
        if let Err(e) = self.bpm_range() {
            return Some(e.message);
        }

        if self.page_size == 0 || self.page_size > DEFAULT_PAGE_SIZE {
            return Some(format!(
                "page_size must be between 1 and {}, got {}",
                DEFAULT_PAGE_SIZE, self.page_size
            ));
        }

        if self.playlist_name.trim().is_empty() {
            return Some("playlist name cannot be empty".to_string());
        }

        None
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
            getsongbpm_api_key: None,
            cache_path: None,
            playlist_name: DEFAULT_PLAYLIST_NAME.to_string(),
            public: false,
            min_bpm: DEFAULT_MIN_BPM,
            max_bpm: DEFAULT_MAX_BPM,
            snapshot_max_age: DEFAULT_SNAPSHOT_MAX_AGE,
            page_size: DEFAULT_PAGE_SIZE,
            lookup_interval: DEFAULT_MIN_INTERVAL,
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
            api_timeout: DEFAULT_API_TIMEOUT,
        }
    }
}

/// Treats empty keys and the documentation placeholder as unset.
pub fn normalize_api_key(key: Option<String>) -> Option<String> {
    key.map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty() && k != PLACEHOLDER_API_KEY)
}

/// Returns the platform-specific default cache path.
///
/// Uses the `directories` crate to find appropriate locations:
/// - macOS: ~/Library/Caches/bpm-playlist
/// - Linux: ~/.cache/bpm-playlist
/// - Windows: C:\Users\<user>\AppData\Local\bpm-playlist\cache
fn default_cache_path() -> PathBuf {
    if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "bpm-playlist") {
        proj_dirs.cache_dir().to_path_buf()
    } else {
        // Fallback to current directory
        PathBuf::from("./bpm-playlist-cache")
    }
}
