//! bpm-playlist: builds a Spotify playlist of liked songs within a tempo range.
//!
//! Liked songs are fetched once per day into a local snapshot, each track's
//! tempo is looked up on GetSongBPM at most once and cached, and the tracks
//! within the configured BPM range are published as a new playlist.
//!
//! # Modules
//!
//! - [`cache`]: JSON file caches (library snapshot, per-track tempo, token)
//! - [`library`]: Paged liked-songs fetch through the snapshot cache
//! - [`tempo`]: Cache-first, rate-limited tempo resolution and the GetSongBPM client
//! - [`filter`]: Inclusive BPM range filter
//! - [`playlist`]: Playlist creation and batched track adds
//! - [`spotify`]: Spotify OAuth and Web API client
//! - [`pipeline`]: The end-to-end run
//! - [`config`]: Runtime configuration (AppConfig)
//! - [`error`]: Error types and codes (AppError, ErrorCode)
//!
//! # Example
//!
//! ```rust,ignore
//! use bpm_playlist::{AppConfig, Pipeline, RunOptions};
//!
//! let config = AppConfig::from_env();
//! let pipeline = Pipeline::from_config(&config)?;
//! let outcome = pipeline.run(&spotify, &getsongbpm, &spotify, &user.id, &RunOptions::default())?;
//! ```

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod library;
pub mod pipeline;
pub mod playlist;
pub mod spotify;
pub mod tempo;
pub mod types;

// Re-export commonly used types at crate root for convenience
pub use config::{AppConfig, SpotifyCredentials};
pub use error::{AppError, ErrorCode, Result};
pub use filter::{filter_by_tempo, BpmRange};
pub use pipeline::{Pipeline, RunOptions, RunOutcome};
pub use playlist::{publish, PublishedPlaylist};
pub use types::{cache_key, LibrarySnapshot, TempoRecord, TrackRecord};
