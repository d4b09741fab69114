//! Saved-track library access.
//!
//! - [`LibraryProvider`](provider::LibraryProvider): paged access to saved tracks
//! - [`LibraryFetcher`](fetcher::LibraryFetcher): snapshot-cached fetch of the whole library

pub mod fetcher;
pub mod provider;

// Re-export commonly used types
pub use fetcher::{LibraryFetch, LibraryFetcher};
pub use provider::{
    LibraryProvider, RawArtist, RawExternalIds, RawTrack, SavedTrackItem, SavedTracksPage,
    DEFAULT_PAGE_SIZE,
};
