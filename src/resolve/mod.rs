//! Catalog resolution: turning playlist and channel references into flat,
//! download-ready item lists.
//!
//! This module provides:
//! - URL normalization and mix detection
//! - Sequential playlist enumeration with rate limiting
//! - Whole-channel resolution with nested progress weighting

pub mod channel;
pub mod normalize;
pub mod playlist;

pub use channel::{ChannelContent, ChannelScraper, ScrapedPlaylist};
pub use normalize::{normalize_playlist_url, NormalizedPlaylist};
pub use playlist::PlaylistScraper;

/// Progress callback for enumeration: `(items_done, total, percentage)`.
pub type ScrapeProgress<'a> = dyn Fn(usize, usize, u8) + Send + Sync + 'a;

/// One downloadable item produced by the resolution stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoItem {
    /// Canonical watch URL.
    pub url: String,
    /// Display title; `"Unknown Title"` when upstream omitted it.
    pub title: String,
    /// Duration in seconds; zero when unknown.
    pub duration_secs: u64,
    /// Destination-relative folder path (`/`-joined, never leading or
    /// trailing `/`); empty for the destination root.
    pub folder: String,
}

/// A playlist reference discovered on a channel, before enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistRef {
    pub title: String,
    pub url: String,
}
