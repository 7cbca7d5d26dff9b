//! Extraction engine boundary.
//!
//! The core never talks to the network itself. Everything it needs from
//! upstream goes through the [`Extractor`] trait: one metadata call and one
//! acquire-and-store call. The production implementation shells out to
//! yt-dlp ([`ytdlp::YtDlpExtractor`]); tests swap in a mock.

pub mod cookies;
pub mod ytdlp;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::Result;
use crate::media::{MediaKind, QualitySpec};

pub use cookies::CookieManager;
pub use ytdlp::YtDlpExtractor;

/// How deep a metadata listing should go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Flatness {
    /// Full extraction of every entry.
    Tree,
    /// Shallow listing: entries carry ids and titles but no formats.
    #[default]
    Flat,
    /// Shallow listing scoped strictly to playlist entries. Used for
    /// algorithmic mixes, which return partial metadata under full
    /// extraction.
    FlatInPlaylist,
}

/// Options for a metadata fetch.
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    pub flat: Flatness,
    /// Optional credential bundle, passed through opaquely.
    pub cookie_file: Option<PathBuf>,
}

impl FetchOptions {
    pub fn flat() -> Self {
        Self {
            flat: Flatness::Flat,
            ..Default::default()
        }
    }

    pub fn flat_in_playlist() -> Self {
        Self {
            flat: Flatness::FlatInPlaylist,
            ..Default::default()
        }
    }

    pub fn with_cookies(mut self, cookie_file: Option<PathBuf>) -> Self {
        self.cookie_file = cookie_file;
        self
    }
}

/// One entry of a flat listing. Fields are whatever upstream happened to
/// return; missing ones are tolerated everywhere.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Entry {
    pub id: Option<String>,
    pub title: Option<String>,
    pub url: Option<String>,
    pub duration: Option<f64>,
}

/// Metadata returned for a URL.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Metadata {
    pub title: Option<String>,
    pub channel: Option<String>,
    pub duration: Option<f64>,
    /// Entries may contain nulls for deleted or hidden items.
    #[serde(default)]
    pub entries: Option<Vec<Option<Entry>>>,
}

/// Per-item transfer progress sink (percentage, 0..=100).
pub type TransferProgress = dyn Fn(u8) + Send + Sync;

/// The contract the core requires from the extraction/transfer engine.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Fetch metadata for a URL without downloading anything.
    async fn fetch_metadata(&self, url: &str, options: &FetchOptions) -> Result<Metadata>;

    /// Download the item at `url` into `dest_dir`, remuxing as needed for
    /// `kind`. `filename` overrides the engine's own output naming.
    async fn fetch_and_store(
        &self,
        url: &str,
        dest_dir: &Path,
        kind: MediaKind,
        quality: QualitySpec,
        filename: Option<&str>,
        progress: Option<&TransferProgress>,
    ) -> Result<()>;
}
