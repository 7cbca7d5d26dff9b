//! tubefetch - batch media acquisition via yt-dlp
//!
//! Given a video, a playlist, or a whole channel, this library resolves the
//! set of downloadable items, organizes them into a destination folder
//! hierarchy, and fetches them with bounded concurrency, aggregated
//! progress, and cooperative cancellation.
//!
//! # Features
//!
//! - Playlist enumeration with rate limiting and a hard item cap
//! - Algorithmic-mix detection and seed-video fallback
//! - Whole-channel resolution (playlists + standalone uploads) with
//!   nested progress weighting
//! - Bounded-concurrency batch downloads with per-item failure isolation
//! - Browser cookie pass-through for restricted content
//!
//! # Example
//!
//! ```no_run
//! use tubefetch::{BatchDownloader, MediaKind, PlaylistScraper, QualitySpec, YtDlpExtractor};
//!
//! #[tokio::main]
//! async fn main() -> tubefetch::Result<()> {
//!     let engine = YtDlpExtractor::new(None);
//!     let scraper = PlaylistScraper::new(&engine, std::time::Duration::from_secs(2));
//!     let items = scraper
//!         .scrape("https://www.youtube.com/playlist?list=PL123", 200, None)
//!         .await?;
//!
//!     let report = BatchDownloader::new(&engine)
//!         .run(
//!             &items,
//!             MediaKind::Audio,
//!             std::path::Path::new("/tmp/downloads"),
//!             QualitySpec::Highest,
//!             None,
//!             None,
//!         )
//!         .await?;
//!     println!("{} ok, {} failed", report.successful, report.failed);
//!     Ok(())
//! }
//! ```

pub mod batch;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod fs;
pub mod media;
pub mod output;
pub mod resolve;

// Re-exports for convenience
pub use batch::{create_folder_structure, BatchDownloader, BatchReport, CancelHandle};
pub use config::Config;
pub use engine::{CookieManager, Extractor, YtDlpExtractor};
pub use error::{Error, Result};
pub use media::{MediaKind, QualitySpec};
pub use resolve::{ChannelContent, ChannelScraper, PlaylistScraper, VideoItem};
