//! Command-line argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Config;
use crate::media::{MediaKind, QualitySpec};

/// tubefetch CLI.
#[derive(Parser, Debug)]
#[command(
    name = "tubefetch",
    version,
    about = "Batch-download videos, playlists and whole channels via yt-dlp",
    long_about = "Downloads a single video, a playlist, or a channel's entire catalog,\n\
                  organized as <dir>/<Music|Videos>/<Source>/<Playlist or Random>/."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Base directory for downloads.
    #[arg(short = 'd', long = "directory")]
    pub download_directory: Option<PathBuf>,

    /// Path to configuration file.
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Download audio only (mp3) instead of video.
    #[arg(short, long)]
    pub audio: bool,

    /// Quality preference: "highest" or a vertical resolution like "720p".
    #[arg(short, long)]
    pub quality: Option<String>,

    /// Maximum number of concurrent downloads.
    #[arg(long)]
    pub max_workers: Option<usize>,

    /// Maximum videos enumerated per playlist.
    #[arg(long)]
    pub max_videos: Option<usize>,

    /// Skip browser cookie extraction.
    #[arg(long)]
    pub no_cookies: bool,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Download a single video.
    Video { url: String },
    /// Download every member of a playlist.
    Playlist { url: String },
    /// Download a channel's playlists and standalone videos.
    Channel { url: String },
}

impl Args {
    /// Merge CLI overrides into a loaded configuration.
    pub fn merge_into_config(&self, config: &mut Config) {
        if let Some(ref dir) = self.download_directory {
            config.download_directory = dir.clone();
        }
        if let Some(workers) = self.max_workers {
            config.max_workers = workers;
        }
        if let Some(max) = self.max_videos {
            config.max_videos_per_playlist = max;
        }
        if let Some(ref quality) = self.quality {
            config.quality = quality.clone();
        }
    }

    pub fn media_kind(&self) -> MediaKind {
        if self.audio {
            MediaKind::Audio
        } else {
            MediaKind::Video
        }
    }

    pub fn quality_spec(&self, config: &Config) -> QualitySpec {
        QualitySpec::parse(&config.quality)
    }
}
