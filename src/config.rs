//! Configuration loading.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Main configuration structure, loaded from TOML with CLI overrides
/// merged on top.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base directory for downloads.
    #[serde(default = "default_download_directory")]
    pub download_directory: PathBuf,

    /// Maximum number of concurrent downloads.
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,

    /// Delay between metadata requests, in seconds. This is enumeration
    /// throttling, not a network timeout.
    #[serde(default = "default_request_delay")]
    pub request_delay_secs: f64,

    /// Per-playlist enumeration cap.
    #[serde(default = "default_max_videos")]
    pub max_videos_per_playlist: usize,

    /// Quality preference ("highest", "720p", ...).
    #[serde(default = "default_quality")]
    pub quality: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            download_directory: default_download_directory(),
            max_workers: default_max_workers(),
            request_delay_secs: default_request_delay(),
            max_videos_per_playlist: default_max_videos(),
            quality: default_quality(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }

    /// The inter-request delay as a [`Duration`].
    pub fn request_delay(&self) -> Duration {
        Duration::from_secs_f64(self.request_delay_secs.max(0.0))
    }
}

fn default_download_directory() -> PathBuf {
    directories::UserDirs::new()
        .and_then(|dirs| dirs.download_dir().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("Downloads"))
}

fn default_max_workers() -> usize {
    3
}

fn default_request_delay() -> f64 {
    2.0
}

fn default_max_videos() -> usize {
    200
}

fn default_quality() -> String {
    "highest".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.max_workers, 3);
        assert_eq!(config.max_videos_per_playlist, 200);
        assert_eq!(config.request_delay(), Duration::from_secs(2));
        assert_eq!(config.quality, "highest");
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str("max_workers = 5\n").unwrap();
        assert_eq!(config.max_workers, 5);
        assert_eq!(config.max_videos_per_playlist, 200);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "request_delay_secs = 0.5\nquality = \"720p\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.request_delay(), Duration::from_millis(500));
        assert_eq!(config.quality, "720p");
    }

    #[test]
    fn test_negative_delay_clamps_to_zero() {
        let config: Config = toml::from_str("request_delay_secs = -1.0\n").unwrap();
        assert_eq!(config.request_delay(), Duration::ZERO);
    }
}
