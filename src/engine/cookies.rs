//! Browser cookie acquisition.
//!
//! Supplies the optional credential bundle for age-restricted or
//! members-only content. The rest of the crate only ever sees
//! `Option<PathBuf>`; every failure here degrades to "no cookies".

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;

/// Default on-disk cookie bundle, reused across runs when present.
const COOKIE_FILE: &str = "yt_cookies.txt";

/// Browsers probed for cookies, in order of preference.
/// (yt-dlp identifier used with `--cookies-from-browser`.)
const BROWSERS: &[&str] = &["brave", "chrome", "chromium", "firefox", "opera", "edge"];

/// Locates or extracts a usable cookie file.
pub struct CookieManager {
    cookie_path: PathBuf,
}

impl Default for CookieManager {
    fn default() -> Self {
        Self::new()
    }
}

impl CookieManager {
    pub fn new() -> Self {
        Self {
            cookie_path: PathBuf::from(COOKIE_FILE),
        }
    }

    /// Use a non-default cookie file location.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            cookie_path: path.into(),
        }
    }

    /// Return the cookie file path if one exists or can be extracted.
    pub async fn cookie_file(&self) -> Option<PathBuf> {
        if self.cookie_path.exists() {
            tracing::info!("Using existing cookie file: {}", self.cookie_path.display());
            return Some(self.cookie_path.clone());
        }

        tracing::info!("Cookie file not found, attempting browser extraction");
        if self.extract_cookies().await {
            return Some(self.cookie_path.clone());
        }
        None
    }

    /// Try each known browser until one yields a cookie dump.
    async fn extract_cookies(&self) -> bool {
        for browser in BROWSERS {
            if try_browser(browser, &self.cookie_path).await {
                tracing::info!("Extracted cookies from {}", browser);
                return true;
            }
        }
        tracing::warn!("Could not extract cookies from any browser; continuing without");
        false
    }
}

async fn try_browser(browser: &str, target: &Path) -> bool {
    // yt-dlp dumps the browser's cookies as a side effect of a no-op
    // simulate run. A missing browser just makes this exit non-zero.
    let status = Command::new("yt-dlp")
        .args(["--cookies-from-browser", browser, "--cookies"])
        .arg(target)
        .args(["--simulate", "--skip-download", "https://www.youtube.com"])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await;

    matches!(status, Ok(s) if s.success()) && target.exists()
}
