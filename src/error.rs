//! Error types for the tubefetch application.

use thiserror::Error;

/// Main error type for the application.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Metadata extraction errors
    #[error("Extraction failed: {0}")]
    Extract(String),

    // Download errors
    #[error("Download failed: {0}")]
    Download(String),

    #[error("Video unavailable: {0}")]
    VideoUnavailable(String),

    #[error("Video not found: {0}")]
    VideoNotFound(String),

    #[error("yt-dlp not found. Please install yt-dlp and ensure it's in your PATH.")]
    EngineNotFound,

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    // URL parsing errors
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Process exit codes for the CLI.
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const CONFIG_ERROR: i32 = 2;
    pub const EXTRACT_ERROR: i32 = 3;
    pub const DOWNLOAD_ERROR: i32 = 4;
    pub const UNEXPECTED_ERROR: i32 = 5;
    pub const SOME_ITEMS_FAILED: i32 = 6;
}
