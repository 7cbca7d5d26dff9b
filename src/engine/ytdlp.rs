//! yt-dlp backed implementation of the [`Extractor`] contract.
//!
//! Shells out to the `yt-dlp` binary: `-J` for metadata, a streaming
//! download invocation for acquisition. stderr is mapped to the typed
//! errors callers match on.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;

use crate::engine::{Extractor, FetchOptions, Flatness, Metadata, TransferProgress};
use crate::error::{Error, Result};
use crate::media::{MediaKind, QualitySpec};

/// Engine wrapper around the yt-dlp binary.
pub struct YtDlpExtractor {
    binary: String,
    cookie_file: Option<PathBuf>,
}

impl YtDlpExtractor {
    pub fn new(cookie_file: Option<PathBuf>) -> Self {
        Self {
            binary: "yt-dlp".to_string(),
            cookie_file,
        }
    }

    /// Use a non-default binary name or path.
    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    fn base_command(&self) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.arg("--no-warnings");
        if let Some(ref cookies) = self.cookie_file {
            cmd.arg("--cookies").arg(cookies);
        }
        cmd
    }

    fn format_args(kind: MediaKind, quality: QualitySpec) -> Vec<String> {
        match kind {
            MediaKind::Audio => vec![
                "-x".into(),
                "--audio-format".into(),
                "mp3".into(),
                "--audio-quality".into(),
                "0".into(),
            ],
            MediaKind::Video => {
                let selector = match quality {
                    QualitySpec::Highest => "bestvideo+bestaudio/best".to_string(),
                    QualitySpec::MaxHeight(h) => {
                        format!("bestvideo[height<={h}]+bestaudio/best[height<={h}]")
                    }
                };
                vec![
                    "-f".into(),
                    selector,
                    "--merge-output-format".into(),
                    "mp4".into(),
                ]
            }
        }
    }

    fn classify_failure(url: &str, stderr: &str) -> Error {
        let lower = stderr.to_lowercase();
        if lower.contains("video unavailable") || lower.contains("private video") {
            Error::VideoUnavailable(url.to_string())
        } else if lower.contains("not found") || lower.contains("404") {
            Error::VideoNotFound(url.to_string())
        } else {
            let detail = stderr.lines().last().unwrap_or("unknown error").trim();
            Error::Download(format!("{}: {}", url, detail))
        }
    }

    fn map_spawn_error(err: std::io::Error) -> Error {
        if err.kind() == std::io::ErrorKind::NotFound {
            Error::EngineNotFound
        } else {
            Error::Io(err)
        }
    }
}

/// Parse a yt-dlp `[download]  42.3% of ...` line into a percentage.
fn parse_progress_line(line: &str) -> Option<u8> {
    let rest = line.strip_prefix("[download]")?.trim_start();
    let pct = rest.split('%').next()?.trim();
    pct.parse::<f64>().ok().map(|p| p.clamp(0.0, 100.0) as u8)
}

#[async_trait]
impl Extractor for YtDlpExtractor {
    async fn fetch_metadata(&self, url: &str, options: &FetchOptions) -> Result<Metadata> {
        let mut cmd = self.base_command();
        cmd.arg("-J");
        match options.flat {
            Flatness::Tree => {}
            // The CLI exposes a single flag for both shallow modes.
            Flatness::Flat | Flatness::FlatInPlaylist => {
                cmd.arg("--flat-playlist");
            }
        }
        if let Some(ref cookies) = options.cookie_file {
            cmd.arg("--cookies").arg(cookies);
        }
        cmd.arg(url);

        let output = cmd
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(Self::map_spawn_error)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::debug!("yt-dlp metadata fetch failed for {}: {}", url, stderr.trim());
            return Err(Error::Extract(format!(
                "{}: {}",
                url,
                stderr.lines().last().unwrap_or("unknown error").trim()
            )));
        }

        let metadata: Metadata = serde_json::from_slice(&output.stdout)?;
        Ok(metadata)
    }

    async fn fetch_and_store(
        &self,
        url: &str,
        dest_dir: &Path,
        kind: MediaKind,
        quality: QualitySpec,
        filename: Option<&str>,
        progress: Option<&TransferProgress>,
    ) -> Result<()> {
        let output_template = match filename {
            Some(name) => dest_dir.join(format!("{}.%(ext)s", name)),
            None => dest_dir.join("%(title)s.%(ext)s"),
        };

        let mut cmd = self.base_command();
        cmd.args(Self::format_args(kind, quality));
        cmd.arg("--newline");
        cmd.arg("-o").arg(&output_template);
        cmd.arg(url);

        let mut child = cmd
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(Self::map_spawn_error)?;

        // yt-dlp writes one progress line per chunk under --newline.
        if let Some(stdout) = child.stdout.take() {
            let mut lines = BufReader::new(stdout).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                if let (Some(pct), Some(sink)) = (parse_progress_line(&line), progress) {
                    sink(pct);
                }
            }
        }

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Self::classify_failure(url, &stderr));
        }

        if let Some(sink) = progress {
            sink(100);
        }
        Ok(())
    }
}
