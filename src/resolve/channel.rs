//! Whole-channel resolution.
//!
//! Expands a channel URL into its playlists and standalone videos,
//! driving one [`PlaylistScraper`] per playlist and rescaling their
//! per-item progress into one overall percentage.

use std::path::PathBuf;
use std::time::Duration;

use tokio::time::sleep;

use crate::engine::{Extractor, FetchOptions};
use crate::error::Result;
use crate::fs::naming::sanitize_filename;
use crate::resolve::normalize::watch_url;
use crate::resolve::playlist::PlaylistScraper;
use crate::resolve::{PlaylistRef, ScrapeProgress, VideoItem};

const UNKNOWN_CHANNEL: &str = "Unknown Channel";

/// One scraped playlist with its enumerated members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapedPlaylist {
    pub playlist: PlaylistRef,
    pub videos: Vec<VideoItem>,
}

/// Everything found on a channel. Produced once, read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelContent {
    pub channel_name: String,
    pub playlists: Vec<ScrapedPlaylist>,
    pub standalone_videos: Vec<VideoItem>,
}

impl ChannelContent {
    /// Flatten into one download-ready list, tagging each item with its
    /// destination-relative folder: `<channel>/<playlist>` for playlist
    /// members, `<channel>/Random` for standalone videos.
    pub fn flatten(&self) -> Vec<VideoItem> {
        let channel = sanitize_filename(&self.channel_name);
        let mut items = Vec::with_capacity(self.total_items());

        for scraped in &self.playlists {
            let folder = format!("{}/{}", channel, sanitize_filename(&scraped.playlist.title));
            for video in &scraped.videos {
                let mut video = video.clone();
                video.folder = folder.clone();
                items.push(video);
            }
        }

        let random_folder = format!("{}/Random", channel);
        for video in &self.standalone_videos {
            let mut video = video.clone();
            video.folder = random_folder.clone();
            items.push(video);
        }

        items
    }

    pub fn total_items(&self) -> usize {
        self.playlists.iter().map(|p| p.videos.len()).sum::<usize>()
            + self.standalone_videos.len()
    }
}

/// Rescales a sub-task's percentage into the overall progress space.
///
/// `total` counts one unit per playlist plus one for the standalone pass.
/// An explicit value rather than captured counters, so a nested callback
/// can never report against a stale unit count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressWeight {
    pub completed: usize,
    pub total: usize,
}

impl ProgressWeight {
    /// Overall percentage with the current unit `inner_pct` done,
    /// linearly interpolated.
    pub fn overall(&self, inner_pct: u8) -> u8 {
        ((self.completed * 100 + inner_pct as usize) / self.total) as u8
    }

    /// Overall percentage at a unit boundary.
    pub fn boundary(&self) -> u8 {
        (self.completed * 100 / self.total) as u8
    }
}

/// Scrapes a channel's playlists and standalone videos.
///
/// Strictly sequential; the fixed delay between requests and between
/// playlists bounds the load put on upstream.
pub struct ChannelScraper<'a, E: Extractor> {
    engine: &'a E,
    request_delay: Duration,
    cookie_file: Option<PathBuf>,
}

impl<'a, E: Extractor> ChannelScraper<'a, E> {
    pub fn new(engine: &'a E, request_delay: Duration, cookie_file: Option<PathBuf>) -> Self {
        Self {
            engine,
            request_delay,
            cookie_file,
        }
    }

    /// Resolve a channel into its full content surface.
    ///
    /// A playlist whose enumeration fails is logged and skipped; the
    /// result is still returned even when every playlist failed.
    pub async fn scrape(
        &self,
        url: &str,
        max_videos_per_playlist: usize,
        progress: Option<&ScrapeProgress<'_>>,
    ) -> Result<ChannelContent> {
        let channel_url = normalize_channel_url(url);
        let channel_name = self.channel_name(&channel_url).await;

        if let Some(progress) = progress {
            progress(0, 100, 0);
        }

        let playlists = self.channel_playlists(&channel_url).await;
        let total_units = playlists.len() + 1;
        let mut completed = 0usize;
        let mut scraped_playlists = Vec::with_capacity(playlists.len());

        for playlist in playlists {
            let scraper = PlaylistScraper::new(self.engine, self.request_delay);
            let weight = ProgressWeight {
                completed,
                total: total_units,
            };
            let nested = move |_done: usize, _total: usize, pct: u8| {
                if let Some(progress) = progress {
                    progress(weight.completed + 1, weight.total, weight.overall(pct));
                }
            };

            match scraper
                .scrape(
                    &playlist.url,
                    max_videos_per_playlist,
                    Some(&nested as &ScrapeProgress),
                )
                .await
            {
                Ok(videos) => {
                    scraped_playlists.push(ScrapedPlaylist { playlist, videos });
                    completed += 1;
                    if let Some(progress) = progress {
                        let weight = ProgressWeight {
                            completed,
                            total: total_units,
                        };
                        progress(completed, total_units, weight.boundary());
                    }
                    sleep(self.request_delay).await;
                }
                Err(e) => {
                    tracing::warn!("Failed to scrape playlist {}: {}", playlist.title, e);
                    completed += 1;
                }
            }
        }

        let standalone_videos = self
            .standalone_videos(&channel_url, max_videos_per_playlist)
            .await;

        completed += 1;
        if let Some(progress) = progress {
            progress(completed, total_units, 100);
        }

        Ok(ChannelContent {
            channel_name,
            playlists: scraped_playlists,
            standalone_videos,
        })
    }

    /// Channel display name, `"Unknown Channel"` on any failure.
    async fn channel_name(&self, channel_url: &str) -> String {
        let options = FetchOptions::flat().with_cookies(self.cookie_file.clone());
        match self.engine.fetch_metadata(channel_url, &options).await {
            Ok(metadata) => metadata
                .channel
                .unwrap_or_else(|| UNKNOWN_CHANNEL.to_string()),
            Err(e) => {
                tracing::error!("Error getting channel name: {}", e);
                UNKNOWN_CHANNEL.to_string()
            }
        }
    }

    /// Discover the channel's playlists. Failure yields an empty list.
    async fn channel_playlists(&self, channel_url: &str) -> Vec<PlaylistRef> {
        let playlists_url = format!("{}/playlists", channel_url);
        let options = FetchOptions::flat().with_cookies(self.cookie_file.clone());

        let metadata = match self.engine.fetch_metadata(&playlists_url, &options).await {
            Ok(metadata) => metadata,
            Err(e) => {
                tracing::warn!("Could not extract playlists: {}", e);
                return Vec::new();
            }
        };

        let mut playlists = Vec::new();
        for entry in metadata.entries.into_iter().flatten().flatten() {
            let (Some(title), Some(url)) = (entry.title, entry.url) else {
                continue;
            };
            // The listing mixes playlists with other shelf entries.
            if !url.to_lowercase().contains("playlist") {
                continue;
            }
            playlists.push(PlaylistRef { title, url });
            sleep(self.request_delay).await;
        }
        playlists
    }

    /// The channel's ungrouped uploads, capped at `max_videos`.
    /// Failure yields an empty list.
    async fn standalone_videos(&self, channel_url: &str, max_videos: usize) -> Vec<VideoItem> {
        let videos_url = format!("{}/videos", channel_url);
        let options = FetchOptions::flat().with_cookies(self.cookie_file.clone());

        let metadata = match self.engine.fetch_metadata(&videos_url, &options).await {
            Ok(metadata) => metadata,
            Err(e) => {
                tracing::warn!("Could not extract standalone videos: {}", e);
                return Vec::new();
            }
        };

        let mut videos = Vec::new();
        for entry in metadata
            .entries
            .into_iter()
            .flatten()
            .take(max_videos)
            .flatten()
        {
            let (Some(id), Some(title)) = (entry.id, entry.title) else {
                continue;
            };
            videos.push(VideoItem {
                url: watch_url(&id),
                title: sanitize_filename(&title),
                duration_secs: entry.duration.unwrap_or(0.0) as u64,
                folder: String::new(),
            });
        }
        videos
    }
}

/// Normalize the supported channel URL shapes. Canonical `/channel/` URLs
/// pass through; `/user/` references are rebuilt without trailing parts.
pub fn normalize_channel_url(url: &str) -> String {
    if url.contains("/channel/") {
        url.to_string()
    } else if let Some(rest) = url.split("/user/").nth(1) {
        let username = rest.split('/').next().unwrap_or(rest);
        format!("https://www.youtube.com/user/{}", username)
    } else {
        url.to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::engine::testing::MockExtractor;
    use crate::engine::{Entry, Metadata};
    use crate::error::Error;

    const CHANNEL: &str = "https://www.youtube.com/channel/UC1";

    fn scraper(engine: &MockExtractor) -> ChannelScraper<'_, MockExtractor> {
        ChannelScraper::new(engine, Duration::ZERO, None)
    }

    fn playlist_entry(title: &str, list_id: &str) -> Option<Entry> {
        Some(Entry {
            id: None,
            title: Some(title.to_string()),
            url: Some(format!("https://www.youtube.com/playlist?list={}", list_id)),
            duration: None,
        })
    }

    fn stage_channel(engine: &MockExtractor) {
        engine.on_metadata(
            CHANNEL,
            Ok(Metadata {
                channel: Some("Ch1".into()),
                ..Default::default()
            }),
        );
        engine.on_metadata(
            &format!("{}/playlists", CHANNEL),
            Ok(Metadata {
                entries: Some(vec![
                    playlist_entry("Play1", "PL1"),
                    playlist_entry("Play2", "PL2"),
                ]),
                ..Default::default()
            }),
        );
        engine.on_metadata(
            "https://www.youtube.com/playlist?list=PL1",
            Ok(MockExtractor::listing(&[("a", "A"), ("b", "B")])),
        );
        engine.on_metadata(
            "https://www.youtube.com/playlist?list=PL2",
            Ok(MockExtractor::listing(&[("c", "C")])),
        );
        engine.on_metadata(
            &format!("{}/videos", CHANNEL),
            Ok(MockExtractor::listing(&[("z", "Loose One")])),
        );
    }

    #[tokio::test]
    async fn test_scrape_resolves_playlists_and_standalone() {
        let engine = MockExtractor::new();
        stage_channel(&engine);

        let content = scraper(&engine).scrape(CHANNEL, 200, None).await.unwrap();

        assert_eq!(content.channel_name, "Ch1");
        assert_eq!(content.playlists.len(), 2);
        assert_eq!(content.playlists[0].playlist.title, "Play1");
        assert_eq!(content.playlists[0].videos.len(), 2);
        assert_eq!(content.playlists[1].videos.len(), 1);
        assert_eq!(content.standalone_videos.len(), 1);
        assert_eq!(content.total_items(), 4);
    }

    #[tokio::test]
    async fn test_failed_playlist_is_skipped_not_fatal() {
        let engine = MockExtractor::new();
        engine.on_metadata(
            CHANNEL,
            Ok(Metadata {
                channel: Some("Ch1".into()),
                ..Default::default()
            }),
        );
        engine.on_metadata(
            &format!("{}/playlists", CHANNEL),
            Ok(Metadata {
                entries: Some(vec![
                    playlist_entry("Broken", "PL1"),
                    playlist_entry("Good", "PL2"),
                ]),
                ..Default::default()
            }),
        );
        engine.on_metadata(
            "https://www.youtube.com/playlist?list=PL1",
            Err(Error::Extract("gone".into())),
        );
        engine.on_metadata(
            "https://www.youtube.com/playlist?list=PL2",
            Ok(MockExtractor::listing(&[("c", "C")])),
        );
        engine.on_metadata(
            &format!("{}/videos", CHANNEL),
            Ok(Metadata::default()),
        );

        let content = scraper(&engine).scrape(CHANNEL, 200, None).await.unwrap();

        assert_eq!(content.playlists.len(), 1);
        assert_eq!(content.playlists[0].playlist.title, "Good");
    }

    #[tokio::test]
    async fn test_missing_channel_name_defaults() {
        let engine = MockExtractor::new();
        engine.on_metadata(&format!("{}/playlists", CHANNEL), Ok(Metadata::default()));
        engine.on_metadata(&format!("{}/videos", CHANNEL), Ok(Metadata::default()));

        let content = scraper(&engine).scrape(CHANNEL, 200, None).await.unwrap();

        assert_eq!(content.channel_name, "Unknown Channel");
        assert!(content.playlists.is_empty());
    }

    #[tokio::test]
    async fn test_progress_is_monotonic_and_ends_at_100() {
        let engine = MockExtractor::new();
        stage_channel(&engine);

        let seen: Mutex<Vec<u8>> = Mutex::new(Vec::new());
        let progress = |_done: usize, _total: usize, pct: u8| {
            seen.lock().unwrap().push(pct);
        };

        scraper(&engine)
            .scrape(CHANNEL, 200, Some(&progress))
            .await
            .unwrap();

        let seen = seen.into_inner().unwrap();
        assert!(seen.windows(2).all(|w| w[0] <= w[1]), "{:?}", seen);
        assert_eq!(*seen.last().unwrap(), 100);
    }

    #[test]
    fn test_progress_weight_interpolation() {
        let weight = ProgressWeight {
            completed: 1,
            total: 3,
        };
        assert_eq!(weight.overall(0), 33);
        assert_eq!(weight.overall(50), 50);
        assert_eq!(weight.overall(100), 66);
        assert_eq!(weight.boundary(), 33);
    }

    #[test]
    fn test_flatten_assigns_folders() {
        let content = ChannelContent {
            channel_name: "Ch1".into(),
            playlists: vec![ScrapedPlaylist {
                playlist: PlaylistRef {
                    title: "Play 1!".into(),
                    url: "u".into(),
                },
                videos: vec![VideoItem {
                    url: "v1".into(),
                    title: "t1".into(),
                    duration_secs: 0,
                    folder: String::new(),
                }],
            }],
            standalone_videos: vec![VideoItem {
                url: "v2".into(),
                title: "t2".into(),
                duration_secs: 0,
                folder: String::new(),
            }],
        };

        let items = content.flatten();
        assert_eq!(items[0].folder, "Ch1/Play_1");
        assert_eq!(items[1].folder, "Ch1/Random");
    }

    #[test]
    fn test_normalize_channel_url() {
        assert_eq!(
            normalize_channel_url("https://www.youtube.com/channel/UCabc"),
            "https://www.youtube.com/channel/UCabc"
        );
        assert_eq!(
            normalize_channel_url("https://www.youtube.com/user/somebody/videos"),
            "https://www.youtube.com/user/somebody"
        );
        assert_eq!(
            normalize_channel_url("https://www.youtube.com/@handle"),
            "https://www.youtube.com/@handle"
        );
    }
}
