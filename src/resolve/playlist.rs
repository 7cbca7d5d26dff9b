//! Playlist enumeration.

use std::time::Duration;

use tokio::time::sleep;

use crate::engine::{Extractor, FetchOptions, Metadata};
use crate::error::Result;
use crate::resolve::normalize::{normalize_playlist_url, watch_url};
use crate::resolve::{ScrapeProgress, VideoItem};

/// Title used when upstream omits one for an entry.
const UNKNOWN_TITLE: &str = "Unknown Title";
/// Title returned when the playlist's own metadata cannot be fetched.
const UNKNOWN_PLAYLIST: &str = "Unknown Playlist";

/// Enumerates the members of one playlist through the extraction engine.
///
/// Enumeration is strictly sequential with a fixed delay after each item;
/// the delay is a throttling contract with upstream, not a timeout.
pub struct PlaylistScraper<'a, E: Extractor> {
    engine: &'a E,
    request_delay: Duration,
}

impl<'a, E: Extractor> PlaylistScraper<'a, E> {
    pub fn new(engine: &'a E, request_delay: Duration) -> Self {
        Self {
            engine,
            request_delay,
        }
    }

    /// Enumerate up to `max_videos` items of the playlist at `url`.
    ///
    /// Mixes get a shallow in-playlist listing and, when the first fetch
    /// fails and a seed video is known, one retry through the anchored
    /// watch-URL form. Any other failure propagates.
    pub async fn scrape(
        &self,
        url: &str,
        max_videos: usize,
        progress: Option<&ScrapeProgress<'_>>,
    ) -> Result<Vec<VideoItem>> {
        let normalized = normalize_playlist_url(url);
        let options = if normalized.is_mix {
            FetchOptions::flat_in_playlist()
        } else {
            FetchOptions::flat()
        };

        let metadata = self.fetch_with_mix_retry(&normalized.url, &options, &normalized).await?;

        let Some(entries) = metadata.entries.filter(|e| !e.is_empty()) else {
            tracing::warn!("No entries found in playlist. URL used: {}", normalized.url);
            return Ok(Vec::new());
        };

        let total = entries.len().min(max_videos);
        let mut videos = Vec::with_capacity(total);

        for entry in entries.into_iter().take(max_videos) {
            // Deleted or hidden playlist members come back as nulls.
            let Some(entry) = entry else { continue };
            let Some(id) = entry.id else {
                tracing::debug!("Skipping playlist entry without an id");
                continue;
            };

            videos.push(VideoItem {
                url: watch_url(&id),
                title: entry.title.unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
                duration_secs: entry.duration.unwrap_or(0.0) as u64,
                folder: String::new(),
            });

            if let Some(progress) = progress {
                let percentage = (videos.len() * 100 / total) as u8;
                progress(videos.len(), total, percentage);
            }

            sleep(self.request_delay).await;
        }

        Ok(videos)
    }

    /// Fetch the playlist's display title, with the same mix fallback as
    /// [`scrape`](Self::scrape). Never fails.
    pub async fn title(&self, url: &str) -> String {
        let normalized = normalize_playlist_url(url);
        let options = FetchOptions::flat();

        match self.fetch_with_mix_retry(&normalized.url, &options, &normalized).await {
            Ok(metadata) => metadata.title.unwrap_or_else(|| UNKNOWN_PLAYLIST.to_string()),
            Err(e) => {
                tracing::error!("Error getting playlist title: {}", e);
                UNKNOWN_PLAYLIST.to_string()
            }
        }
    }

    async fn fetch_with_mix_retry(
        &self,
        url: &str,
        options: &FetchOptions,
        normalized: &crate::resolve::NormalizedPlaylist,
    ) -> Result<Metadata> {
        match self.engine.fetch_metadata(url, options).await {
            Ok(metadata) => Ok(metadata),
            Err(first) => {
                // Mixes are unreliable by bare playlist id; the anchored
                // watch form is the dependable path.
                if normalized.is_mix {
                    if let Some(anchored) = normalized.anchored_url() {
                        tracing::debug!("Mix fetch failed, retrying via anchor: {}", anchored);
                        return self.engine.fetch_metadata(&anchored, options).await;
                    }
                }
                Err(first)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::engine::testing::MockExtractor;
    use crate::engine::{Entry, Metadata};
    use crate::error::Error;

    fn scraper(engine: &MockExtractor) -> PlaylistScraper<'_, MockExtractor> {
        PlaylistScraper::new(engine, Duration::ZERO)
    }

    #[tokio::test]
    async fn test_scrape_builds_watch_urls_with_defaults() {
        let engine = MockExtractor::new();
        let metadata = Metadata {
            entries: Some(vec![
                Some(Entry {
                    id: Some("vid1".into()),
                    title: Some("First".into()),
                    duration: Some(120.0),
                    url: None,
                }),
                Some(Entry {
                    id: Some("vid2".into()),
                    title: None,
                    duration: None,
                    url: None,
                }),
            ]),
            ..Default::default()
        };
        engine.on_metadata("https://www.youtube.com/playlist?list=PL1", Ok(metadata));

        let videos = scraper(&engine)
            .scrape("https://www.youtube.com/playlist?list=PL1", 200, None)
            .await
            .unwrap();

        assert_eq!(videos.len(), 2);
        assert_eq!(videos[0].url, "https://www.youtube.com/watch?v=vid1");
        assert_eq!(videos[0].title, "First");
        assert_eq!(videos[0].duration_secs, 120);
        assert_eq!(videos[1].title, "Unknown Title");
        assert_eq!(videos[1].duration_secs, 0);
    }

    #[tokio::test]
    async fn test_scrape_never_exceeds_max_videos() {
        let engine = MockExtractor::new();
        let entries: Vec<(String, String)> = (0..50)
            .map(|i| (format!("id{}", i), format!("title {}", i)))
            .collect();
        let pairs: Vec<(&str, &str)> = entries
            .iter()
            .map(|(a, b)| (a.as_str(), b.as_str()))
            .collect();
        engine.on_metadata(
            "https://www.youtube.com/playlist?list=PL1",
            Ok(MockExtractor::listing(&pairs)),
        );

        let videos = scraper(&engine)
            .scrape("https://www.youtube.com/playlist?list=PL1", 10, None)
            .await
            .unwrap();

        assert_eq!(videos.len(), 10);
    }

    #[tokio::test]
    async fn test_scrape_skips_null_entries() {
        let engine = MockExtractor::new();
        let metadata = Metadata {
            entries: Some(vec![
                None,
                Some(Entry {
                    id: Some("vid1".into()),
                    title: Some("Only".into()),
                    duration: None,
                    url: None,
                }),
                None,
            ]),
            ..Default::default()
        };
        engine.on_metadata("https://www.youtube.com/playlist?list=PL1", Ok(metadata));

        let videos = scraper(&engine)
            .scrape("https://www.youtube.com/playlist?list=PL1", 200, None)
            .await
            .unwrap();

        assert_eq!(videos.len(), 1);
        assert_eq!(videos[0].title, "Only");
    }

    #[tokio::test]
    async fn test_scrape_reports_progress() {
        let engine = MockExtractor::new();
        engine.on_metadata(
            "https://www.youtube.com/playlist?list=PL1",
            Ok(MockExtractor::listing(&[("a", "A"), ("b", "B"), ("c", "C"), ("d", "D")])),
        );

        let calls: Mutex<Vec<(usize, usize, u8)>> = Mutex::new(Vec::new());
        let progress = |done: usize, total: usize, pct: u8| {
            calls.lock().unwrap().push((done, total, pct));
        };

        scraper(&engine)
            .scrape("https://www.youtube.com/playlist?list=PL1", 200, Some(&progress))
            .await
            .unwrap();

        let calls = calls.into_inner().unwrap();
        assert_eq!(calls.len(), 4);
        assert_eq!(calls[0], (1, 4, 25));
        assert_eq!(calls[3], (4, 4, 100));
    }

    #[tokio::test]
    async fn test_mix_retries_via_anchored_url() {
        let engine = MockExtractor::new();
        let mix_url = "https://www.youtube.com/watch?v=seed&list=RD42";
        // The canonical and anchored forms coincide for a seeded mix, so
        // queue a failure then a success on the same URL.
        engine.on_metadata(mix_url, Err(Error::Extract("blocked".into())));
        engine.on_metadata(mix_url, Ok(MockExtractor::listing(&[("x", "X")])));

        let videos = scraper(&engine).scrape(mix_url, 200, None).await.unwrap();

        assert_eq!(videos.len(), 1);
        assert_eq!(engine.metadata_calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_mix_without_seed_does_not_retry() {
        let engine = MockExtractor::new();
        let mix_url = "https://www.youtube.com/playlist?list=RD42";
        engine.on_metadata(mix_url, Err(Error::Extract("blocked".into())));

        let result = scraper(&engine).scrape(mix_url, 200, None).await;

        assert!(result.is_err());
        assert_eq!(engine.metadata_calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_ordinary_playlist_failure_propagates() {
        let engine = MockExtractor::new();
        engine.on_metadata(
            "https://www.youtube.com/playlist?list=PL1",
            Err(Error::Extract("boom".into())),
        );

        let result = scraper(&engine)
            .scrape("https://www.youtube.com/playlist?list=PL1", 200, None)
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_title_falls_back_on_failure() {
        let engine = MockExtractor::new();
        let title = scraper(&engine)
            .title("https://www.youtube.com/playlist?list=PL404")
            .await;
        assert_eq!(title, "Unknown Playlist");
    }

    #[tokio::test]
    async fn test_title_returns_metadata_title() {
        let engine = MockExtractor::new();
        engine.on_metadata(
            "https://www.youtube.com/playlist?list=PL1",
            Ok(Metadata {
                title: Some("Road Trip".into()),
                ..Default::default()
            }),
        );

        let title = scraper(&engine)
            .title("https://www.youtube.com/playlist?list=PL1")
            .await;
        assert_eq!(title, "Road Trip");
    }
}
