//! Playlist URL normalization and mix detection.

use url::Url;

/// Prefixes of algorithmically generated ("mix") playlist ids. Mixes are
/// session-scoped and cannot be fetched reliably by bare playlist id; they
/// need a seed video.
const MIX_PREFIXES: &[&str] = &[
    "RD", "RDE", "RDCL", "RDCLAK", "RDAMVM", "RDCM", "RDEO", "RDFM", "RDKM", "RDM", "RDTM", "RDV",
];

/// Canonical form of a playlist reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedPlaylist {
    /// Canonical URL to hand to the extraction engine.
    pub url: String,
    /// Whether the playlist id matched a known mix prefix.
    pub is_mix: bool,
    /// Playlist id, when one was present in the input.
    pub playlist_id: Option<String>,
    /// Seed video id, when the input was a watch URL.
    pub video_id: Option<String>,
}

impl NormalizedPlaylist {
    /// Anchor-item form of a mix: a watch URL carrying the playlist id.
    /// Mixes addressed this way resolve where the bare playlist URL fails.
    pub fn anchored_url(&self) -> Option<String> {
        match (&self.video_id, &self.playlist_id) {
            (Some(video), Some(playlist)) => Some(watch_url_with_list(video, playlist)),
            _ => None,
        }
    }
}

/// Check whether a playlist id denotes an algorithmic mix rather than a
/// user-authored playlist.
pub fn is_mix_id(playlist_id: &str) -> bool {
    MIX_PREFIXES.iter().any(|p| playlist_id.starts_with(p))
}

/// Normalize a playlist reference into its canonical fetchable form.
///
/// Watch URLs carrying a `list` parameter become playlist URLs; mixes with
/// a seed video become anchored watch URLs instead. Never fails: malformed
/// input is returned unchanged and classified as non-mix.
pub fn normalize_playlist_url(raw: &str) -> NormalizedPlaylist {
    let parsed = match Url::parse(raw) {
        Ok(u) => u,
        Err(e) => {
            tracing::warn!("Error normalizing URL, using original: {}", e);
            return NormalizedPlaylist {
                url: raw.to_string(),
                is_mix: false,
                playlist_id: None,
                video_id: None,
            };
        }
    };

    let mut playlist_id = None;
    let mut video_id = None;
    for (key, value) in parsed.query_pairs() {
        match key.as_ref() {
            "list" if playlist_id.is_none() => playlist_id = Some(value.into_owned()),
            "v" if video_id.is_none() => video_id = Some(value.into_owned()),
            _ => {}
        }
    }

    let Some(playlist_id) = playlist_id else {
        // No playlist id at all; assume it is already a usable reference.
        return NormalizedPlaylist {
            url: raw.to_string(),
            is_mix: false,
            playlist_id: None,
            video_id,
        };
    };

    let is_mix = is_mix_id(&playlist_id);
    let url = if is_mix {
        match &video_id {
            Some(video) => watch_url_with_list(video, &playlist_id),
            None => playlist_url(&playlist_id),
        }
    } else {
        playlist_url(&playlist_id)
    };

    NormalizedPlaylist {
        url,
        is_mix,
        playlist_id: Some(playlist_id),
        video_id,
    }
}

fn playlist_url(playlist_id: &str) -> String {
    format!("https://www.youtube.com/playlist?list={}", playlist_id)
}

fn watch_url_with_list(video_id: &str, playlist_id: &str) -> String {
    format!(
        "https://www.youtube.com/watch?v={}&list={}",
        video_id, playlist_id
    )
}

/// Canonical watch URL for a single video id.
pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}
