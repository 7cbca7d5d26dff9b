//! Media kind and quality selection types.

use std::fmt;

/// Which kind of payload to acquire for each item.
///
/// Dispatched at exactly two points: destination-root selection and the
/// engine's acquisition call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MediaKind {
    /// Audio-only download, remuxed to mp3 by the engine.
    Audio,
    /// Full video download.
    #[default]
    Video,
}

impl MediaKind {
    /// Root folder segment under the destination directory.
    pub fn root_folder(&self) -> &'static str {
        match self {
            MediaKind::Audio => "Music",
            MediaKind::Video => "Videos",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::Audio => write!(f, "audio"),
            MediaKind::Video => write!(f, "video"),
        }
    }
}

/// Quality preference, passed opaquely to the extraction engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QualitySpec {
    /// Best available format.
    #[default]
    Highest,
    /// Cap the vertical resolution (video only).
    MaxHeight(u32),
}

impl QualitySpec {
    /// Parse a user-facing quality string.
    ///
    /// Accepts "highest", "720p", "720" and similar; anything that does not
    /// contain digits falls back to [`QualitySpec::Highest`].
    pub fn parse(s: &str) -> Self {
        if s.eq_ignore_ascii_case("highest") {
            return QualitySpec::Highest;
        }
        let digits: String = s.chars().filter(|c| c.is_ascii_digit()).collect();
        match digits.parse::<u32>() {
            Ok(h) if h > 0 => QualitySpec::MaxHeight(h),
            _ => QualitySpec::Highest,
        }
    }
}

impl fmt::Display for QualitySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QualitySpec::Highest => write!(f, "highest"),
            QualitySpec::MaxHeight(h) => write!(f, "{}p", h),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_folder_by_kind() {
        assert_eq!(MediaKind::Audio.root_folder(), "Music");
        assert_eq!(MediaKind::Video.root_folder(), "Videos");
    }

    #[test]
    fn test_quality_parse() {
        assert_eq!(QualitySpec::parse("highest"), QualitySpec::Highest);
        assert_eq!(QualitySpec::parse("Highest"), QualitySpec::Highest);
        assert_eq!(QualitySpec::parse("720p"), QualitySpec::MaxHeight(720));
        assert_eq!(QualitySpec::parse("1080"), QualitySpec::MaxHeight(1080));
        assert_eq!(QualitySpec::parse("garbage"), QualitySpec::Highest);
    }
}
