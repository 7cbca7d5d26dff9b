//! Filename sanitization.

use std::sync::OnceLock;

use regex::Regex;

fn illegal_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"[\\/*?:",<>|]"#).unwrap())
}

fn symbol_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\w\s-]").unwrap())
}

fn space_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").unwrap())
}

/// Sanitize a string for use as a filename or single path segment.
///
/// Removes characters that are illegal on common filesystems, drops emojis
/// and other symbols, and replaces whitespace runs with underscores.
pub fn sanitize_filename(name: &str) -> String {
    let cleaned = illegal_re().replace_all(name, "");
    let cleaned = symbol_re().replace_all(&cleaned, "");
    let cleaned = cleaned.trim();
    space_re().replace_all(cleaned, "_").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removes_illegal_characters() {
        assert_eq!(sanitize_filename(r#"a/b\c:d*e?f"g<h>i|j"#), "abcdefghij");
    }

    #[test]
    fn test_spaces_become_underscores() {
        assert_eq!(sanitize_filename("My  Favorite   Song"), "My_Favorite_Song");
    }

    #[test]
    fn test_strips_symbols_and_emoji() {
        assert_eq!(sanitize_filename("Hits! 🔥 (2024)"), "Hits_2024");
    }

    #[test]
    fn test_keeps_hyphens() {
        assert_eq!(sanitize_filename("lo-fi beats"), "lo-fi_beats");
    }
}
