//! TikTok URL validation.
//!
//! Validation is advisory hardening: it only keeps obviously foreign URLs
//! away from the resolution API. It never canonicalizes or follows redirects.

use std::fmt;
use std::sync::LazyLock;

use regex::RegexSet;
use thiserror::Error;

/// URL shapes accepted as TikTok video links (video page, short links,
/// mobile/alternate domains, legacy `/v/` links).
const TIKTOK_URL_PATTERNS: &[&str] = &[
    r"(?i)tiktok\.com/@.+/video/\d+",
    r"(?i)tiktok\.com/t/[a-z0-9]+",
    r"(?i)vm\.tiktok\.com/[a-z0-9]+",
    r"(?i)vt\.tiktok\.com/[a-z0-9]+",
    r"(?i)tiktok\.com/v/\d+",
    r"(?i)www\.tiktok\.com/[a-z]+/video/\d+",
];

static TIKTOK_URLS: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new(TIKTOK_URL_PATTERNS).expect("TikTok URL patterns are valid regexes")
});

/// Check whether `url` looks like a TikTok video link.
///
/// Returns `false` for empty (or whitespace-only) input and for anything that
/// matches none of the known shapes. Pure and deterministic.
pub fn is_valid_tiktok_url(url: &str) -> bool {
    !url.trim().is_empty() && TIKTOK_URLS.is_match(url)
}

/// Rejected input for [`SourceUrl::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidSourceUrl {
    /// No URL was supplied.
    #[error("TikTok URL is required")]
    Missing,

    /// The URL matches none of the recognized TikTok shapes.
    #[error("Invalid TikTok URL")]
    Unrecognized,
}

/// A source URL that passed [`is_valid_tiktok_url`].
///
/// The resolver port only accepts this type, so nothing reaches the network
/// without having been validated first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUrl(String);

impl SourceUrl {
    /// Validate a raw, possibly absent, URL.
    pub fn parse(raw: Option<&str>) -> Result<Self, InvalidSourceUrl> {
        let raw = raw.unwrap_or_default();
        if raw.is_empty() {
            return Err(InvalidSourceUrl::Missing);
        }
        if !is_valid_tiktok_url(raw) {
            return Err(InvalidSourceUrl::Unrecognized);
        }
        Ok(Self(raw.to_string()))
    }

    /// The URL exactly as the caller supplied it.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SourceUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_known_shapes() {
        let valid = [
            "https://www.tiktok.com/@user/video/1234567890123456789",
            "https://tiktok.com/@some.user_1/video/42",
            "https://www.tiktok.com/t/ZTRabc123/",
            "https://vm.tiktok.com/ZMabc123/",
            "https://vt.tiktok.com/ZSxyz789/",
            "https://www.tiktok.com/v/1234567890.html",
            "https://www.tiktok.com/embed/video/1234567890",
            "HTTPS://VM.TIKTOK.COM/ZMABC123/",
        ];
        for url in valid {
            assert!(is_valid_tiktok_url(url), "expected valid: {url}");
        }
    }

    #[test]
    fn test_rejects_foreign_and_malformed() {
        let invalid = [
            "",
            "   ",
            "https://example.com/not-tiktok",
            "https://www.tiktok.com/@user",
            "https://www.tiktok.com/@user/video/",
            "https://youtube.com/watch?v=abc",
            "tiktok",
        ];
        for url in invalid {
            assert!(!is_valid_tiktok_url(url), "expected invalid: {url}");
        }
    }

    #[test]
    fn test_validation_is_deterministic() {
        let url = "https://vm.tiktok.com/ZMabc123/";
        assert_eq!(is_valid_tiktok_url(url), is_valid_tiktok_url(url));
    }

    #[test]
    fn test_parse_missing() {
        assert_eq!(SourceUrl::parse(None), Err(InvalidSourceUrl::Missing));
        assert_eq!(SourceUrl::parse(Some("")), Err(InvalidSourceUrl::Missing));
    }

    #[test]
    fn test_parse_unrecognized() {
        assert_eq!(
            SourceUrl::parse(Some("https://example.com/not-tiktok")),
            Err(InvalidSourceUrl::Unrecognized)
        );
    }

    #[test]
    fn test_parse_keeps_input_verbatim() {
        let raw = "https://www.tiktok.com/@user/video/1234567890123456789?is_from_webapp=1";
        let url = SourceUrl::parse(Some(raw)).unwrap();
        assert_eq!(url.as_str(), raw);
        assert_eq!(url.to_string(), raw);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(InvalidSourceUrl::Missing.to_string(), "TikTok URL is required");
        assert_eq!(InvalidSourceUrl::Unrecognized.to_string(), "Invalid TikTok URL");
    }
}
