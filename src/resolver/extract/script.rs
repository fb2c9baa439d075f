//! Stage 4: embedded-script scan
//!
//! Last resort: regex-scan all inline script text for bare URLs ending in a
//! recognized image extension, then filter in two tiers. Tier one keeps URLs
//! that carry none of the non-product markers and at least one known
//! content-source marker; tier two relaxes to denylist-clean only; the final
//! fallback takes the first raw match unconditionally, which may well be an
//! irrelevant image — an accepted weakness of the original design.

use crate::resolver::extract::ExtractionStage;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};

static IMAGE_URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)https?://[^"'\s]+\.(?:jpg|jpeg|png|gif|webp)"#)
        .expect("image URL regex is valid")
});

/// Markers of logos, ads, tracking, known non-content hosts, and
/// test/placeholder domains
const EXCLUDE_MARKERS: &[&str] = &[
    "logo",
    "icon",
    "banner",
    "ads",
    "advertisement",
    "google.com",
    "gstatic.com",
    "googleusercontent.com",
    "youtube.com",
    "ytimg.com",
    "facebook",
    "twitter",
    "1x1",
    "pixel",
    "tracking",
    "analytics",
    "example.com",
    "test.com",
    "placeholder",
    "dummy",
];

/// Markers of hosts known to carry real product imagery
const PRIORITY_MARKERS: &[&str] = &[
    "ctfassets.net",
    "whosaeng.com",
    "k-health.com",
    "namu.wiki",
    "kpanews.co.kr",
    "mfds.go.kr",
    "nedrug.mfds.go.kr",
    "health.kr",
    "pharmnews",
    "medical",
    "pharm",
];

pub struct EmbeddedScriptScan;

impl ExtractionStage for EmbeddedScriptScan {
    fn name(&self) -> &'static str {
        "embedded-script"
    }

    fn extract(&self, document: &Html) -> Option<String> {
        let selector = Selector::parse("script").ok()?;

        let mut matches: Vec<String> = Vec::new();
        for element in document.select(&selector) {
            let text: String = element.text().collect();
            for found in IMAGE_URL_RE.find_iter(&text) {
                matches.push(found.as_str().to_string());
            }
        }

        if matches.is_empty() {
            return None;
        }
        tracing::debug!("Script scan found {} image URLs", matches.len());

        // Tier 1: denylist-clean and allowlisted
        if let Some(url) = matches
            .iter()
            .find(|url| is_denylist_clean(url) && has_priority_marker(url))
        {
            return Some(url.clone());
        }

        // Tier 2: denylist-clean regardless of allowlist
        if let Some(url) = matches.iter().find(|url| is_denylist_clean(url)) {
            return Some(url.clone());
        }

        // Tier 3: first raw match, unconditionally
        matches.into_iter().next()
    }
}

fn is_denylist_clean(url: &str) -> bool {
    let lower = url.to_lowercase();
    !EXCLUDE_MARKERS.iter().any(|marker| lower.contains(marker))
}

fn has_priority_marker(url: &str) -> bool {
    let lower = url.to_lowercase();
    PRIORITY_MARKERS.iter().any(|marker| lower.contains(marker))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(html: &str) -> Option<String> {
        let document = Html::parse_document(html);
        EmbeddedScriptScan.extract(&document)
    }

    #[test]
    fn test_no_scripts_yields_nothing() {
        assert!(extract("<html><body><p>text</p></body></html>").is_none());
    }

    #[test]
    fn test_allowlisted_url_beats_earlier_general_url() {
        let html = r#"<script>
            var a = "https://cdn.unknown-host.net/general.jpg";
            var b = "https://images.ctfassets.net/tylenol.png";
        </script>"#;

        assert_eq!(
            extract(html).as_deref(),
            Some("https://images.ctfassets.net/tylenol.png")
        );
    }

    #[test]
    fn test_denylisted_url_never_beats_allowlisted() {
        let html = r#"<script>
            var a = "https://random-ads.net/x.jpg";
            var b = "https://images.ctfassets.net/img/tylenol.png";
        </script>"#;

        assert_eq!(
            extract(html).as_deref(),
            Some("https://images.ctfassets.net/img/tylenol.png")
        );
    }

    #[test]
    fn test_relaxes_to_denylist_clean_without_allowlist_match() {
        let html = r#"<script>
            var a = "https://www.gstatic.com/ui/sprite.png";
            var b = "https://cdn.unknown-host.net/product.jpg";
        </script>"#;

        assert_eq!(
            extract(html).as_deref(),
            Some("https://cdn.unknown-host.net/product.jpg")
        );
    }

    #[test]
    fn test_last_resort_takes_first_raw_match() {
        let html = r#"<script>
            var a = "https://www.gstatic.com/first.png";
            var b = "https://www.gstatic.com/second.png";
        </script>"#;

        assert_eq!(extract(html).as_deref(), Some("https://www.gstatic.com/first.png"));
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let html = r#"<script>var a = "https://cdn.unknown-host.net/photo.JPG";</script>"#;
        assert_eq!(
            extract(html).as_deref(),
            Some("https://cdn.unknown-host.net/photo.JPG")
        );
    }

    #[test]
    fn test_urls_collected_across_multiple_scripts() {
        let html = r#"<html><head>
            <script>var a = "https://www.gstatic.com/noise.png";</script>
            <script>var b = "https://nedrug.mfds.go.kr/pill.jpg";</script>
        </head></html>"#;

        assert_eq!(
            extract(html).as_deref(),
            Some("https://nedrug.mfds.go.kr/pill.jpg")
        );
    }

    #[test]
    fn test_ignores_non_image_urls() {
        let html = r#"<script>var page = "https://cdn.unknown-host.net/page.html";</script>"#;
        assert!(extract(html).is_none());
    }
}
