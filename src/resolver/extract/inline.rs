//! Stage 1: inline image scan
//!
//! Considers every `<img>` element in document order, preferring the
//! lazy-load `data-src` attribute over `src`. Placeholders, declared 1x1
//! images, short inline-encoded images, and branding/logo assets are
//! rejected; the first surviving candidate wins.

use crate::resolver::extract::{
    normalize_candidate, ExtractionStage, MIN_DATA_URI_LEN, PLACEHOLDER_SIGNATURE,
};
use scraper::{Html, Selector};

/// Path markers for logo/branding/icon assets that are never product photos
const BRANDING_MARKERS: &[&str] = &[
    "/logos/",
    "google.com/images/branding",
    "gstatic.com/images/icons",
];

pub struct InlineImageScan;

impl ExtractionStage for InlineImageScan {
    fn name(&self) -> &'static str {
        "inline-image"
    }

    fn extract(&self, document: &Html) -> Option<String> {
        let selector = Selector::parse("img").ok()?;

        for element in document.select(&selector) {
            let src = element.value().attr("src");
            let data_src = element.value().attr("data-src");

            // Lazy-load source takes precedence over the primary source
            let candidate = match data_src.or(src) {
                Some(c) => c,
                None => continue,
            };

            let width = element.value().attr("width");
            let height = element.value().attr("height");

            if is_placeholder(candidate, width, height) {
                continue;
            }

            if BRANDING_MARKERS
                .iter()
                .any(|marker| candidate.contains(marker))
            {
                continue;
            }

            if is_acceptable(candidate) {
                return Some(normalize_candidate(candidate));
            }
        }

        None
    }
}

/// A known 1x1/transparent loading stand-in, by content signature or by
/// declared dimensions
fn is_placeholder(url: &str, width: Option<&str>, height: Option<&str>) -> bool {
    url.contains(PLACEHOLDER_SIGNATURE) || (width == Some("1") && height == Some("1"))
}

/// Absolute scheme, protocol-relative, or a long enough inline-encoded image
fn is_acceptable(url: &str) -> bool {
    url.starts_with("http")
        || url.starts_with("//")
        || (url.starts_with("data:image") && url.len() > MIN_DATA_URI_LEN)
}
