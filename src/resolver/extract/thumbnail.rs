//! Stage 2: known thumbnail-host fallback
//!
//! The search engine serves result thumbnails from a recognizable host
//! (`encrypted-tbn`). When the inline scan finds nothing, the first such
//! thumbnail whose declared dimensions exceed the minimum is good enough.

use crate::resolver::extract::{normalize_candidate, ExtractionStage};
use scraper::{Html, Selector};

/// Substring identifying the search engine's thumbnail host
const THUMBNAIL_HOST_MARKER: &str = "encrypted-tbn";

/// Thumbnails at or below this declared dimension are icons, not photos
const MIN_DIMENSION: u64 = 50;

pub struct ThumbnailHostFallback;

impl ExtractionStage for ThumbnailHostFallback {
    fn name(&self) -> &'static str {
        "thumbnail-host"
    }

    fn extract(&self, document: &Html) -> Option<String> {
        let selector = Selector::parse(&format!("img[src*=\"{}\"]", THUMBNAIL_HOST_MARKER)).ok()?;

        for element in document.select(&selector) {
            let src = match element.value().attr("src") {
                Some(s) => s,
                None => continue,
            };

            let width = element.value().attr("width");
            let height = element.value().attr("height");

            if dimension_ok(width) && dimension_ok(height) {
                return Some(normalize_candidate(src));
            }
        }

        None
    }
}

/// An undeclared dimension passes; a declared one must parse and exceed the
/// minimum
fn dimension_ok(attr: Option<&str>) -> bool {
    match attr {
        None | Some("") => true,
        Some(value) => value
            .parse::<u64>()
            .map(|n| n > MIN_DIMENSION)
            .unwrap_or(false),
    }
}
