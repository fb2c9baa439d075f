//! Ordered fallback pipeline for image extraction
//!
//! Each stage implements one shared capability: produce a candidate URL from
//! parsed HTML. Stages run in a fixed priority order and a stage runs only if
//! every earlier stage yielded nothing, so adding or reordering a stage is a
//! local change. Every stage normalizes protocol-relative candidates to an
//! https URL before returning.

mod container;
mod inline;
mod script;
mod thumbnail;

pub use container::AlternateContainerFallback;
pub use inline::InlineImageScan;
pub use script::EmbeddedScriptScan;
pub use thumbnail::ThumbnailHostFallback;

use scraper::Html;

/// Signature of the upstream page's 1x1 transparent loading placeholder
pub(crate) const PLACEHOLDER_SIGNATURE: &str = "R0lGODlhAQABAIAAAP";

/// Inline-encoded images at or below this length are loading stand-ins,
/// never real product photos
pub(crate) const MIN_DATA_URI_LEN: usize = 200;

/// One heuristic strategy for finding an image URL in a results page
pub trait ExtractionStage {
    /// Short stage name for logging
    fn name(&self) -> &'static str;

    /// Scans the document and returns a candidate URL, if any
    fn extract(&self, document: &Html) -> Option<String>;
}

/// Normalizes a protocol-relative candidate to an explicit https URL
pub(crate) fn normalize_candidate(url: &str) -> String {
    match url.strip_prefix("//") {
        Some(rest) => format!("https://{}", rest),
        None => url.to_string(),
    }
}

/// Runs the full extraction pipeline over raw HTML
///
/// The earlier stage always wins when it produces any usable candidate; the
/// returned URL has not yet been through the final validator.
pub fn extract_image(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    let stages: [&dyn ExtractionStage; 4] = [
        &InlineImageScan,
        &ThumbnailHostFallback,
        &AlternateContainerFallback,
        &EmbeddedScriptScan,
    ];

    for stage in stages {
        if let Some(candidate) = stage.extract(&document) {
            tracing::debug!(
                "Extraction stage '{}' produced candidate: {:.100}",
                stage.name(),
                candidate
            );
            return Some(candidate);
        }
        tracing::trace!("Extraction stage '{}' produced nothing", stage.name());
    }

    None
}
