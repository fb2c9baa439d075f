//! Stage 3: alternate-container fallback
//!
//! Newer result markup nests images inside a `<g-img>` wrapper element. This
//! stage looks for the first such nested image that is not the loading
//! placeholder, preferring the lazy-load source like stage 1 does.

use crate::resolver::extract::{normalize_candidate, ExtractionStage, PLACEHOLDER_SIGNATURE};
use scraper::{Html, Selector};

pub struct AlternateContainerFallback;

impl ExtractionStage for AlternateContainerFallback {
    fn name(&self) -> &'static str {
        "alternate-container"
    }

    fn extract(&self, document: &Html) -> Option<String> {
        let selector = Selector::parse("g-img img").ok()?;

        for element in document.select(&selector) {
            let src = element.value().attr("src");
            let data_src = element.value().attr("data-src");

            let candidate = match data_src.or(src) {
                Some(c) => c,
                None => continue,
            };

            if candidate.contains(PLACEHOLDER_SIGNATURE) {
                continue;
            }

            return Some(normalize_candidate(candidate));
        }

        None
    }
}
