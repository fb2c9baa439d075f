//! Search-results fetcher with client-identity rotation
//!
//! Issues the single outbound GET against the search engine's image-search
//! page. Every call picks one browser User-Agent uniformly at random from a
//! fixed rotation set and sends browser-like headers alongside it. Any
//! failure — non-2xx status or a network-level error — collapses to `None`;
//! the resolve contract never surfaces fetch errors to the caller.

use crate::config::SearchConfig;
use rand::seq::SliceRandom;
use reqwest::{header, redirect::Policy, Client};
use std::time::Duration;

/// Fixed rotation set of browser identities
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Edge/120.0.0.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_1) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
];

/// Builds the HTTP client shared by all crawls
///
/// Redirects are followed (up to 10 hops). The 30s/10s timeouts are the only
/// time bound anywhere in the pipeline; the resolver layer itself imposes
/// none.
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Selects one client identity uniformly at random for a single call
fn pick_user_agent() -> &'static str {
    USER_AGENTS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(USER_AGENTS[0])
}

/// Builds the search query string from the item name and qualifying suffix
fn search_query(config: &SearchConfig, name: &str) -> String {
    if config.query_suffix.is_empty() {
        name.to_string()
    } else {
        format!("{} {}", name, config.query_suffix)
    }
}

/// Fetches the image-search results page for an item name
///
/// Returns the response body only on a 2xx status. A non-2xx status or a
/// network exception yields `None`, not an error.
pub async fn fetch_search_page(
    client: &Client,
    config: &SearchConfig,
    name: &str,
) -> Option<String> {
    let base = config.base_url.trim_end_matches('/');
    let url = format!("{}/search", base);
    let query = search_query(config, name);
    let user_agent = pick_user_agent();

    tracing::debug!("Fetching search page for '{}' (ua: {})", name, user_agent);

    let response = client
        .get(&url)
        .query(&[
            ("udm", "2"),
            ("q", query.as_str()),
            ("hl", config.language.as_str()),
        ])
        .header(header::USER_AGENT, user_agent)
        .header(
            header::ACCEPT,
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
        )
        .header(header::ACCEPT_LANGUAGE, "ko-KR,ko;q=0.9,en;q=0.8")
        .header(header::CACHE_CONTROL, "no-cache")
        .header(header::REFERER, format!("{}/", base))
        .header("DNT", "1")
        .header("Upgrade-Insecure-Requests", "1")
        .send()
        .await;

    match response {
        Ok(response) if response.status().is_success() => match response.text().await {
            Ok(body) => Some(body),
            Err(e) => {
                tracing::warn!("Failed to read search response body for '{}': {}", name, e);
                None
            }
        },
        Ok(response) => {
            tracing::warn!(
                "Search fetch for '{}' returned status {}",
                name,
                response.status()
            );
            None
        }
        Err(e) => {
            tracing::warn!("Search fetch for '{}' failed: {}", name, e);
            None
        }
    }
}
