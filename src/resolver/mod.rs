//! Image resolution orchestration
//!
//! This module composes the cache, the rate-limited queue, the fetcher, the
//! extraction pipeline, and the validator into a single `resolve(name)`
//! operation:
//!
//! 1. Check the cache; a hit returns immediately with zero network activity,
//!    even when the cached value is "no image".
//! 2. On a miss, submit the crawl (fetch → extract → validate) to the global
//!    rate-limited queue and await it.
//! 3. Write the outcome back to the cache unconditionally, positive or
//!    negative, then return it tagged as crawled.
//!
//! Everything inside the crawl collapses to a two-valued outcome (image
//! found / not found); fetch and extraction failures are never surfaced as
//! errors to the resolve caller.

mod extract;
mod fetcher;
mod validator;

pub use extract::{extract_image, ExtractionStage};
pub use fetcher::{build_http_client, fetch_search_page};
pub use validator::validate;

use crate::cache::{CacheSnapshotEntry, ImageCache};
use crate::config::{Config, SearchConfig};
use crate::queue::RateLimitedQueue;
use crate::{MedImageError, Result};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

/// Where a resolution came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveSource {
    /// Served from the cache, no network activity
    Cache,
    /// Freshly crawled from the search engine
    Crawled,
}

impl ResolveSource {
    /// Wire representation used by the API
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolveSource::Cache => "cache",
            ResolveSource::Crawled => "crawled",
        }
    }
}

/// Outcome of a resolve call
#[derive(Debug, Clone)]
pub struct Resolution {
    /// The resolved image URL; None means "confirmed no image"
    pub image_url: Option<String>,

    /// Whether this came from the cache or a fresh crawl
    pub source: ResolveSource,
}

/// Orchestrates image resolution over shared cache and queue state
///
/// The hosting application constructs the cache once and injects it here;
/// the queue worker is owned by this resolver and lives as long as any
/// clone of it.
pub struct Resolver {
    cache: Arc<ImageCache>,
    queue: RateLimitedQueue<Option<String>>,
    client: Client,
    search: SearchConfig,
}

impl Resolver {
    /// Creates a resolver around an injected cache
    ///
    /// Must be called inside a tokio runtime; the queue worker is spawned
    /// here.
    pub fn new(config: &Config, cache: Arc<ImageCache>) -> Result<Self> {
        let client = build_http_client()?;
        let queue = RateLimitedQueue::new(Duration::from_millis(
            config.resolver.min_dispatch_interval_ms,
        ));

        Ok(Self {
            cache,
            queue,
            client,
            search: config.search.clone(),
        })
    }

    /// Creates a resolver and its cache straight from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let cache = Arc::new(ImageCache::with_ttl_hours(config.resolver.cache_ttl_hours));
        Self::new(config, cache)
    }

    /// Resolves a representative image URL for the named item
    ///
    /// # Errors
    ///
    /// `MissingParameter` if `name` is empty. Fetch and extraction failures
    /// are not errors; they resolve to `image_url: None`.
    pub async fn resolve(&self, name: &str) -> Result<Resolution> {
        if name.is_empty() {
            return Err(MedImageError::MissingParameter("name"));
        }

        if let Some(entry) = self.cache.get(name) {
            tracing::info!("Cache hit for '{}'", name);
            return Ok(Resolution {
                image_url: entry.image_url,
                source: ResolveSource::Cache,
            });
        }

        tracing::info!("Cache miss for '{}', queueing crawl", name);
        let client = self.client.clone();
        let search = self.search.clone();
        let crawl_name = name.to_string();
        let image_url = self
            .queue
            .submit(async move { crawl_image(&client, &search, &crawl_name).await })
            .await
            .map_err(|e| MedImageError::QueueClosed(e.to_string()))?;

        // Negative outcomes are cached too, so repeated misses for the same
        // name stay quiet for a full TTL.
        self.cache.put(name, image_url.clone());

        match &image_url {
            Some(url) => tracing::info!("Resolved '{}' to {:.100}", name, url.as_str()),
            None => tracing::info!("No image found for '{}'", name),
        }

        Ok(Resolution {
            image_url,
            source: ResolveSource::Crawled,
        })
    }

    /// Removes all cache entries, returning how many were removed
    pub fn clear_cache(&self) -> usize {
        self.cache.clear()
    }

    /// Removes one cache entry, returning whether it existed
    pub fn delete_cache_entry(&self, name: &str) -> bool {
        self.cache.delete(name)
    }

    /// Diagnostic view of the cache
    pub fn cache_snapshot(&self) -> Vec<CacheSnapshotEntry> {
        self.cache.snapshot()
    }

    /// Number of entries currently cached
    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}

/// The crawl pipeline: fetch, extract, validate
///
/// Any failure along the way yields None; nothing here retries.
async fn crawl_image(client: &Client, search: &SearchConfig, name: &str) -> Option<String> {
    let html = fetch_search_page(client, search, name).await?;
    let candidate = extract_image(&html)?;
    validate(candidate)
}
