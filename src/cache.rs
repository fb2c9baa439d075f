//! In-memory resolution cache with a fixed time-to-live
//!
//! Every resolution outcome is cached under the exact item name, including
//! negative ("confirmed no image") outcomes, so repeated lookups for the same
//! name never re-crawl within the TTL window. Entries expire lazily: an
//! expired entry is evicted on the read that observes it, never returned.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

/// A single cached resolution
///
/// `image_url == None` records a confirmed-negative result, which is distinct
/// from a cache miss: it suppresses re-crawling for the full TTL.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The resolved image URL, or None if no image was found
    pub image_url: Option<String>,

    /// When this entry was written
    pub inserted_at: DateTime<Utc>,
}

/// One row of the diagnostic cache snapshot
#[derive(Debug, Clone)]
pub struct CacheSnapshotEntry {
    /// The item name this entry is keyed by
    pub name: String,

    /// Whether the entry holds a positive result
    pub has_image: bool,

    /// First 100 characters of the URL, or None for negative entries
    pub url_preview: Option<String>,

    /// Age of the entry in whole minutes
    pub age_minutes: i64,
}

/// Name-keyed store of prior resolutions with a fixed TTL
///
/// Keys are exact item names: case-sensitive, no normalization. The map is
/// guarded by a mutex so the cache can be shared across a multi-threaded
/// runtime; no lock is held across any await point.
pub struct ImageCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl ImageCache {
    /// Creates an empty cache with the given TTL
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Creates an empty cache with a TTL expressed in hours
    pub fn with_ttl_hours(hours: i64) -> Self {
        Self::new(Duration::hours(hours))
    }

    /// Looks up an entry by name
    ///
    /// Returns None if the name is absent or the entry has outlived the TTL.
    /// An expired entry is deleted as a side effect of the read, so a stale
    /// value is never returned.
    pub fn get(&self, name: &str) -> Option<CacheEntry> {
        let mut entries = self.entries.lock().unwrap();
        match entries.get(name) {
            Some(entry) if Utc::now() - entry.inserted_at <= self.ttl => Some(entry.clone()),
            Some(_) => {
                entries.remove(name);
                tracing::debug!("Cache entry for '{}' expired, evicted", name);
                None
            }
            None => None,
        }
    }

    /// Inserts or overwrites an entry, stamped with the current time
    ///
    /// `image_url == None` records a confirmed-negative result.
    pub fn put(&self, name: &str, image_url: Option<String>) {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(
            name.to_string(),
            CacheEntry {
                image_url,
                inserted_at: Utc::now(),
            },
        );
    }

    /// Removes all entries, returning how many were removed
    pub fn clear(&self) -> usize {
        let mut entries = self.entries.lock().unwrap();
        let count = entries.len();
        entries.clear();
        tracing::info!("Cache cleared, {} entries removed", count);
        count
    }

    /// Removes one entry if present, returning whether it existed
    pub fn delete(&self, name: &str) -> bool {
        let mut entries = self.entries.lock().unwrap();
        entries.remove(name).is_some()
    }

    /// Returns the number of entries currently stored (expired or not)
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    /// Returns whether the cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }

    /// Read-only diagnostic view of the cache
    ///
    /// Unlike `get`, taking a snapshot does not expire anything; entries past
    /// their TTL still show up here with their real age.
    pub fn snapshot(&self) -> Vec<CacheSnapshotEntry> {
        let entries = self.entries.lock().unwrap();
        let now = Utc::now();
        entries
            .iter()
            .map(|(name, entry)| CacheSnapshotEntry {
                name: name.clone(),
                has_image: entry.image_url.is_some(),
                url_preview: entry
                    .image_url
                    .as_ref()
                    .map(|url| url.chars().take(100).collect()),
                age_minutes: (now - entry.inserted_at).num_minutes(),
            })
            .collect()
    }

    /// Backdates an existing entry's insertion time (test support)
    #[doc(hidden)]
    pub fn backdate(&self, name: &str, inserted_at: DateTime<Utc>) {
        let mut entries = self.entries.lock().unwrap();
        if let Some(entry) = entries.get_mut(name) {
            entry.inserted_at = inserted_at;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache_24h() -> ImageCache {
        ImageCache::with_ttl_hours(24)
    }

    #[test]
    fn test_miss_on_empty_cache() {
        let cache = cache_24h();
        assert!(cache.get("타이레놀").is_none());
    }

    #[test]
    fn test_put_then_get() {
        let cache = cache_24h();
        cache.put("타이레놀", Some("https://cdn.example.net/t.jpg".to_string()));

        let entry = cache.get("타이레놀").unwrap();
        assert_eq!(
            entry.image_url.as_deref(),
            Some("https://cdn.example.net/t.jpg")
        );
    }

    #[test]
    fn test_negative_entry_is_a_hit() {
        let cache = cache_24h();
        cache.put("unknown-pill", None);

        let entry = cache.get("unknown-pill").unwrap();
        assert!(entry.image_url.is_none());
    }

    #[test]
    fn test_keys_are_case_sensitive() {
        let cache = cache_24h();
        cache.put("Tylenol", Some("https://a/1.jpg".to_string()));

        assert!(cache.get("tylenol").is_none());
        assert!(cache.get("Tylenol").is_some());
    }

    #[test]
    fn test_put_overwrites() {
        let cache = cache_24h();
        cache.put("a", Some("https://a/1.jpg".to_string()));
        cache.put("a", Some("https://a/2.jpg".to_string()));

        let entry = cache.get("a").unwrap();
        assert_eq!(entry.image_url.as_deref(), Some("https://a/2.jpg"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_expired_entry_is_evicted_on_read() {
        let cache = cache_24h();
        cache.put("a", Some("https://a/1.jpg".to_string()));
        cache.backdate("a", Utc::now() - Duration::hours(25));

        assert!(cache.get("a").is_none());
        // The read itself removed the entry
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_entry_still_fresh_at_23_hours() {
        let cache = cache_24h();
        cache.put("a", Some("https://a/1.jpg".to_string()));
        cache.backdate("a", Utc::now() - Duration::hours(23));

        assert!(cache.get("a").is_some());
    }

    #[test]
    fn test_clear_returns_count() {
        let cache = cache_24h();
        cache.put("a", None);
        cache.put("b", Some("https://b/1.jpg".to_string()));

        assert_eq!(cache.clear(), 2);
        assert!(cache.is_empty());
        assert_eq!(cache.clear(), 0);
    }

    #[test]
    fn test_delete() {
        let cache = cache_24h();
        cache.put("a", None);

        assert!(cache.delete("a"));
        assert!(!cache.delete("a"));
        assert!(cache.get("a").is_none());
    }

    #[test]
    fn test_snapshot_fields() {
        let cache = cache_24h();
        let long_url = format!("https://cdn.example.net/{}", "x".repeat(200));
        cache.put("long", Some(long_url));
        cache.put("none", None);
        cache.backdate("none", Utc::now() - Duration::minutes(90));

        let mut snapshot = cache.snapshot();
        snapshot.sort_by(|a, b| a.name.cmp(&b.name));

        assert_eq!(snapshot.len(), 2);
        let long = &snapshot[0];
        assert!(long.has_image);
        assert_eq!(long.url_preview.as_ref().unwrap().len(), 100);

        let none = &snapshot[1];
        assert!(!none.has_image);
        assert!(none.url_preview.is_none());
        assert!(none.age_minutes >= 89 && none.age_minutes <= 91);
    }

    #[test]
    fn test_snapshot_does_not_evict() {
        let cache = cache_24h();
        cache.put("a", None);
        cache.backdate("a", Utc::now() - Duration::hours(25));

        let snapshot = cache.snapshot();
        assert_eq!(snapshot.len(), 1);
        // Still present until a get() observes it
        assert_eq!(cache.len(), 1);
    }
}
