//! Search-result store operations.

use crate::model::SearchResult;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Fixed freshness window for stored results.
const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);

/// One stored result with its storage instant.
#[derive(Debug, Clone)]
struct CacheEntry {
    data: SearchResult,
    stored_at: Instant,
}

/// Time-bounded store mapping request identity to a computed result.
///
/// Entries are owned exclusively by the store; every read hands back a
/// copy with `cached` set to true. There is no size bound and no LRU
/// eviction; time is the only bound.
#[derive(Debug)]
pub struct SearchCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl Default for SearchCache {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchCache {
    /// Create a store with the fixed 1-hour TTL.
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }

    /// Create a store with an explicit TTL.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self { ttl, entries: Mutex::new(HashMap::new()) }
    }

    /// Look up a fresh entry by key.
    ///
    /// Returns a copy with `cached: true` when the entry is younger than
    /// the TTL. An expired entry is removed during the read, so a stale
    /// single-hit key does not linger in the map.
    pub fn get(&self, key: &str) -> Option<SearchResult> {
        let mut entries = self.entries.lock().expect("cache lock poisoned");

        match entries.get(key) {
            Some(entry) if entry.stored_at.elapsed() < self.ttl => {
                let mut data = entry.data.clone();
                data.cached = true;
                Some(data)
            }
            Some(_) => {
                tracing::debug!(key, "evicting expired cache entry");
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Store a result, unconditionally overwriting any entry for the key.
    ///
    /// The stored copy has `cached` forced to false and a fresh timestamp.
    pub fn put(&self, key: &str, data: &SearchResult) {
        let mut data = data.clone();
        data.cached = false;

        let entry = CacheEntry { data, stored_at: Instant::now() };
        self.entries
            .lock()
            .expect("cache lock poisoned")
            .insert(key.to_string(), entry);
    }

    /// Drop all entries immediately, returning how many were held.
    pub fn clear(&self) -> usize {
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        let count = entries.len();
        entries.clear();
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::cache_key;
    use crate::model::{ProductSummary, SearchResult};

    fn sample_result(query: &str) -> SearchResult {
        SearchResult {
            site: "Acme".into(),
            query: query.into(),
            page: 1,
            total_results: 1,
            results: vec![ProductSummary {
                product_code: Some("7X42AB".into()),
                title: "Cordless Drill".into(),
                brand: None,
                price: "$129.00".into(),
                rating: None,
                image: None,
                url: Some("https://acme.test/p7X42AB".into()),
            }],
            cached: false,
            timestamp: "2026-01-01T00:00:00Z".into(),
        }
    }

    #[test]
    fn test_put_then_get_marks_cached() {
        let cache = SearchCache::new();
        let key = cache_key("Acme", "drill", 1);

        cache.put(&key, &sample_result("drill"));

        let hit = cache.get(&key).unwrap();
        assert!(hit.cached);
        assert_eq!(hit.results, sample_result("drill").results);
    }

    #[test]
    fn test_get_missing() {
        let cache = SearchCache::new();
        assert!(cache.get("Acme::drill::1").is_none());
    }

    #[test]
    fn test_stored_copy_forces_cached_false() {
        let cache = SearchCache::new();
        let key = cache_key("Acme", "drill", 1);

        let mut result = sample_result("drill");
        result.cached = true;
        cache.put(&key, &result);

        // The read-side flag is set per lookup, not inherited from the caller.
        let hit = cache.get(&key).unwrap();
        assert!(hit.cached);
        let entries = cache.entries.lock().unwrap();
        assert!(!entries.get(&key).unwrap().data.cached);
    }

    #[test]
    fn test_expired_read_is_destructive() {
        let cache = SearchCache::with_ttl(Duration::from_millis(20));
        let key = cache_key("Acme", "drill", 1);
        cache.put(&key, &sample_result("drill"));

        std::thread::sleep(Duration::from_millis(40));

        assert!(cache.get(&key).is_none());
        assert!(cache.entries.lock().unwrap().is_empty());
        // A second consecutive lookup also misses cleanly.
        assert!(cache.get(&key).is_none());
    }

    #[test]
    fn test_put_overwrites() {
        let cache = SearchCache::new();
        let key = cache_key("Acme", "drill", 1);

        cache.put(&key, &sample_result("drill"));
        let mut updated = sample_result("drill");
        updated.results.clear();
        updated.total_results = 0;
        cache.put(&key, &updated);

        let hit = cache.get(&key).unwrap();
        assert_eq!(hit.total_results, 0);
    }

    #[test]
    fn test_distinct_casing_is_distinct_entry() {
        let cache = SearchCache::new();
        cache.put(&cache_key("Acme", "drill", 1), &sample_result("drill"));

        assert!(cache.get(&cache_key("Acme", "Drill", 1)).is_none());
        assert!(cache.get(&cache_key("Acme", "drill", 1)).is_some());
    }

    #[test]
    fn test_clear_drops_everything() {
        let cache = SearchCache::new();
        cache.put(&cache_key("Acme", "drill", 1), &sample_result("drill"));
        cache.put(&cache_key("Acme", "saw", 1), &sample_result("saw"));

        assert_eq!(cache.clear(), 2);
        assert!(cache.get(&cache_key("Acme", "drill", 1)).is_none());
        assert!(cache.get(&cache_key("Acme", "saw", 1)).is_none());
        assert_eq!(cache.clear(), 0);
    }
}
