//! Memory Cache Module
//!
//! Process-local TTL cache combining HashMap storage with insertion-order
//! tracking, lazy eviction on read and an explicit sweep.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::cache::{CacheEntry, CacheStats, Clock, KeyOrder, SystemClock};
use crate::config::CacheConfig;

/// Mutable state guarded by the cache lock.
#[derive(Debug)]
struct Store<V> {
    entries: HashMap<String, CacheEntry<V>>,
    order: KeyOrder,
    stats: CacheStats,
}

impl<V> Store<V> {
    fn new() -> Self {
        Self {
            entries: HashMap::new(),
            order: KeyOrder::new(),
            stats: CacheStats::new(),
        }
    }

    fn remove(&mut self, key: &str) -> bool {
        if self.entries.remove(key).is_some() {
            self.order.remove(key);
            true
        } else {
            false
        }
    }
}

// == Memory Cache ==
/// A keyed cache whose entries expire a fixed time after they were set.
///
/// An entry whose expiry has passed is never returned, but it keeps
/// occupying the store until a [`get`](Self::get) trips over it or
/// [`cleanup`](Self::cleanup) sweeps it. [`size`](Self::size) and
/// [`keys`](Self::keys) report that physical state, not the live one.
///
/// All methods take `&self`; share an instance with `Arc`.
pub struct MemoryCache<V> {
    name: String,
    default_ttl_ms: u64,
    clock: Arc<dyn Clock>,
    store: Mutex<Store<V>>,
}

impl<V: Clone> MemoryCache<V> {
    // == Constructor ==
    /// Creates a cache that reads the system clock.
    pub fn new(config: CacheConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Creates a cache with an injected time source.
    pub fn with_clock(config: CacheConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            name: config.name,
            default_ttl_ms: config.default_ttl_ms,
            clock,
            store: Mutex::new(Store::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn default_ttl_ms(&self) -> u64 {
        self.default_ttl_ms
    }

    // The store holds no cross-field invariant a panicking holder could
    // leave half-written, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, Store<V>> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // == Set ==
    /// Stores `value` under `key`, replacing any previous entry.
    ///
    /// `ttl_ms` falls back to the instance default when `None`.
    pub fn set(&self, key: impl Into<String>, value: V, ttl_ms: Option<u64>) {
        let key = key.into();
        let ttl_ms = ttl_ms.unwrap_or(self.default_ttl_ms);
        let entry = CacheEntry::new(value, self.clock.now_ms(), ttl_ms);

        let mut store = self.lock();
        if store.entries.insert(key.clone(), entry).is_none() {
            store.order.push(&key);
        }
        let len = store.entries.len();
        store.stats.set_total_entries(len);
        drop(store);

        debug!(cache = %self.name, key = %key, ttl_ms, "cache set");
    }

    // == Get ==
    /// Returns the live value for `key`.
    ///
    /// An expired entry found here is removed before returning `None`.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = self.clock.now_ms();
        let mut store = self.lock();

        let lookup = store
            .entries
            .get(key)
            .map(|entry| (!entry.is_expired(now)).then(|| entry.value.clone()));

        match lookup {
            Some(Some(value)) => {
                store.stats.record_hit();
                drop(store);
                debug!(cache = %self.name, key, "cache hit");
                Some(value)
            }
            Some(None) => {
                store.remove(key);
                store.stats.record_expired(1);
                store.stats.record_miss();
                let len = store.entries.len();
                store.stats.set_total_entries(len);
                drop(store);
                debug!(cache = %self.name, key, "cache miss (expired)");
                None
            }
            None => {
                store.stats.record_miss();
                drop(store);
                debug!(cache = %self.name, key, "cache miss");
                None
            }
        }
    }

    // == Get Or Fetch ==
    /// Returns the live value for `key`, or runs `fetcher` and caches its
    /// result.
    ///
    /// The lock is not held while `fetcher` runs, and concurrent callers are
    /// not deduplicated: two callers that both miss will both fetch, and the
    /// later `set` wins. A fetcher error is returned as-is and nothing is
    /// stored.
    pub async fn get_or_fetch<F, Fut, E>(
        &self,
        key: &str,
        fetcher: F,
        ttl_ms: Option<u64>,
    ) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(key) {
            return Ok(value);
        }

        let value = fetcher().await?;
        self.set(key, value.clone(), ttl_ms);
        Ok(value)
    }

    // == Invalidate ==
    /// Removes `key` whether or not it has expired. No-op if absent.
    pub fn invalidate(&self, key: &str) {
        let mut store = self.lock();
        if store.remove(key) {
            store.stats.record_invalidated(1);
            let len = store.entries.len();
            store.stats.set_total_entries(len);
            drop(store);
            debug!(cache = %self.name, key, "cache invalidate");
        }
    }

    // == Invalidate All ==
    /// Empties this instance.
    pub fn invalidate_all(&self) {
        let mut store = self.lock();
        let count = store.entries.len();
        store.entries.clear();
        store.order.clear();
        store.stats.record_invalidated(count);
        store.stats.set_total_entries(0);
        drop(store);

        debug!(cache = %self.name, count, "cache invalidate all");
    }

    // == Cleanup ==
    /// Removes every expired entry and returns how many were removed.
    pub fn cleanup(&self) -> usize {
        let now = self.clock.now_ms();
        let mut store = self.lock();

        let expired_keys: HashSet<String> = store
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();

        let count = expired_keys.len();
        if count > 0 {
            store.entries.retain(|key, _| !expired_keys.contains(key));
            store.order.remove_all(&expired_keys);
            store.stats.record_expired(count);
            let len = store.entries.len();
            store.stats.set_total_entries(len);
        }
        drop(store);

        if count > 0 {
            debug!(cache = %self.name, removed = count, "cache cleanup");
        }
        count
    }

    // == Keys ==
    /// Returns every physically present key, oldest insertion first.
    ///
    /// Expired entries not yet evicted are included.
    pub fn keys(&self) -> Vec<String> {
        self.lock().order.to_vec()
    }

    // == Size ==
    /// Returns the physical entry count, expired-but-unswept entries included.
    pub fn size(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    // == Liveness Probe ==
    /// Checks whether `key` holds a live entry, without evicting or
    /// touching statistics.
    pub fn contains_live(&self, key: &str) -> bool {
        let now = self.clock.now_ms();
        self.lock()
            .entries
            .get(key)
            .is_some_and(|entry| !entry.is_expired(now))
    }

    /// Remaining lifetime of a live entry in milliseconds.
    pub fn ttl_remaining_ms(&self, key: &str) -> Option<u64> {
        let now = self.clock.now_ms();
        self.lock()
            .entries
            .get(key)
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| entry.ttl_remaining_ms(now))
    }

    // == Stats ==
    /// Returns a snapshot of this instance's counters.
    pub fn stats(&self) -> CacheStats {
        let store = self.lock();
        let mut stats = store.stats.clone();
        stats.set_total_entries(store.entries.len());
        stats
    }
}

impl<V> fmt::Debug for MemoryCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryCache")
            .field("name", &self.name)
            .field("default_ttl_ms", &self.default_ttl_ms)
            .finish_non_exhaustive()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{ManualClock, DEFAULT_TTL};

    fn cache_at(start_ms: u64) -> (MemoryCache<String>, ManualClock) {
        let clock = ManualClock::new(start_ms);
        let cache = MemoryCache::with_clock(CacheConfig::new("test"), Arc::new(clock.clone()));
        (cache, clock)
    }

    #[test]
    fn test_cache_new() {
        let cache: MemoryCache<String> = MemoryCache::new(CacheConfig::new("projects"));
        assert_eq!(cache.name(), "projects");
        assert_eq!(cache.default_ttl_ms(), DEFAULT_TTL);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_set_uses_default_ttl() {
        let (cache, clock) = cache_at(0);

        cache.set("k", "v".to_string(), None);
        clock.advance(DEFAULT_TTL - 1);
        assert_eq!(cache.get("k").as_deref(), Some("v"));

        clock.advance(1);
        assert_eq!(cache.get("k"), None);
    }

    #[test]
    fn test_custom_default_ttl() {
        let clock = ManualClock::new(0);
        let cache: MemoryCache<u8> = MemoryCache::with_clock(
            CacheConfig::new("short").with_default_ttl_ms(100),
            Arc::new(clock.clone()),
        );

        cache.set("k", 1, None);
        clock.advance(100);
        assert_eq!(cache.get("k"), None);
    }

    #[test]
    fn test_overwrite_resets_ttl_and_keeps_position() {
        let (cache, clock) = cache_at(0);

        cache.set("a", "1".to_string(), Some(1_000));
        cache.set("b", "2".to_string(), Some(1_000));
        clock.advance(900);
        cache.set("a", "3".to_string(), Some(1_000));
        clock.advance(500);

        assert_eq!(cache.get("a").as_deref(), Some("3"));
        assert_eq!(cache.get("b"), None);
        assert_eq!(cache.keys(), vec!["a"]);
    }

    #[test]
    fn test_get_evicts_expired_entry() {
        let (cache, clock) = cache_at(0);

        cache.set("k", "v".to_string(), Some(10));
        clock.advance(10);

        assert_eq!(cache.size(), 1);
        assert_eq!(cache.get("k"), None);
        assert_eq!(cache.size(), 0);
        assert!(cache.keys().is_empty());
    }

    #[test]
    fn test_size_counts_unswept_expired_entries() {
        let (cache, clock) = cache_at(0);

        cache.set("a", "1".to_string(), Some(10));
        cache.set("b", "2".to_string(), Some(10_000));
        clock.advance(20);

        assert_eq!(cache.size(), 2);
        assert_eq!(cache.keys(), vec!["a", "b"]);
        assert!(!cache.contains_live("a"));
        assert_eq!(cache.size(), 2);
    }

    #[test]
    fn test_invalidate_absent_key_is_noop() {
        let (cache, _) = cache_at(0);
        cache.set("a", "1".to_string(), None);

        cache.invalidate("missing");

        assert_eq!(cache.size(), 1);
        assert_eq!(cache.stats().invalidated, 0);
    }

    #[test]
    fn test_invalidate_removes_expired_entry() {
        let (cache, clock) = cache_at(0);
        cache.set("a", "1".to_string(), Some(1));
        clock.advance(5);

        cache.invalidate("a");
        assert_eq!(cache.size(), 0);
    }

    #[test]
    fn test_cleanup_on_empty_store() {
        let (cache, _) = cache_at(0);
        assert_eq!(cache.cleanup(), 0);
        assert_eq!(cache.cleanup(), 0);
    }

    #[test]
    fn test_cleanup_is_idempotent() {
        let (cache, clock) = cache_at(0);
        cache.set("a", "1".to_string(), Some(10));
        cache.set("b", "2".to_string(), Some(10));
        clock.advance(10);

        assert_eq!(cache.cleanup(), 2);
        assert_eq!(cache.cleanup(), 0);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_ttl_remaining() {
        let (cache, clock) = cache_at(0);
        cache.set("a", "1".to_string(), Some(1_000));
        clock.advance(250);

        assert_eq!(cache.ttl_remaining_ms("a"), Some(750));
        assert_eq!(cache.ttl_remaining_ms("missing"), None);

        clock.advance(750);
        assert_eq!(cache.ttl_remaining_ms("a"), None);
    }

    #[test]
    fn test_stats_track_activity() {
        let (cache, clock) = cache_at(0);

        cache.set("a", "1".to_string(), Some(10));
        cache.set("b", "2".to_string(), None);
        cache.get("a"); // hit
        cache.get("missing"); // miss
        clock.advance(10);
        cache.get("a"); // miss, expired
        cache.invalidate("b");

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 2);
        assert_eq!(stats.expired, 1);
        assert_eq!(stats.invalidated, 1);
        assert_eq!(stats.total_entries, 0);
    }

    #[test]
    fn test_instances_are_isolated() {
        let (projects, _) = cache_at(0);
        let (posts, _) = cache_at(0);

        projects.set("k", "p".to_string(), None);
        posts.set("k", "q".to_string(), None);
        projects.invalidate_all();

        assert_eq!(projects.get("k"), None);
        assert_eq!(posts.get("k").as_deref(), Some("q"));
    }

    #[tokio::test]
    async fn test_get_or_fetch_error_writes_nothing() {
        let (cache, _) = cache_at(0);

        let result: Result<String, &str> = cache
            .get_or_fetch("k", || async { Err("boom") }, None)
            .await;

        assert_eq!(result, Err("boom"));
        assert_eq!(cache.size(), 0);
    }
}
