//! In-memory TTL store using DashMap

use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use parking_lot::Mutex;

use tornlink_core::{CacheEntry, Clock, StoreStats, SystemClock};

/// Configuration for the memory store
#[derive(Debug, Clone)]
pub struct MemoryConfig {
    /// Maximum number of entries (0 = unlimited)
    pub max_capacity: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self { max_capacity: 0 }
    }
}

impl MemoryConfig {
    /// Create config with specific capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            max_capacity: capacity,
        }
    }
}

/// Internal statistics tracking
#[derive(Debug, Default)]
struct Counters {
    hits: u64,
    misses: u64,
    writes: u64,
    expired: u64,
}

/// Generic TTL store
///
/// `get` never returns an entry at or past its expiry; expired entries are
/// dropped lazily on lookup (or by [`MemoryStore::purge_expired`]).
/// Cloning creates a new handle to the SAME underlying store.
pub struct MemoryStore<K, V> {
    data: Arc<DashMap<K, CacheEntry<V>>>,
    counters: Arc<Mutex<Counters>>,
    clock: Arc<dyn Clock>,
    config: MemoryConfig,
}

impl<K, V> Clone for MemoryStore<K, V> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            counters: self.counters.clone(),
            clock: self.clock.clone(),
            config: self.config.clone(),
        }
    }
}

impl<K, V> MemoryStore<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Create a new store reading time from `clock`
    pub fn new(config: MemoryConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            data: Arc::new(DashMap::new()),
            counters: Arc::new(Mutex::new(Counters::default())),
            clock,
            config,
        }
    }

    /// Create with default configuration and the system clock
    pub fn with_defaults() -> Self {
        Self::new(MemoryConfig::default(), Arc::new(SystemClock))
    }

    /// Get a copy of the live value for `key`
    ///
    /// Returns `None` if the key is absent or has expired.
    pub fn get(&self, key: &K) -> Option<V> {
        let now = self.clock.now();
        match self.data.get(key) {
            Some(entry) if !entry.is_expired_at(now) => {
                let value = entry.value.clone();
                drop(entry);
                self.counters.lock().hits += 1;
                Some(value)
            }
            Some(entry) => {
                drop(entry);
                self.remove_expired(key, now);
                self.counters.lock().misses += 1;
                None
            }
            None => {
                self.counters.lock().misses += 1;
                None
            }
        }
    }

    /// Remaining lifetime of the live entry for `key`
    pub fn ttl_remaining(&self, key: &K) -> Option<Duration> {
        let now = self.clock.now();
        self.data.get(key).and_then(|entry| entry.ttl_remaining(now))
    }

    /// Store `value` under `key` for `ttl`, replacing any previous entry
    pub fn set(&self, key: K, value: V, ttl: Duration) {
        let now = self.clock.now();
        if !self.data.contains_key(&key) {
            self.maybe_evict(now);
        }
        self.data.insert(key, CacheEntry::new(value, now, ttl));
        self.counters.lock().writes += 1;
    }

    /// Remove the entry for `key`
    ///
    /// Returns `true` if the key existed.
    pub fn remove(&self, key: &K) -> bool {
        self.data.remove(key).is_some()
    }

    /// Check if a live entry exists for `key`
    pub fn contains(&self, key: &K) -> bool {
        let now = self.clock.now();
        self.data
            .get(key)
            .is_some_and(|entry| !entry.is_expired_at(now))
    }

    /// Drop every expired entry and return how many were removed
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let before = self.data.len();
        self.data.retain(|_, entry| !entry.is_expired_at(now));
        let removed = before.saturating_sub(self.data.len());
        self.counters.lock().expired += removed as u64;
        removed
    }

    /// Clear all entries
    pub fn clear(&self) {
        self.data.clear();
    }

    /// Number of stored entries, including expired ones not yet dropped
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get store statistics
    pub fn stats(&self) -> StoreStats {
        let counters = self.counters.lock();
        StoreStats {
            hits: counters.hits,
            misses: counters.misses,
            writes: counters.writes,
            expired: counters.expired,
            size: self.data.len(),
        }
    }

    fn remove_expired(&self, key: &K, now: Instant) {
        if self
            .data
            .remove_if(key, |_, entry| entry.is_expired_at(now))
            .is_some()
        {
            self.counters.lock().expired += 1;
        }
    }

    /// Make room for one more entry if at capacity
    fn maybe_evict(&self, now: Instant) {
        if self.config.max_capacity == 0 || self.data.len() < self.config.max_capacity {
            return;
        }

        if self.purge_expired() > 0 && self.data.len() < self.config.max_capacity {
            return;
        }

        // Still full: drop whichever entry would expire first
        let victim = self
            .data
            .iter()
            .min_by_key(|entry| entry.expires_at.saturating_duration_since(now))
            .map(|entry| entry.key().clone());

        if let Some(key) = victim {
            self.data.remove(&key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tornlink_core::ManualClock;

    fn store(clock: &ManualClock) -> MemoryStore<&'static str, i64> {
        MemoryStore::new(MemoryConfig::default(), Arc::new(clock.clone()))
    }

    #[test]
    fn test_basic_get_set() {
        let clock = ManualClock::new();
        let store = store(&clock);

        store.set("key1", 42, Duration::from_secs(60));
        assert_eq!(store.get(&"key1"), Some(42));
        assert_eq!(store.get(&"nonexistent"), None);
    }

    #[test]
    fn test_expiry_window() {
        let clock = ManualClock::new();
        let store = store(&clock);

        store.set("bars", 1, Duration::from_secs(10));

        clock.advance(Duration::from_millis(9_999));
        assert_eq!(store.get(&"bars"), Some(1));

        clock.advance(Duration::from_millis(1));
        assert_eq!(store.get(&"bars"), None);
        // Lazily removed on the failed lookup
        assert_eq!(store.len(), 0);
        assert_eq!(store.stats().expired, 1);
    }

    #[test]
    fn test_overwrite_refreshes_expiry() {
        let clock = ManualClock::new();
        let store = store(&clock);

        store.set("k", 1, Duration::from_secs(10));
        clock.advance(Duration::from_secs(8));
        store.set("k", 2, Duration::from_secs(10));
        clock.advance(Duration::from_secs(8));

        assert_eq!(store.get(&"k"), Some(2));
        assert_eq!(store.ttl_remaining(&"k"), Some(Duration::from_secs(2)));
    }

    #[test]
    fn test_purge_expired() {
        let clock = ManualClock::new();
        let store = store(&clock);

        store.set("short", 1, Duration::from_secs(1));
        store.set("long", 2, Duration::from_secs(100));
        clock.advance(Duration::from_secs(5));

        assert_eq!(store.purge_expired(), 1);
        assert_eq!(store.len(), 1);
        assert!(store.contains(&"long"));
        assert!(!store.contains(&"short"));
    }

    #[test]
    fn test_stats() {
        let clock = ManualClock::new();
        let store = store(&clock);

        store.set("key1", 1, Duration::from_secs(60));
        store.get(&"key1");
        store.get(&"nonexistent");

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.writes, 1);
        assert_eq!(stats.size, 1);
    }

    #[test]
    fn test_capacity_eviction_prefers_expired() {
        let clock = ManualClock::new();
        let store: MemoryStore<&str, i64> =
            MemoryStore::new(MemoryConfig::with_capacity(2), Arc::new(clock.clone()));

        store.set("stale", 1, Duration::from_secs(1));
        store.set("fresh", 2, Duration::from_secs(100));
        clock.advance(Duration::from_secs(2));
        store.set("new", 3, Duration::from_secs(100));

        assert_eq!(store.len(), 2);
        assert_eq!(store.get(&"fresh"), Some(2));
        assert_eq!(store.get(&"new"), Some(3));
    }

    #[test]
    fn test_clone_shares_data() {
        let clock = ManualClock::new();
        let store1 = store(&clock);
        let store2 = store1.clone();

        store1.set("key", 7, Duration::from_secs(5));
        assert_eq!(store2.get(&"key"), Some(7));
        assert!(store2.remove(&"key"));
        assert!(store1.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_writes_are_not_lost() {
        let store: MemoryStore<u32, u32> = MemoryStore::with_defaults();
        let mut handles = Vec::new();

        for i in 0..16u32 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                for j in 0..50u32 {
                    store.set(i * 100 + j, j, Duration::from_secs(60));
                }
            }));
        }
        for h in handles {
            h.await.unwrap();
        }

        assert_eq!(store.len(), 16 * 50);
        assert_eq!(store.stats().writes, 16 * 50);
    }
}
