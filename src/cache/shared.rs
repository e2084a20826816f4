//! Shared Cache Module
//!
//! Thread-safe handle over a [`CacheStore`].

use parking_lot::Mutex;
use tracing::{debug, info};

use crate::cache::{CacheStats, CacheStore};
use crate::config::CacheConfig;
use crate::error::Result;

// == Cache ==
/// Thread-safe cache engine.
///
/// Every operation, including the eviction scan and removal performed by
/// `set`, runs under a single lock acquisition, so the size bound holds
/// under concurrent writers. Values are returned by clone; entries never
/// leave the engine.
#[derive(Debug)]
pub struct Cache<T> {
    store: Mutex<CacheStore<T>>,
}

impl<T: Clone> Cache<T> {
    // == Constructors ==
    /// Creates a cache, clamping zero `ttl`/`max_size` values to their minimum.
    pub fn new(config: CacheConfig) -> Self {
        debug!(
            ttl_ms = config.ttl.as_millis() as u64,
            max_size = config.max_size,
            strategy = %config.strategy,
            "Creating cache"
        );
        Self {
            store: Mutex::new(CacheStore::new(config)),
        }
    }

    /// Creates a cache, rejecting zero `ttl`/`max_size` values.
    pub fn try_new(config: CacheConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config))
    }

    // == Operations ==
    /// Returns the stored value if present and unexpired.
    pub fn get(&self, key: &str) -> Option<T> {
        self.store.lock().get(key)
    }

    /// Stores a value, evicting one entry first if the cache is full.
    pub fn set(&self, key: &str, value: T) {
        self.store.lock().set(key, value);
    }

    /// Checks for a live entry without counting a hit.
    pub fn has(&self, key: &str) -> bool {
        self.store.lock().has(key)
    }

    /// Removes an entry. Returns whether one existed.
    pub fn delete(&self, key: &str) -> bool {
        self.store.lock().delete(key)
    }

    /// Removes every entry.
    pub fn clear(&self) {
        let mut store = self.store.lock();
        let removed = store.len();
        store.clear();
        info!(removed, "Cache cleared");
    }

    /// Sweeps expired entries. Returns how many were removed.
    pub fn cleanup(&self) -> usize {
        self.store.lock().cleanup()
    }

    pub fn stats(&self) -> CacheStats {
        self.store.lock().stats()
    }

    pub fn config(&self) -> CacheConfig {
        self.store.lock().config().clone()
    }

    pub fn len(&self) -> usize {
        self.store.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.lock().is_empty()
    }
}

impl<T: Clone> Default for Cache<T> {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EvictionStrategy;
    use crate::error::CacheError;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_cache_basic_operations() {
        let cache: Cache<String> = Cache::default();

        assert_eq!(cache.get("k"), None);
        cache.set("k", "v".to_string());
        assert_eq!(cache.get("k"), Some("v".to_string()));
        assert!(cache.has("k"));
        assert!(cache.delete("k"));
        assert!(!cache.has("k"));
    }

    #[test]
    fn test_cache_try_new_rejects_zero_size() {
        let result: Result<Cache<u32>> = Cache::try_new(CacheConfig::default().with_max_size(0));
        assert!(matches!(result, Err(CacheError::InvalidConfig(_))));
    }

    #[test]
    fn test_cache_new_clamps_zero_size() {
        let cache: Cache<u32> = Cache::new(CacheConfig::default().with_max_size(0));
        assert_eq!(cache.config().max_size, 1);
    }

    #[test]
    fn test_cache_concurrent_sets_respect_bound() {
        let max_size = 16;
        let cache: Arc<Cache<usize>> = Arc::new(Cache::new(
            CacheConfig::default()
                .with_max_size(max_size)
                .with_strategy(EvictionStrategy::Lfu),
        ));

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    for i in 0..200 {
                        cache.set(&format!("t{}-{}", t, i), i);
                        let _ = cache.get(&format!("t{}-{}", t, i / 2));
                        assert!(cache.len() <= max_size);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().expect("writer thread should not panic");
        }

        assert!(cache.stats().size <= max_size);
    }

    #[test]
    fn test_cache_clear() {
        let cache: Cache<u32> = Cache::default();
        cache.set("a", 1);
        cache.set("b", 2);
        cache.clear();
        assert!(cache.is_empty());
    }
}
