//! Cache Store Module
//!
//! Single-owner cache engine combining HashMap storage with per-entry
//! insertion sequence numbers, TTL expiration and policy-driven eviction.

use std::collections::HashMap;

use tracing::debug;

use crate::cache::{CacheEntry, CacheStats};
use crate::config::{CacheConfig, EvictionStrategy};

// == Cache Store ==
/// Bounded key/value storage with TTL expiry and LRU/LFU/FIFO eviction.
///
/// All operations take `&mut self`; see [`crate::cache::Cache`] for the
/// thread-safe handle.
#[derive(Debug)]
pub struct CacheStore<T> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<T>>,
    /// Sequence number handed to the next new key
    next_sequence: u64,
    /// Immutable configuration
    config: CacheConfig,
    /// Policy evictions since creation or the last clear
    evictions: u64,
}

impl<T: Clone> CacheStore<T> {
    // == Constructor ==
    /// Creates a new store. Zero `ttl` or `max_size` values are clamped.
    pub fn new(config: CacheConfig) -> Self {
        Self {
            entries: HashMap::new(),
            next_sequence: 0,
            config: config.clamped(),
            evictions: 0,
        }
    }

    // == Set ==
    /// Stores a value, replacing any previous value under the same key.
    ///
    /// When the cache is full and `key` is new, exactly one entry is evicted
    /// first. The stored entry always starts fresh: new creation instant and a
    /// hit count of zero. An overwrite keeps the key's insertion position.
    pub fn set(&mut self, key: &str, value: T) {
        let sequence = match self.entries.get(key) {
            Some(existing) => existing.sequence,
            None => {
                if self.entries.len() >= self.config.max_size {
                    self.evict_one();
                }
                let sequence = self.next_sequence;
                self.next_sequence += 1;
                sequence
            }
        };

        self.entries.insert(key.to_string(), CacheEntry::new(value, sequence));
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Returns `None` for missing keys. Expired entries are removed and
    /// reported as missing. A hit bumps the entry's hit count and access time.
    pub fn get(&mut self, key: &str) -> Option<T> {
        if self.remove_if_expired(key) {
            return None;
        }

        let entry = self.entries.get_mut(key)?;
        entry.touch();
        Some(entry.value.clone())
    }

    // == Has ==
    /// Checks for a live entry without counting a hit.
    pub fn has(&mut self, key: &str) -> bool {
        if self.remove_if_expired(key) {
            return false;
        }
        self.entries.contains_key(key)
    }

    // == Delete ==
    /// Removes an entry by key. Returns whether an entry existed.
    pub fn delete(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    // == Clear ==
    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.evictions = 0;
    }

    // == Cleanup ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup(&mut self) -> usize {
        let ttl = self.config.ttl;
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(ttl))
            .map(|(key, _)| key.clone())
            .collect();

        let count = expired_keys.len();

        for key in expired_keys {
            self.entries.remove(&key);
        }

        count
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let total_hits = self.entries.values().map(|entry| entry.hit_count).sum();
        let total_misses = self.entries.len() as u64;

        CacheStats::from_counts(
            self.entries.len(),
            self.config.max_size,
            total_hits,
            total_misses,
            self.evictions,
        )
    }

    // == Config ==
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    // == Length ==
    /// Returns the current number of entries, expired ones included until
    /// they are discovered or swept.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops `key` if it holds an expired entry. Returns whether it did.
    fn remove_if_expired(&mut self, key: &str) -> bool {
        let expired = self
            .entries
            .get(key)
            .is_some_and(|entry| entry.is_expired(self.config.ttl));

        if expired {
            self.entries.remove(key);
            debug!(key, "Removed expired cache entry on access");
        }
        expired
    }

    // == Evict One ==
    /// Removes the entry chosen by the configured strategy.
    ///
    /// Ties go to the earliest inserted key. No-op on an empty table.
    fn evict_one(&mut self) {
        let Some(victim) = self.select_victim() else {
            return;
        };

        self.entries.remove(&victim);
        self.evictions += 1;
        debug!(key = %victim, strategy = %self.config.strategy, "Evicted cache entry");
    }

    fn select_victim(&self) -> Option<String> {
        let candidates = self.entries.iter();

        let victim = match self.config.strategy {
            EvictionStrategy::Lru => {
                candidates.min_by_key(|(_, entry)| (entry.last_accessed_at, entry.sequence))
            }
            EvictionStrategy::Lfu => {
                candidates.min_by_key(|(_, entry)| (entry.hit_count, entry.sequence))
            }
            EvictionStrategy::Fifo => candidates.min_by_key(|(_, entry)| entry.sequence),
        };

        victim.map(|(key, _)| key.clone())
    }
}
