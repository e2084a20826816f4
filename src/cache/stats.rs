//! Cache Statistics Module
//!
//! Point-in-time statistics snapshot of a cache engine.

use serde::Serialize;

// == Cache Stats ==
/// Snapshot of cache occupancy and approximate hit rate.
///
/// `total_hits` is the sum of the hit counts of the live entries and
/// `total_misses` counts one implicit miss per live entry (the load that
/// populated it). Lookups of keys that were never stored, and entries that
/// have since been evicted or expired, are not reflected, so `hit_rate` is an
/// approximation rather than a running total of every `get`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Current number of entries
    pub size: usize,
    /// Configured capacity
    pub max_size: usize,
    /// total_hits / (total_hits + total_misses), 0.0 when empty
    pub hit_rate: f64,
    /// Sum of per-entry hit counts
    pub total_hits: u64,
    /// One per live entry
    pub total_misses: u64,
    /// Entries removed by the eviction policy since creation or the last clear
    pub evictions: u64,
}

impl CacheStats {
    // == From Counts ==
    /// Builds a snapshot, deriving the hit rate from the counts.
    pub fn from_counts(
        size: usize,
        max_size: usize,
        total_hits: u64,
        total_misses: u64,
        evictions: u64,
    ) -> Self {
        Self {
            size,
            max_size,
            hit_rate: hit_rate(total_hits, total_misses),
            total_hits,
            total_misses,
            evictions,
        }
    }
}

// == Hit Rate ==
/// Returns hits / (hits + misses), or 0.0 if there were no requests.
pub fn hit_rate(hits: u64, misses: u64) -> f64 {
    let total = hits + misses;
    if total == 0 {
        0.0
    } else {
        hits as f64 / total as f64
    }
}
