//! Cache Module
//!
//! Provides bounded in-memory caching with TTL expiration and LRU, LFU or
//! FIFO eviction.

mod entry;
mod shared;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::CacheEntry;
pub use shared::Cache;
pub use stats::{hit_rate, CacheStats};
pub use store::CacheStore;
