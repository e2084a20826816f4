//! Calc Cache - In-process result caching for calculations
//!
//! Provides a bounded TTL cache with LRU, LFU or FIFO eviction, function
//! memoization, a parameter-keyed cache for amortization results, and
//! per-operation hit/latency metrics.

pub mod amortization;
pub mod cache;
pub mod calculation;
pub mod config;
pub mod error;
pub mod memo;
pub mod monitor;
pub mod tasks;

pub use cache::{Cache, CacheStats};
pub use calculation::{CalculationCache, CalculationParams};
pub use config::{CacheConfig, EvictionStrategy};
pub use error::{CacheError, Result};
pub use memo::{memoize, memoize_with_key, try_memoize, try_memoize_with_key, Memoized};
pub use monitor::{MetricSnapshot, OperationMonitor};
pub use tasks::spawn_cleanup_task;
