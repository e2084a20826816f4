//! Configuration Module
//!
//! Cache configuration with defaults, environment loading and validation.

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{CacheError, Result};

/// Default time-to-live for cache entries (5 minutes)
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Default maximum number of entries
pub const DEFAULT_MAX_SIZE: usize = 1000;

// == Eviction Strategy ==
/// Rule used to choose which entry to remove when the cache is full.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvictionStrategy {
    /// Least recently used: oldest last-access instant goes first
    #[default]
    Lru,
    /// Least frequently used: fewest hits goes first
    Lfu,
    /// First in, first out: oldest insertion goes first
    Fifo,
}

impl fmt::Display for EvictionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EvictionStrategy::Lru => "lru",
            EvictionStrategy::Lfu => "lfu",
            EvictionStrategy::Fifo => "fifo",
        };
        f.write_str(name)
    }
}

impl FromStr for EvictionStrategy {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lru" => Ok(EvictionStrategy::Lru),
            "lfu" => Ok(EvictionStrategy::Lfu),
            "fifo" => Ok(EvictionStrategy::Fifo),
            other => Err(CacheError::InvalidConfig(format!(
                "Unknown eviction strategy: {}",
                other
            ))),
        }
    }
}

// == Cache Config ==
/// Cache configuration parameters.
///
/// Immutable once handed to a cache instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum age of an entry, measured from its creation
    pub ttl: Duration,
    /// Maximum number of entries the cache can hold
    pub max_size: usize,
    /// Eviction rule applied when the cache is full
    pub strategy: EvictionStrategy,
}

impl CacheConfig {
    /// Creates a config with the given values.
    pub fn new(ttl: Duration, max_size: usize, strategy: EvictionStrategy) -> Self {
        Self {
            ttl,
            max_size,
            strategy,
        }
    }

    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_TTL_MS` - Entry TTL in milliseconds (default: 300000)
    /// - `CACHE_MAX_SIZE` - Maximum cache entries (default: 1000)
    /// - `CACHE_STRATEGY` - `lru`, `lfu` or `fifo` (default: lru)
    pub fn from_env() -> Self {
        Self {
            ttl: env::var("CACHE_TTL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_TTL),
            max_size: env::var("CACHE_MAX_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_SIZE),
            strategy: env::var("CACHE_STRATEGY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_default(),
        }
    }

    /// Returns a copy with a different TTL.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Returns a copy with a different size bound.
    pub fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_size = max_size;
        self
    }

    /// Returns a copy with a different eviction strategy.
    pub fn with_strategy(mut self, strategy: EvictionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    // == Validate ==
    /// Rejects configurations that would make the cache degenerate.
    pub fn validate(&self) -> Result<()> {
        if self.ttl.is_zero() {
            return Err(CacheError::InvalidConfig(
                "ttl must be greater than zero".to_string(),
            ));
        }
        if self.max_size == 0 {
            return Err(CacheError::InvalidConfig(
                "max_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    // == Clamped ==
    /// Returns a usable config, raising zero values to their minimum.
    ///
    /// A zero `max_size` becomes 1 and a zero `ttl` becomes 1 ms.
    pub fn clamped(self) -> Self {
        let mut config = self;
        if config.max_size == 0 {
            warn!("Cache max_size of 0 clamped to 1");
            config.max_size = 1;
        }
        if config.ttl.is_zero() {
            warn!("Cache ttl of 0 clamped to 1ms");
            config.ttl = Duration::from_millis(1);
        }
        config
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            max_size: DEFAULT_MAX_SIZE,
            strategy: EvictionStrategy::Lru,
        }
    }
}
