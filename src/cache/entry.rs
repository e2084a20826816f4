//! Cache Entry Module
//!
//! Defines the bookkeeping record for one cached value.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// A single cached value with its access metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    /// The stored value
    pub value: T,
    /// When the entry was inserted (or last overwritten)
    pub created_at: Instant,
    /// Number of successful reads since creation
    pub hit_count: u64,
    /// When the entry was last read, or created if never read
    pub last_accessed_at: Instant,
    /// Insertion sequence number; lower means inserted earlier
    pub sequence: u64,
}

impl<T> CacheEntry<T> {
    // == Constructor ==
    /// Creates a fresh entry stamped with the current instant.
    pub fn new(value: T, sequence: u64) -> Self {
        let now = Instant::now();
        Self {
            value,
            created_at: now,
            hit_count: 0,
            last_accessed_at: now,
            sequence,
        }
    }

    // == Age ==
    /// Time elapsed since creation.
    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }

    // == Is Expired ==
    /// Checks whether the entry has outlived `ttl`.
    ///
    /// Expiry is measured from creation, not from the last access: a hot entry
    /// expires at the same instant as a cold one inserted alongside it. The
    /// entry is still live at exactly `ttl`; it expires once the age exceeds it.
    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.age() > ttl
    }

    // == Touch ==
    /// Records a hit: bumps the hit count and refreshes the access instant.
    pub fn touch(&mut self) {
        self.hit_count += 1;
        self.last_accessed_at = Instant::now();
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_entry_creation() {
        let entry = CacheEntry::new("test_value".to_string(), 7);

        assert_eq!(entry.value, "test_value");
        assert_eq!(entry.hit_count, 0);
        assert_eq!(entry.sequence, 7);
        assert_eq!(entry.created_at, entry.last_accessed_at);
        assert!(!entry.is_expired(Duration::from_secs(60)));
    }

    #[test]
    fn test_entry_expiration() {
        let entry = CacheEntry::new(1u32, 0);

        assert!(!entry.is_expired(Duration::from_millis(50)));

        sleep(Duration::from_millis(80));

        assert!(entry.is_expired(Duration::from_millis(50)));
        assert!(!entry.is_expired(Duration::from_secs(60)));
    }

    #[test]
    fn test_touch_updates_metadata() {
        let mut entry = CacheEntry::new(1u32, 0);
        let created = entry.created_at;

        sleep(Duration::from_millis(5));
        entry.touch();
        entry.touch();

        assert_eq!(entry.hit_count, 2);
        assert!(entry.last_accessed_at > created);
        assert_eq!(entry.created_at, created);
    }

    #[test]
    fn test_touch_does_not_extend_lifetime() {
        let mut entry = CacheEntry::new(1u32, 0);

        sleep(Duration::from_millis(40));
        entry.touch();
        sleep(Duration::from_millis(40));

        // Age is measured from creation, so the read in between does not help
        assert!(entry.is_expired(Duration::from_millis(60)));
    }
}
