//! Error types for the cache layer
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache layer.
///
/// Normal cache operations never fail; errors only arise from configuration
/// and from encoding memoization keys.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Configuration values that would make the cache degenerate
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Argument could not be encoded into a cache key
    #[error("Key encoding failed: {0}")]
    KeyEncoding(#[from] bincode::Error),
}

// == Result Type Alias ==
/// Convenience Result type for the cache layer.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_config_message() {
        let err = CacheError::InvalidConfig("max_size must be at least 1".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid configuration: max_size must be at least 1"
        );
    }

    #[test]
    fn test_key_encoding_from_bincode() {
        let bincode_err = bincode::deserialize::<u64>(&[1, 2]).unwrap_err();
        let err: CacheError = bincode_err.into();
        assert!(matches!(err, CacheError::KeyEncoding(_)));
        assert!(err.to_string().starts_with("Key encoding failed"));
    }
}
