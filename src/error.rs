//! Error types for the cache drivers
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Config Error Enum ==
/// Startup configuration problems. None of these are recoverable at runtime.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// `CACHE_TYPE` names a driver this crate does not provide
    #[error("Cache type not supported: {0}")]
    UnsupportedDriver(String),

    /// A numeric variable could not be parsed
    #[error("Invalid value for {var}: {value:?}")]
    InvalidNumber { var: &'static str, value: String },

    /// `REDIS_ADDR` is not a usable `host:port`
    #[error("Invalid Redis address: {0:?}")]
    InvalidAddress(String),

    /// The sweep interval must be at least one second
    #[error("Sweep interval must be greater than zero")]
    ZeroInterval,
}

// == Cache Error Enum ==
/// Unified error type for cache operations.
///
/// The in-memory driver never produces one of these; remote failures pass
/// through untouched.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Backend could not be constructed from configuration
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Error reported by the Redis server or client
    #[error("Redis error: {0}")]
    Remote(#[from] redis::RedisError),
}

// == Result Type Alias ==
/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_messages() {
        let err = ConfigError::UnsupportedDriver("memcached".to_string());
        assert_eq!(err.to_string(), "Cache type not supported: memcached");

        let err = ConfigError::InvalidNumber {
            var: "REDIS_DB",
            value: "zero".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid value for REDIS_DB: \"zero\"");
    }

    #[test]
    fn test_config_error_converts_into_cache_error() {
        let err: CacheError = ConfigError::ZeroInterval.into();
        assert!(matches!(err, CacheError::Config(ConfigError::ZeroInterval)));
        assert_eq!(err.to_string(), "Sweep interval must be greater than zero");
    }
}
