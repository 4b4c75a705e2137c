//! Cache Module
//!
//! The `Cache` abstraction and its two drivers: an in-memory expiring store
//! and a Redis-backed remote store.

mod entry;
mod memory;
mod remote;
mod store;


use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use crate::config::{Config, DriverKind};
use crate::error::Result;

// Re-export public types
pub use entry::CacheEntry;
pub use memory::{MemoryCache, MIN_SWEEP_INTERVAL};
pub use remote::RedisCache;
pub use store::ExpiringStore;

// == Log Messages ==
pub(crate) const UNAVAILABLE_MSG: &str = "Cache is unavailable";

// == Cache Trait ==
/// Operations every cache driver provides.
///
/// While a driver reports itself unavailable, writes succeed without effect
/// and reads return `None`. A missing key, an expired key and a read from an
/// unavailable driver all look the same to the caller.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Returns the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key` with no expiration.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Stores `value` under `key`, expiring after `ttl_seconds`.
    ///
    /// A TTL of zero expires the key immediately.
    async fn set_with_expire(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<()>;

    /// Removes `key`. Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Removes every key.
    async fn flush(&self) -> Result<()>;

    /// Whether callers should treat the driver as usable.
    fn is_available(&self) -> bool;

    /// Overrides the availability flag.
    fn set_available(&self, available: bool);

    /// Constant naming the driver.
    fn driver_name(&self) -> &str;
}

// == Open Cache ==
/// Builds the driver selected by `config`.
///
/// The memory driver spawns its sweep task, so this must run inside a tokio
/// runtime.
pub async fn open_cache(config: &Config) -> Result<Arc<dyn Cache>> {
    info!("[{}] initiate cache", config.driver);

    let cache: Arc<dyn Cache> = match config.driver {
        DriverKind::Memory => Arc::new(MemoryCache::new(Duration::from_secs(
            config.sweep_interval,
        ))),
        DriverKind::Redis => Arc::new(RedisCache::connect(&config.redis).await?),
    };

    Ok(cache)
}
