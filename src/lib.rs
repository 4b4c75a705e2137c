//! Drivecache - a key-value cache with interchangeable drivers
//!
//! Callers program against the [`Cache`] trait; configuration decides whether
//! an in-memory expiring store or a Redis server sits behind it.

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use cache::{open_cache, Cache, MemoryCache, RedisCache};
pub use config::{Config, DriverKind, RedisOptions};
pub use error::{CacheError, ConfigError, Result};
pub use tasks::spawn_sweep_task;
