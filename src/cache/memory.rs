//! In-Memory Driver
//!
//! `Cache` implementation over a locked `ExpiringStore`, with a background
//! sweep bound to the driver's lifetime.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cache::{Cache, ExpiringStore, UNAVAILABLE_MSG};
use crate::config::DriverKind;
use crate::error::Result;
use crate::tasks::spawn_sweep_task;

/// Shortest sweep interval accepted; smaller values are raised to this.
pub const MIN_SWEEP_INTERVAL: Duration = Duration::from_millis(100);

// == Memory Cache ==
/// Process-local cache driver.
///
/// Reads share the lock, writes and sweeps take it exclusively.
#[derive(Debug)]
pub struct MemoryCache {
    store: Arc<RwLock<ExpiringStore>>,
    available: AtomicBool,
    sweep_interval: Duration,
    shutdown: CancellationToken,
    sweeper: Mutex<Option<JoinHandle<()>>>,
}

impl MemoryCache {
    // == Constructor ==
    /// Creates an empty cache and starts its sweep task.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Arguments
    /// * `sweep_interval` - time between passes that remove expired entries,
    ///   at least [`MIN_SWEEP_INTERVAL`]
    pub fn new(sweep_interval: Duration) -> Self {
        if sweep_interval < MIN_SWEEP_INTERVAL {
            warn!(
                "[{}] sweep interval {:?} raised to {:?}",
                DriverKind::Memory,
                sweep_interval,
                MIN_SWEEP_INTERVAL
            );
        }
        let sweep_interval = sweep_interval.max(MIN_SWEEP_INTERVAL);

        let store = Arc::new(RwLock::new(ExpiringStore::new()));
        let shutdown = CancellationToken::new();
        let sweeper = spawn_sweep_task(store.clone(), sweep_interval, shutdown.clone());

        info!("[{}] cache ready", DriverKind::Memory);

        Self {
            store,
            available: AtomicBool::new(true),
            sweep_interval,
            shutdown,
            sweeper: Mutex::new(Some(sweeper)),
        }
    }

    /// Interval the sweep task was started with.
    pub fn sweep_interval(&self) -> Duration {
        self.sweep_interval
    }

    /// Number of entries physically held, including expired ones the sweep
    /// has not reached yet.
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    /// Returns true if no entries are held.
    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }

    // == Close ==
    /// Stops the sweep task and waits for it to exit.
    ///
    /// Stored entries remain readable. Calling this twice is harmless.
    pub async fn close(&self) {
        self.shutdown.cancel();

        if let Some(handle) = self.sweeper.lock().await.take() {
            if let Err(err) = handle.await {
                warn!("[{}] sweep task ended abnormally: {}", DriverKind::Memory, err);
            }
        }
    }

    fn skip_if_unavailable(&self) -> bool {
        if self.is_available() {
            false
        } else {
            warn!("[{}] {}", DriverKind::Memory, UNAVAILABLE_MSG);
            true
        }
    }
}

impl Drop for MemoryCache {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        if self.skip_if_unavailable() {
            return Ok(None);
        }

        let value = self.store.read().await.get(key).map(str::to_owned);
        debug!("[{}] Get cache {} (hit: {})", DriverKind::Memory, key, value.is_some());
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        if self.skip_if_unavailable() {
            return Ok(());
        }

        self.store
            .write()
            .await
            .set(key.to_string(), value.to_string());
        debug!("[{}] Set cache {}", DriverKind::Memory, key);
        Ok(())
    }

    async fn set_with_expire(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<()> {
        if self.skip_if_unavailable() {
            return Ok(());
        }

        self.store
            .write()
            .await
            .set_with_expire(key.to_string(), value.to_string(), ttl_seconds);
        debug!(
            "[{}] Set cache {} with TTL {}",
            DriverKind::Memory,
            key,
            ttl_seconds
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        if self.skip_if_unavailable() {
            return Ok(());
        }

        self.store.write().await.delete(key);
        debug!("[{}] Delete cache {}", DriverKind::Memory, key);
        Ok(())
    }

    async fn flush(&self) -> Result<()> {
        if self.skip_if_unavailable() {
            return Ok(());
        }

        self.store.write().await.flush();
        info!("[{}] Flush cache", DriverKind::Memory);
        Ok(())
    }

    fn is_available(&self) -> bool {
        self.available.load(Ordering::Acquire)
    }

    fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::Release);
    }

    fn driver_name(&self) -> &str {
        DriverKind::Memory.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache() -> MemoryCache {
        MemoryCache::new(Duration::from_secs(1))
    }

    #[tokio::test]
    async fn test_set_and_get() {
        let cache = cache();

        cache.set("key1", "value1").await.unwrap();
        assert_eq!(cache.get("key1").await.unwrap().as_deref(), Some("value1"));

        cache.set("key1", "new value").await.unwrap();
        assert_eq!(cache.get("key1").await.unwrap().as_deref(), Some("new value"));
    }

    #[tokio::test]
    async fn test_get_missing_key_is_not_an_error() {
        let cache = cache();
        assert_eq!(cache.get("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete() {
        let cache = cache();

        cache.set("key1", "value1").await.unwrap();
        cache.delete("key1").await.unwrap();
        assert_eq!(cache.get("key1").await.unwrap(), None);

        // Deleting again is a no-op
        cache.delete("key1").await.unwrap();
        assert_eq!(cache.get("key1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_flush_removes_everything() {
        let cache = cache();

        cache.set("a", "1").await.unwrap();
        cache.set_with_expire("b", "2", 60).await.unwrap();
        cache.flush().await.unwrap();

        assert_eq!(cache.get("a").await.unwrap(), None);
        assert_eq!(cache.get("b").await.unwrap(), None);
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_set_with_expire_then_expires() {
        let cache = cache();

        cache.set_with_expire("a", "1", 1).await.unwrap();
        assert_eq!(cache.get("a").await.unwrap().as_deref(), Some("1"));

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(cache.get("a").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_sweep_physically_removes_unread_entries() {
        let cache = cache();

        cache.set_with_expire("abandoned", "value", 1).await.unwrap();
        cache.set("kept", "value").await.unwrap();
        assert_eq!(cache.len().await, 2);

        tokio::time::sleep(Duration::from_millis(2500)).await;
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_zero_ttl_expires_immediately() {
        let cache = cache();

        cache.set_with_expire("a", "1", 0).await.unwrap();
        assert_eq!(cache.get("a").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_unavailable_cache_skips_operations() {
        let cache = cache();
        cache.set("kept", "value").await.unwrap();

        cache.set_available(false);
        assert!(!cache.is_available());

        cache.set("new", "value").await.unwrap();
        cache.delete("kept").await.unwrap();
        cache.flush().await.unwrap();
        assert_eq!(cache.get("kept").await.unwrap(), None);

        cache.set_available(true);
        assert_eq!(cache.get("kept").await.unwrap().as_deref(), Some("value"));
        assert_eq!(cache.get("new").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_driver_name() {
        let cache = cache();
        assert_eq!(cache.driver_name(), "memory");
        assert!(cache.is_available());
        assert_eq!(cache.sweep_interval(), Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_zero_interval_is_raised_to_minimum() {
        let cache = MemoryCache::new(Duration::ZERO);
        assert_eq!(cache.sweep_interval(), MIN_SWEEP_INTERVAL);

        cache.set_with_expire("a", "1", 0).await.unwrap();
        tokio::time::sleep(MIN_SWEEP_INTERVAL * 3).await;
        assert_eq!(cache.len().await, 0);

        cache.close().await;
    }

    #[tokio::test]
    async fn test_drop_stops_sweep() {
        let cache = MemoryCache::new(Duration::from_secs(3600));
        let store = Arc::downgrade(&cache.store);

        drop(cache);

        // The sweep task holds the last strong reference until it exits
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(store.upgrade().is_none(), "Sweep task should exit on drop");
    }

    #[tokio::test]
    async fn test_close_stops_sweep_and_keeps_data() {
        let cache = MemoryCache::new(Duration::from_secs(3600));
        cache.set("key1", "value1").await.unwrap();

        tokio::time::timeout(Duration::from_secs(1), cache.close())
            .await
            .expect("close should not wait for the next sweep");
        cache.close().await;

        assert_eq!(cache.get("key1").await.unwrap().as_deref(), Some("value1"));
    }
}
