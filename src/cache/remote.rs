//! Redis Driver
//!
//! Thin forwarding `Cache` implementation over the `redis` crate. The server
//! is pinged once at construction; if that fails the driver starts out
//! unavailable and every call is skipped until the flag is set again.
//!
//! One multiplexed connection is opened on first use and cloned per call.
//! A failed command drops it so the next call reconnects.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client, RedisResult};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use url::Url;

use crate::cache::{Cache, UNAVAILABLE_MSG};
use crate::config::{DriverKind, RedisOptions};
use crate::error::{ConfigError, Result};

/// Redis-backed cache driver.
pub struct RedisCache {
    client: Client,
    conn: Mutex<Option<MultiplexedConnection>>,
    available: AtomicBool,
}

impl RedisCache {
    /// Creates the client and pings the server once.
    ///
    /// An unreachable server is not an error: the driver is returned marked
    /// unavailable. A malformed address is.
    pub async fn connect(options: &RedisOptions) -> Result<Self> {
        let client = Client::open(connection_url(options)?.as_str())?;
        let cache = Self {
            client,
            conn: Mutex::new(None),
            available: AtomicBool::new(false),
        };

        match cache.ping().await {
            Ok(()) => {
                info!("[{}] connected to {}", DriverKind::Redis, options.addr);
                cache.set_available(true);
            }
            Err(err) => {
                warn!(
                    "[{}] {}: ping to {} failed: {}",
                    DriverKind::Redis,
                    UNAVAILABLE_MSG,
                    options.addr,
                    err
                );
            }
        }

        Ok(cache)
    }

    async fn ping(&self) -> Result<()> {
        let mut conn = self.connection().await?;
        let result: RedisResult<String> = redis::cmd("PING").query_async(&mut conn).await;
        self.checked(result).await?;
        Ok(())
    }

    async fn connection(&self) -> Result<MultiplexedConnection> {
        let mut slot = self.conn.lock().await;
        if let Some(conn) = slot.as_ref() {
            return Ok(conn.clone());
        }

        let conn = self.client.get_multiplexed_async_connection().await?;
        *slot = Some(conn.clone());
        Ok(conn)
    }

    async fn checked<T>(&self, result: RedisResult<T>) -> Result<T> {
        if result.is_err() {
            self.conn.lock().await.take();
        }
        Ok(result?)
    }

    fn skip_if_unavailable(&self) -> bool {
        if self.is_available() {
            false
        } else {
            warn!("[{}] {}", DriverKind::Redis, UNAVAILABLE_MSG);
            true
        }
    }
}

/// Assembles `redis://[:password@]addr/db` from the options.
fn connection_url(options: &RedisOptions) -> std::result::Result<Url, ConfigError> {
    let invalid = || ConfigError::InvalidAddress(options.addr.clone());

    let mut url = Url::parse(&format!("redis://{}", options.addr)).map_err(|_| invalid())?;
    if url.host_str().map_or(true, str::is_empty) {
        return Err(invalid());
    }
    if let Some(password) = &options.password {
        url.set_password(Some(password)).map_err(|_| invalid())?;
    }
    url.set_path(&options.db.to_string());

    Ok(url)
}

#[async_trait]
impl Cache for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        if self.skip_if_unavailable() {
            return Ok(None);
        }

        let mut conn = self.connection().await?;
        let result: RedisResult<Option<String>> = conn.get(key).await;
        let value = self.checked(result).await?;
        debug!("[{}] Get cache {} (hit: {})", DriverKind::Redis, key, value.is_some());
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        if self.skip_if_unavailable() {
            return Ok(());
        }

        let mut conn = self.connection().await?;
        debug!("[{}] Set cache {}", DriverKind::Redis, key);
        let result: RedisResult<()> = conn.set(key, value).await;
        self.checked(result).await
    }

    async fn set_with_expire(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<()> {
        if self.skip_if_unavailable() {
            return Ok(());
        }

        let mut conn = self.connection().await?;
        debug!(
            "[{}] Set cache {} with TTL {}",
            DriverKind::Redis,
            key,
            ttl_seconds
        );

        // SETEX rejects 0; an immediately expiring key is a deleted key.
        let result: RedisResult<()> = if ttl_seconds == 0 {
            conn.del(key).await
        } else {
            conn.set_ex(key, value, ttl_seconds).await
        };
        self.checked(result).await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        if self.skip_if_unavailable() {
            return Ok(());
        }

        let mut conn = self.connection().await?;
        debug!("[{}] Delete cache {}", DriverKind::Redis, key);
        let result: RedisResult<()> = conn.del(key).await;
        self.checked(result).await
    }

    async fn flush(&self) -> Result<()> {
        if self.skip_if_unavailable() {
            return Ok(());
        }

        let mut conn = self.connection().await?;
        info!("[{}] Flush cache", DriverKind::Redis);
        let result: RedisResult<()> = redis::cmd("FLUSHDB").query_async(&mut conn).await;
        self.checked(result).await
    }

    fn is_available(&self) -> bool {
        self.available.load(Ordering::Acquire)
    }

    fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::Release);
    }

    fn driver_name(&self) -> &str {
        DriverKind::Redis.as_str()
    }
}

impl std::fmt::Debug for RedisCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCache")
            .field("available", &self.is_available())
            .finish()
    }
}
