//! Drivecache demo
//!
//! Opens the driver chosen by `CACHE_TYPE` and runs a short
//! set/get/delete/expire sequence against it.

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use drivecache::{open_cache, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "drivecache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Configuration errors are fatal: nothing can run without a driver
    let config = Config::from_env().context("Invalid cache configuration")?;
    info!(
        "Configuration loaded: driver={}, redis_addr={}, redis_db={}, sweep_interval={}s",
        config.driver, config.redis.addr, config.redis.db, config.sweep_interval
    );

    let cache = open_cache(&config)
        .await
        .context("Failed to open cache")?;
    info!(
        "Using {} driver (available: {})",
        cache.driver_name(),
        cache.is_available()
    );

    cache.set("key", "value").await?;

    let value = cache.get("key").await?;
    info!("Value: {}", value.as_deref().unwrap_or(""));

    cache.delete("key").await?;

    cache.set_with_expire("key", "value", 10).await?;

    info!("Done");
    Ok(())
}
