//! Expiry Sweep Task
//!
//! Background task that periodically removes expired entries from the
//! in-memory store, until its cancellation token fires.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::cache::ExpiringStore;

/// Spawns a background task that periodically purges expired entries.
///
/// The task sleeps for `interval` between passes and takes the write lock
/// only for the duration of a purge. It exits as soon as `token` is
/// cancelled, including while it is asleep.
///
/// # Arguments
/// * `store` - shared reference to the store to sweep
/// * `interval` - time between sweeps
/// * `token` - cancellation signal that stops the task
///
/// # Example
/// ```ignore
/// let store = Arc::new(RwLock::new(ExpiringStore::new()));
/// let token = CancellationToken::new();
/// let handle = spawn_sweep_task(store.clone(), Duration::from_secs(1), token.clone());
/// // Later, during shutdown:
/// token.cancel();
/// handle.await?;
/// ```
pub fn spawn_sweep_task(
    store: Arc<RwLock<ExpiringStore>>,
    interval: Duration,
    token: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Starting expiry sweep with interval of {:?}", interval);

        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                _ = tokio::time::sleep(interval) => {}
            }

            let removed = store.write().await.purge_expired();

            if removed > 0 {
                info!("Expiry sweep: removed {} expired entries", removed);
            } else {
                debug!("Expiry sweep: no expired entries found");
            }
        }

        debug!("Expiry sweep stopped");
    })
}
