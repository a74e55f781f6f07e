//! TTL Cleanup Task
//!
//! Background task that periodically sweeps expired cache entries.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::MemoryCache;

/// Spawns a background task that calls [`MemoryCache::cleanup`] every
/// `interval`.
///
/// The task runs until its handle is aborted. The first sweep happens one
/// full interval after spawning.
///
/// # Example
/// ```ignore
/// let cache = Arc::new(MemoryCache::<String>::new(CacheConfig::new("posts")));
/// let cleanup_handle = spawn_cleanup_task(cache.clone(), Duration::from_secs(1));
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task<V>(cache: Arc<MemoryCache<V>>, interval: Duration) -> JoinHandle<()>
where
    V: Clone + Send + 'static,
{
    tokio::spawn(async move {
        info!(
            cache = %cache.name(),
            interval_ms = interval.as_millis() as u64,
            "Starting TTL cleanup task"
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.cleanup();
            if removed > 0 {
                info!(cache = %cache.name(), removed, "TTL cleanup removed expired entries");
            } else {
                debug!(cache = %cache.name(), "TTL cleanup: no expired entries found");
            }
        }
    })
}
