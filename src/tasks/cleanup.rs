//! Session Cleanup Task
//!
//! Background task that periodically removes expired sessions from the cache.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::SessionCache;

/// Spawns a background task that periodically sweeps expired sessions.
///
/// The task runs in an infinite loop, sleeping for `interval` between runs,
/// so memory held by sessions nobody looks up again is still reclaimed.
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
///
/// # Example
/// ```ignore
/// let cache = Arc::new(SessionCache::new(100, Duration::from_secs(1800)));
/// let cleanup_handle = spawn_cleanup_task(cache.clone(), Duration::from_secs(600));
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task<V>(cache: Arc<SessionCache<V>>, interval: Duration) -> JoinHandle<()>
where
    V: Clone + Send + Sync + 'static,
{
    tokio::spawn(async move {
        info!(
            "Starting session cleanup task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.cleanup();

            if removed > 0 {
                info!("Session cleanup: removed {} expired sessions", removed);
            } else {
                debug!("Session cleanup: no expired sessions found");
            }
        }
    })
}
