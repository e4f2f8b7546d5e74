//! TTL Sweep Task
//!
//! Background task that periodically removes expired cache entries.

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, MissedTickBehavior};
use tracing::{debug, info};

use crate::cache::{deadline_after, TtlStore, MAX_TTL};

/// Spawns a task on `runtime` that purges expired entries every `interval`.
///
/// The first sweep runs one full interval after spawning. Intervals longer
/// than [`MAX_TTL`] are clamped to it. The task exits when `true` is sent on
/// `shutdown` or when the sender is dropped.
///
/// # Returns
/// A JoinHandle for the spawned task, awaited by `TtlCache::shutdown`.
///
/// # Panics
/// Panics if `interval` is zero.
pub fn spawn_sweep_task<V>(
    runtime: &Handle,
    store: Arc<RwLock<TtlStore<V>>>,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()>
where
    V: Clone + Send + Sync + 'static,
{
    let interval = interval.min(MAX_TTL);

    runtime.spawn(async move {
        info!(?interval, "Starting TTL sweep task");

        let mut ticker = interval_at(deadline_after(interval), interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                changed = shutdown.changed() => {
                    // Err means the cache was dropped along with the sender
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                    continue;
                }
            }

            let removed = store
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .purge_expired();

            if removed > 0 {
                info!("TTL sweep: removed {} expired entries", removed);
            } else {
                debug!("TTL sweep: no expired entries found");
            }
        }

        info!("TTL sweep task stopped");
    })
}
