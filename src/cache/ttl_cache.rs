//! TTL Cache Module
//!
//! Thread-safe cache handle: a [`TtlStore`] behind a read-write lock plus
//! the background task that sweeps expired entries out of it.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::{CacheStats, TtlStore};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};
use crate::tasks::spawn_sweep_task;

// == TTL Cache ==
/// A synchronized map of values that expire once stale.
///
/// Every operation is synchronous and holds the lock only for an in-memory
/// map operation. Writes and touching reads take the exclusive lock;
/// [`count`](Self::count), [`stats`](Self::stats) and non-touching reads
/// take the shared one.
///
/// The sweep task stops on [`shutdown`](Self::shutdown) or when the cache is
/// dropped. Share a cache between threads by wrapping it in an `Arc`.
///
/// # Example
/// ```no_run
/// use std::time::Duration;
/// use ttl_cache::TtlCache;
///
/// # async fn demo() -> ttl_cache::Result<()> {
/// let cache = TtlCache::new(Duration::from_secs(30));
/// cache.set("example.com", "93.184.216.34".to_string());
/// assert_eq!(cache.read("example.com").as_deref(), Some("93.184.216.34"));
/// cache.shutdown().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct TtlCache<V> {
    store: Arc<RwLock<TtlStore<V>>>,
    sweep_interval: Duration,
    shutdown_tx: watch::Sender<bool>,
    sweeper: Option<JoinHandle<()>>,
}

impl<V> TtlCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    // == Constructors ==
    /// Creates an empty cache and starts its sweep task on the current
    /// Tokio runtime.
    ///
    /// The sweep runs every `max(default_ttl, 1s)`.
    ///
    /// # Panics
    /// Panics when called outside a Tokio runtime. Use
    /// [`try_new`](Self::try_new) to get an error instead.
    pub fn new(default_ttl: Duration) -> Self {
        let config = CacheConfig::default().with_default_ttl(default_ttl);
        Self::start(&Handle::current(), &config)
    }

    /// Like [`new`](Self::new), but returns [`CacheError::NoRuntime`] when
    /// there is no runtime to host the sweep task.
    pub fn try_new(default_ttl: Duration) -> Result<Self> {
        let config = CacheConfig::default().with_default_ttl(default_ttl);
        Self::try_from_config(&config)
    }

    /// Creates a cache from a validated configuration.
    pub fn try_from_config(config: &CacheConfig) -> Result<Self> {
        config.validate()?;
        let runtime = Handle::try_current().map_err(|_| CacheError::NoRuntime)?;
        Ok(Self::start(&runtime, config))
    }

    fn start(runtime: &Handle, config: &CacheConfig) -> Self {
        let store = Arc::new(RwLock::new(TtlStore::new(config.default_ttl)));
        let sweep_interval = config.sweep_interval();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let sweeper = spawn_sweep_task(runtime, store.clone(), sweep_interval, shutdown_rx);

        debug!(
            default_ttl = ?config.default_ttl,
            ?sweep_interval,
            "TTL cache created"
        );

        Self {
            store,
            sweep_interval,
            shutdown_tx,
            sweeper: Some(sweeper),
        }
    }

    // == Writes ==
    /// Stores `value` under `key` with the default TTL, replacing any
    /// previous entry.
    pub fn set(&self, key: impl Into<String>, value: V) {
        self.write().set(key.into(), value);
    }

    /// Stores `value` under `key`, expiring `ttl` from now. Replaces any
    /// previous entry.
    pub fn set_with_ttl(&self, key: impl Into<String>, value: V, ttl: Duration) {
        self.write().set_with_ttl(key.into(), value, ttl);
    }

    /// Removes `key` regardless of its TTL. Returns whether it was present.
    pub fn delete(&self, key: &str) -> bool {
        self.write().delete(key)
    }

    // == Reads ==
    /// Returns the value for `key` and extends its life by the default TTL.
    pub fn read(&self, key: &str) -> Option<V> {
        self.get(key, true)
    }

    /// Looks up a live entry.
    ///
    /// With `should_touch` the entry's deadline is reset to now + the
    /// cache's default TTL (not the TTL it was stored with). Without it the
    /// deadline is left alone and only the shared lock is taken.
    pub fn get(&self, key: &str, should_touch: bool) -> Option<V> {
        if should_touch {
            self.write().get_and_touch(key)
        } else {
            self.read_lock().peek(key)
        }
    }

    /// Shorthand for `get(key, false)`.
    pub fn peek(&self, key: &str) -> Option<V> {
        self.get(key, false)
    }

    /// Returns true if `key` holds a live entry, without touching it.
    pub fn contains_key(&self, key: &str) -> bool {
        self.read_lock().contains_key(key)
    }

    /// Remaining lifetime of a live entry.
    pub fn ttl_remaining(&self, key: &str) -> Option<Duration> {
        self.read_lock().ttl_remaining(key)
    }

    /// Number of entries in the map.
    ///
    /// Expired entries count until a sweep removes them, so this is an upper
    /// bound on live entries.
    pub fn count(&self) -> usize {
        self.read_lock().len()
    }

    /// Returns true if the map holds no entries, expired or not.
    pub fn is_empty(&self) -> bool {
        self.read_lock().is_empty()
    }

    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.read_lock().stats()
    }

    // == Sweeping ==
    /// Runs one sweep now. Returns the number of expired entries removed.
    pub fn purge_expired(&self) -> usize {
        self.write().purge_expired()
    }

    /// TTL applied by `set` and by touching reads.
    pub fn default_ttl(&self) -> Duration {
        self.read_lock().default_ttl()
    }

    /// Interval between background sweeps.
    pub fn sweep_interval(&self) -> Duration {
        self.sweep_interval
    }

    /// Returns true while the sweep task is running.
    pub fn is_sweeping(&self) -> bool {
        self.sweeper
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }

    // == Shutdown ==
    /// Stops the sweep task and waits for it to exit.
    ///
    /// Dropping the cache also stops the task, without waiting.
    pub async fn shutdown(mut self) -> Result<()> {
        self.signal_shutdown();
        if let Some(handle) = self.sweeper.take() {
            handle.await?;
        }
        info!("TTL cache shut down");
        Ok(())
    }
}

impl<V> TtlCache<V> {
    fn signal_shutdown(&self) {
        // send_replace succeeds even once the task has exited
        self.shutdown_tx.send_replace(true);
    }

    fn write(&self) -> RwLockWriteGuard<'_, TtlStore<V>> {
        self.store.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn read_lock(&self) -> RwLockReadGuard<'_, TtlStore<V>> {
        self.store.read().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<V> Drop for TtlCache<V> {
    fn drop(&mut self) {
        if self.sweeper.is_some() {
            debug!("TTL cache dropped, stopping sweep task");
            self.signal_shutdown();
        }
    }
}
