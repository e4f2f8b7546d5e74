//! TTL Store Module
//!
//! The unsynchronized core of the cache: a HashMap of entries, the default
//! TTL used by `set` and touching reads, and lookup counters. `TtlCache`
//! wraps it in a lock and pairs it with the sweep task.

use std::collections::HashMap;
use std::time::Duration;

use tokio::time::Instant;

use crate::cache::stats::StatsCounters;
use crate::cache::{CacheStats, Entry};

// == TTL Store ==
/// Key-value storage where every entry expires.
#[derive(Debug)]
pub struct TtlStore<V> {
    /// Key-value storage
    entries: HashMap<String, Entry<V>>,
    /// Lookup and purge counters
    stats: StatsCounters,
    /// TTL for `set` and for touching reads
    default_ttl: Duration,
}

impl<V: Clone> TtlStore<V> {
    // == Constructor ==
    /// Creates an empty store with the given default TTL.
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            stats: StatsCounters::default(),
            default_ttl,
        }
    }

    /// Returns the TTL used by `set` and by touching reads.
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    // == Set ==
    /// Stores a value under the default TTL, replacing any previous entry.
    pub fn set(&mut self, key: String, value: V) {
        self.set_with_ttl(key, value, self.default_ttl);
    }

    /// Stores a value that expires `ttl` from now, replacing any previous
    /// entry regardless of its remaining lifetime.
    pub fn set_with_ttl(&mut self, key: String, value: V, ttl: Duration) {
        self.entries.insert(key, Entry::new(value, ttl));
    }

    // == Get ==
    /// Looks up a live entry and resets its deadline to now + default TTL.
    ///
    /// The refresh always uses the store's default TTL, not the TTL the
    /// entry was stored with. Expired entries are left in place for the
    /// sweep.
    pub fn get_and_touch(&mut self, key: &str) -> Option<V> {
        let default_ttl = self.default_ttl;
        match self.entries.get_mut(key) {
            Some(entry) if !entry.is_expired() => {
                entry.touch(default_ttl);
                self.stats.record_hit();
                Some(entry.value.clone())
            }
            _ => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Peek ==
    /// Looks up a live entry without extending its lifetime.
    pub fn peek(&self, key: &str) -> Option<V> {
        match self.entries.get(key) {
            Some(entry) if !entry.is_expired() => {
                self.stats.record_hit();
                Some(entry.value.clone())
            }
            _ => {
                self.stats.record_miss();
                None
            }
        }
    }

    /// Returns true if `key` holds a live entry. Not counted in stats.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries
            .get(key)
            .map(|entry| !entry.is_expired())
            .unwrap_or(false)
    }

    /// Remaining lifetime of a live entry.
    pub fn ttl_remaining(&self, key: &str) -> Option<Duration> {
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired())
            .map(Entry::ttl_remaining)
    }

    // == Delete ==
    /// Removes an entry. Returns whether the key was present.
    pub fn delete(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    // == Purge Expired ==
    /// Removes every entry expired as of now.
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&mut self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired_at(now));

        let removed = before - self.entries.len();
        self.stats.record_purged(removed);
        removed
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot(self.entries.len())
    }

    // == Length ==
    /// Number of entries in the map, expired-but-unswept ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the map holds no entries at all.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
