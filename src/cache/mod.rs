//! Cache Module
//!
//! Provides in-memory caching with per-entry TTL expiration.

mod entry;
mod stats;
mod store;
mod ttl_cache;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::{deadline_after, Entry, MAX_TTL};
pub use stats::CacheStats;
pub use store::TtlStore;
pub use ttl_cache::TtlCache;
