//! TTL Cache - A thread-safe in-memory key-value cache
//!
//! Every entry expires a fixed time after it was last written or read, and a
//! background Tokio task periodically sweeps expired entries out of memory.
//! Suited to caching DNS lookups and other short-lived computed values.

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use cache::{CacheStats, TtlCache};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
