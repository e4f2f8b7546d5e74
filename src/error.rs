//! Error types for the TTL cache
//!
//! Lookups never fail: a missing or expired key is `None`. These errors only
//! cover the lifecycle of the background sweep task and configuration.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// No Tokio runtime available to host the sweep task
    #[error("no Tokio runtime available to run the sweep task")]
    NoRuntime,

    /// Sweep task panicked or was cancelled
    #[error("sweep task failed: {0}")]
    SweepTask(#[from] tokio::task::JoinError),

    /// Rejected configuration value
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
