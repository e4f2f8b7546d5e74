//! Configuration Module
//!
//! Handles loading and managing cache configuration from environment variables.

use std::env;
use std::time::Duration;

use crate::cache::MAX_TTL;
use crate::error::{CacheError, Result};

/// Default TTL when none is configured (5 minutes)
const DEFAULT_TTL_MS: u64 = 300_000;
/// Lower bound for the sweep interval (1 second)
const DEFAULT_MIN_SWEEP_INTERVAL_MS: u64 = 1_000;

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// TTL applied by `set` and by touching reads
    pub default_ttl: Duration,
    /// Floor for the background sweep interval
    pub min_sweep_interval: Duration,
}

impl CacheConfig {
    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `TTL_CACHE_DEFAULT_TTL_MS` - Default TTL in milliseconds (default: 300000)
    /// - `TTL_CACHE_MIN_SWEEP_INTERVAL_MS` - Sweep interval floor in milliseconds (default: 1000)
    ///
    /// Values too large to add to the clock are accepted; entries and sweeps
    /// clamp them to [`MAX_TTL`].
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a config from any variable source, falling back to defaults for
    /// missing or unparsable values.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let millis = |name: &str, default: u64| {
            Duration::from_millis(
                lookup(name)
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(default),
            )
        };

        Self {
            default_ttl: millis("TTL_CACHE_DEFAULT_TTL_MS", DEFAULT_TTL_MS),
            min_sweep_interval: millis(
                "TTL_CACHE_MIN_SWEEP_INTERVAL_MS",
                DEFAULT_MIN_SWEEP_INTERVAL_MS,
            ),
        }
    }

    /// Sets the default TTL.
    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }

    /// Sets the sweep interval floor.
    pub fn with_min_sweep_interval(mut self, interval: Duration) -> Self {
        self.min_sweep_interval = interval;
        self
    }

    /// Interval between background sweeps: the default TTL, but never
    /// shorter than `min_sweep_interval` nor longer than [`MAX_TTL`].
    pub fn sweep_interval(&self) -> Duration {
        self.default_ttl.max(self.min_sweep_interval).min(MAX_TTL)
    }

    /// Checks that the configuration can drive a sweep task.
    pub fn validate(&self) -> Result<()> {
        if self.min_sweep_interval.is_zero() {
            return Err(CacheError::InvalidConfig(
                "min_sweep_interval must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl: Duration::from_millis(DEFAULT_TTL_MS),
            min_sweep_interval: Duration::from_millis(DEFAULT_MIN_SWEEP_INTERVAL_MS),
        }
    }
}
