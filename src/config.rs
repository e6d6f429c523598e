//! Configuration Module
//!
//! Construction parameters for a cache engine, loadable from environment
//! variables or deserialized as part of a host application's configuration.

use std::env;
use std::time::Duration;

use serde::Deserialize;

use crate::cache::{ExpiryPolicy, TimestampMode};
use crate::error::{CacheError, Result};

/// Default maximum number of entries.
pub const DEFAULT_CAPACITY: usize = 100;

/// Default sweep period in seconds.
pub const DEFAULT_SWEEP_INTERVAL: u64 = 1;

/// Cache configuration parameters.
///
/// Expiry durations are in seconds; a value of zero or below disables the rule.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of entries the cache can hold
    pub capacity: usize,
    /// Idle time after the last read or write before an entry expires
    pub expire_after_access: i64,
    /// Age after the last write before an entry expires
    pub expire_after_write: i64,
    /// Background sweep period in seconds
    pub sweep_interval: u64,
    /// Which timestamps the expiry rules are measured from
    pub timestamp_mode: TimestampMode,
}

impl CacheConfig {
    /// Creates a config with the given capacity and every other value defaulted.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `LRU_CACHE_CAPACITY` - Maximum cache entries (default: 100)
    /// - `LRU_CACHE_EXPIRE_AFTER_ACCESS` - Seconds, <= 0 disables (default: -1)
    /// - `LRU_CACHE_EXPIRE_AFTER_WRITE` - Seconds, <= 0 disables (default: -1)
    /// - `LRU_CACHE_SWEEP_INTERVAL` - Sweep period in seconds (default: 1)
    /// - `LRU_CACHE_TIMESTAMP_MODE` - `separate` or `shared` (default: separate)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            capacity: env::var("LRU_CACHE_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.capacity),
            expire_after_access: env::var("LRU_CACHE_EXPIRE_AFTER_ACCESS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.expire_after_access),
            expire_after_write: env::var("LRU_CACHE_EXPIRE_AFTER_WRITE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.expire_after_write),
            sweep_interval: env::var("LRU_CACHE_SWEEP_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.sweep_interval),
            timestamp_mode: env::var("LRU_CACHE_TIMESTAMP_MODE")
                .ok()
                .and_then(|v| TimestampMode::parse(&v))
                .unwrap_or(defaults.timestamp_mode),
        }
    }

    pub fn with_expire_after_access(mut self, seconds: i64) -> Self {
        self.expire_after_access = seconds;
        self
    }

    pub fn with_expire_after_write(mut self, seconds: i64) -> Self {
        self.expire_after_write = seconds;
        self
    }

    pub fn with_sweep_interval(mut self, seconds: u64) -> Self {
        self.sweep_interval = seconds;
        self
    }

    pub fn with_timestamp_mode(mut self, mode: TimestampMode) -> Self {
        self.timestamp_mode = mode;
        self
    }

    // == Validate ==
    /// Rejects a zero capacity or a zero sweep interval.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(CacheError::Config(
                "capacity must be a positive integer".to_string(),
            ));
        }
        if self.sweep_interval == 0 {
            return Err(CacheError::Config(
                "sweep interval must be at least one second".to_string(),
            ));
        }
        Ok(())
    }

    /// Converts the TTL settings into the policy the sweeper evaluates.
    pub fn expiry_policy(&self) -> ExpiryPolicy {
        ExpiryPolicy {
            expire_after_access: seconds_to_ms(self.expire_after_access),
            expire_after_write: seconds_to_ms(self.expire_after_write),
            mode: self.timestamp_mode,
        }
    }

    pub fn sweep_period(&self) -> Duration {
        Duration::from_secs(self.sweep_interval)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            expire_after_access: -1,
            expire_after_write: -1,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
            timestamp_mode: TimestampMode::Separate,
        }
    }
}

fn seconds_to_ms(seconds: i64) -> Option<u64> {
    u64::try_from(seconds)
        .ok()
        .filter(|&s| s > 0)
        .map(|s| s.saturating_mul(1_000))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = CacheConfig::default();
        assert_eq!(config.capacity, 100);
        assert_eq!(config.expire_after_access, -1);
        assert_eq!(config.expire_after_write, -1);
        assert_eq!(config.sweep_interval, 1);
        assert_eq!(config.timestamp_mode, TimestampMode::Separate);
        assert!(!config.expiry_policy().is_enabled());
    }

    #[test]
    fn test_config_from_env() {
        // Single test touches the environment to avoid races between tests
        env::remove_var("LRU_CACHE_CAPACITY");
        env::remove_var("LRU_CACHE_EXPIRE_AFTER_ACCESS");
        env::remove_var("LRU_CACHE_EXPIRE_AFTER_WRITE");
        env::remove_var("LRU_CACHE_SWEEP_INTERVAL");
        env::remove_var("LRU_CACHE_TIMESTAMP_MODE");

        assert_eq!(CacheConfig::from_env(), CacheConfig::default());

        env::set_var("LRU_CACHE_CAPACITY", "25");
        env::set_var("LRU_CACHE_EXPIRE_AFTER_WRITE", "30");
        env::set_var("LRU_CACHE_TIMESTAMP_MODE", "shared");
        env::set_var("LRU_CACHE_SWEEP_INTERVAL", "not-a-number");

        let config = CacheConfig::from_env();
        assert_eq!(config.capacity, 25);
        assert_eq!(config.expire_after_write, 30);
        assert_eq!(config.expire_after_access, -1);
        assert_eq!(config.sweep_interval, 1);
        assert_eq!(config.timestamp_mode, TimestampMode::Shared);

        env::remove_var("LRU_CACHE_CAPACITY");
        env::remove_var("LRU_CACHE_EXPIRE_AFTER_WRITE");
        env::remove_var("LRU_CACHE_TIMESTAMP_MODE");
        env::remove_var("LRU_CACHE_SWEEP_INTERVAL");
    }

    #[test]
    fn test_validate_rejects_zero_capacity() {
        let result = CacheConfig::new(0).validate();
        assert!(matches!(result, Err(CacheError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_zero_sweep_interval() {
        let result = CacheConfig::new(10).with_sweep_interval(0).validate();
        assert!(matches!(result, Err(CacheError::Config(_))));
    }

    #[test]
    fn test_non_positive_ttl_disables_rule() {
        let policy = CacheConfig::new(10)
            .with_expire_after_access(0)
            .with_expire_after_write(-5)
            .expiry_policy();
        assert_eq!(policy.expire_after_access, None);
        assert_eq!(policy.expire_after_write, None);

        let policy = CacheConfig::new(10)
            .with_expire_after_access(2)
            .expiry_policy();
        assert_eq!(policy.expire_after_access, Some(2_000));
        assert!(policy.is_enabled());
    }

    #[test]
    fn test_config_deserialize_partial() {
        let config: CacheConfig =
            serde_json::from_str(r#"{"capacity": 5, "expire_after_access": 10, "timestamp_mode": "shared"}"#)
                .unwrap();

        assert_eq!(config.capacity, 5);
        assert_eq!(config.expire_after_access, 10);
        assert_eq!(config.expire_after_write, -1);
        assert_eq!(config.sweep_interval, 1);
        assert_eq!(config.timestamp_mode, TimestampMode::Shared);
    }
}
