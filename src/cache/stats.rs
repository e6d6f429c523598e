//! Cache Statistics Module
//!
//! Tracks cache performance metrics including hits, misses, and evictions.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Stats Counter ==
/// Live, thread-safe counters owned by the engine.
///
/// Every method takes `&self`, so readers holding only the engine's shared
/// lock can record hits and misses concurrently.
#[derive(Debug, Default)]
pub struct StatsCounter {
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
    expirations: AtomicU64,
}

impl StatsCounter {
    pub fn new() -> Self {
        Self::default()
    }

    // == Record Hit ==
    #[inline]
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    // == Record Miss ==
    #[inline]
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    // == Record Eviction ==
    /// Counts an entry dropped to stay within capacity.
    #[inline]
    pub fn record_eviction(&self) {
        self.evictions.fetch_add(1, Ordering::Relaxed);
    }

    // == Record Expiration ==
    /// Counts an entry dropped by the expiry sweeper.
    #[inline]
    pub fn record_expiration(&self) {
        self.expirations.fetch_add(1, Ordering::Relaxed);
    }

    // == Hit Rate ==
    /// Calculates hits / (hits + misses) from a single snapshot.
    ///
    /// Returns 1.0 if no requests have been made.
    pub fn hit_rate(&self) -> f64 {
        self.snapshot(0).hit_rate()
    }

    // == Snapshot ==
    /// Copies the counters into a [`CacheStats`] value.
    pub fn snapshot(&self, total_entries: usize) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            expirations: self.expirations.load(Ordering::Relaxed),
            total_entries,
        }
    }
}

// == Cache Stats ==
/// Point-in-time copy of the cache performance metrics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Number of successful cache retrievals
    pub hits: u64,
    /// Number of failed cache retrievals
    pub misses: u64,
    /// Number of entries evicted due to LRU policy
    pub evictions: u64,
    /// Number of entries removed by the expiry sweeper
    pub expirations: u64,
    /// Number of entries in the cache when the snapshot was taken
    pub total_entries: usize,
}

impl CacheStats {
    /// Total number of lookups.
    pub fn requests(&self) -> u64 {
        self.hits + self.misses
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 1.0 if no requests have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.requests();
        if total == 0 {
            1.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CacheStats[hits={}, misses={}, hitRate={:.2}]",
            self.hits,
            self.misses,
            self.hit_rate()
        )
    }
}
