//! Cache Module
//!
//! Provides in-memory caching with LRU eviction and TTL expiration.

mod engine;
mod expiry;
mod lru;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use engine::CacheEngine;
pub use expiry::{Clock, ExpiryIndex, ExpiryPolicy, Stamp, TimestampMode};
pub(crate) use lru::{NodeId, RecencyList};
pub use stats::{CacheStats, StatsCounter};
pub use store::OrderedStore;
