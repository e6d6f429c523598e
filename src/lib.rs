//! Mini LRU Cache - An embeddable in-process cache engine
//!
//! Fixed-capacity key/value cache with least-recently-used eviction, optional
//! time-based expiration swept in the background, hit/miss statistics, and
//! listeners notified when entries are added or removed.
//!
//! # Example
//! ```
//! use mini_lru_cache::{CacheConfig, CacheEngine};
//!
//! let cache: CacheEngine<String, u32> = CacheEngine::new(CacheConfig::new(2)).unwrap();
//! cache.put("a".to_string(), 1).unwrap();
//! cache.put("b".to_string(), 2).unwrap();
//! cache.get(&"a".to_string());
//! cache.put("c".to_string(), 3).unwrap(); // evicts "b"
//!
//! assert!(!cache.contains_key(&"b".to_string()));
//! assert_eq!(cache.stats().hits, 1);
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod listener;
pub mod tasks;

pub use cache::{CacheEngine, CacheStats, TimestampMode};
pub use config::CacheConfig;
pub use error::{CacheError, ListenerEvent, Result};
pub use listener::{
    CacheListener, ListenerProvider, ListenerResult, SharedListener, StaticListenerProvider,
};
