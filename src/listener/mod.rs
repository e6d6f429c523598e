//! Listener Module
//!
//! Observer interface for entry lifecycle events and the registry that fans
//! notifications out to registered observers.
//!
//! # Components
//! - [`CacheListener`]: callbacks for entry added / removed
//! - [`ListenerRegistry`]: ordered, duplicate-free observer list
//! - [`ListenerProvider`]: source of observers registered at construction

mod provider;
mod registry;

use std::sync::Arc;

pub use provider::{ListenerProvider, StaticListenerProvider};
pub use registry::ListenerRegistry;

/// Outcome of an observer callback.
pub type ListenerResult = anyhow::Result<()>;

/// Shared handle to a registered observer.
pub type SharedListener<K, V> = Arc<dyn CacheListener<K, V>>;

// == Cache Listener ==
/// Receives entry lifecycle notifications.
///
/// Callbacks run synchronously while the engine holds its exclusive lock.
/// They must not call back into the same engine or they will deadlock.
///
/// Returning an error does not undo the mutation; the error is surfaced to
/// the caller of the triggering operation.
pub trait CacheListener<K, V>: Send + Sync {
    /// Called after an entry has been inserted or overwritten.
    fn on_entry_added(&self, _key: &K, _value: &V) -> ListenerResult {
        Ok(())
    }

    /// Called after an entry has been evicted, expired, or removed.
    fn on_entry_removed(&self, _key: &K, _value: &V) -> ListenerResult {
        Ok(())
    }
}
