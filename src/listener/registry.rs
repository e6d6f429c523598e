//! Listener Registry
//!
//! Holds observers in registration order and delivers notifications to them.

use std::fmt;
use std::sync::Arc;

use crate::error::{CacheError, ListenerEvent, Result};
use crate::listener::SharedListener;

// == Listener Registry ==
/// Ordered set of observers.
///
/// The same observer (by pointer identity) is only ever registered once, so
/// registering through a provider and again by hand never doubles delivery.
pub struct ListenerRegistry<K, V> {
    listeners: Vec<SharedListener<K, V>>,
}

impl<K, V> Default for ListenerRegistry<K, V> {
    fn default() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }
}

impl<K, V> fmt::Debug for ListenerRegistry<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl<K, V> ListenerRegistry<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    // == Add ==
    /// Appends an observer. Returns false if it was already registered.
    pub fn add(&mut self, listener: SharedListener<K, V>) -> bool {
        if self.contains(&listener) {
            return false;
        }
        self.listeners.push(listener);
        true
    }

    pub fn contains(&self, listener: &SharedListener<K, V>) -> bool {
        self.listeners
            .iter()
            .any(|existing| Arc::ptr_eq(existing, listener))
    }

    // == Notify Added ==
    /// Delivers an entry-added event to every observer in order.
    ///
    /// Stops at the first failing observer and returns its error.
    pub fn notify_added(&self, key: &K, value: &V) -> Result<()> {
        for listener in &self.listeners {
            listener
                .on_entry_added(key, value)
                .map_err(|source| CacheError::Listener {
                    event: ListenerEvent::Added,
                    source,
                })?;
        }
        Ok(())
    }

    // == Notify Removed ==
    /// Delivers an entry-removed event to every observer in order.
    ///
    /// Stops at the first failing observer and returns its error.
    pub fn notify_removed(&self, key: &K, value: &V) -> Result<()> {
        for listener in &self.listeners {
            listener
                .on_entry_removed(key, value)
                .map_err(|source| CacheError::Listener {
                    event: ListenerEvent::Removed,
                    source,
                })?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}
