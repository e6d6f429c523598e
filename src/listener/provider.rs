//! Listener Provider
//!
//! Lets the hosting application hand a pre-built list of observers to the
//! engine at construction time. Discovering those observers is the host's job.

use std::fmt;

use crate::listener::SharedListener;

// == Listener Provider ==
/// Supplies observers, in order, to register when an engine is built.
pub trait ListenerProvider<K, V> {
    fn listeners(&self) -> Vec<SharedListener<K, V>>;
}

// == Static Provider ==
/// Provider backed by a fixed list.
pub struct StaticListenerProvider<K, V> {
    listeners: Vec<SharedListener<K, V>>,
}

impl<K, V> StaticListenerProvider<K, V> {
    pub fn new(listeners: Vec<SharedListener<K, V>>) -> Self {
        Self { listeners }
    }
}

impl<K, V> Default for StaticListenerProvider<K, V> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<K, V> fmt::Debug for StaticListenerProvider<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticListenerProvider")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl<K, V> FromIterator<SharedListener<K, V>> for StaticListenerProvider<K, V> {
    fn from_iter<I: IntoIterator<Item = SharedListener<K, V>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<K, V> ListenerProvider<K, V> for StaticListenerProvider<K, V> {
    fn listeners(&self) -> Vec<SharedListener<K, V>> {
        self.listeners.clone()
    }
}
