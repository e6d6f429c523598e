//! Ordered Store Module
//!
//! Capacity-bounded key/value storage whose eviction order follows recency of
//! access. A `HashMap` indexes into a [`RecencyList`] so promotion and eviction
//! stay O(1).

use std::collections::HashMap;
use std::hash::Hash;

use parking_lot::Mutex;

use crate::cache::{NodeId, RecencyList};

#[derive(Debug)]
struct Slot<V> {
    value: V,
    node: NodeId,
}

// == Ordered Store ==
/// Key/value storage with LRU eviction.
///
/// Lookups only need `&self`: the recency list sits behind its own mutex so
/// concurrent readers holding the engine's shared lock can promote entries
/// safely. Every structural change goes through `&mut self`.
#[derive(Debug)]
pub struct OrderedStore<K, V> {
    /// Key to value and recency node
    entries: HashMap<K, Slot<V>>,
    /// Access order, most recent first
    recency: Mutex<RecencyList<K>>,
    /// Maximum number of entries allowed
    capacity: usize,
}

impl<K, V> OrderedStore<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    // == Constructor ==
    /// Creates an empty store holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity),
            recency: Mutex::new(RecencyList::with_capacity(capacity)),
            capacity,
        }
    }

    // == Get ==
    /// Returns a copy of the value and marks the key most recently used.
    ///
    /// A miss leaves the recency order untouched.
    pub fn get(&self, key: &K) -> Option<V> {
        let slot = self.entries.get(key)?;
        self.recency.lock().touch(slot.node);
        Some(slot.value.clone())
    }

    /// Returns a reference to the value without promoting it.
    #[allow(dead_code)]
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.entries.get(key).map(|slot| &slot.value)
    }

    // == Put ==
    /// Inserts or overwrites an entry and marks it most recently used.
    ///
    /// If the insertion pushes the store over capacity, the least recently
    /// used entry is evicted before returning and handed back to the caller.
    pub fn put(&mut self, key: K, value: V) -> Option<(K, V)> {
        let recency = self.recency.get_mut();

        if let Some(slot) = self.entries.get_mut(&key) {
            slot.value = value;
            recency.touch(slot.node);
            return None;
        }

        let node = recency.push_front(key.clone());
        self.entries.insert(key, Slot { value, node });

        if self.entries.len() > self.capacity {
            return self.evict_oldest();
        }
        None
    }

    // == Remove ==
    /// Removes an entry, returning its value if it was present.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let slot = self.entries.remove(key)?;
        self.recency.get_mut().remove(slot.node);
        Some(slot.value)
    }

    // == Clear ==
    /// Drops every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.recency.get_mut().clear();
    }

    // == Snapshot ==
    /// Copies all entries, least recently used first.
    pub fn snapshot(&self) -> Vec<(K, V)> {
        let mut out: Vec<(K, V)> = self.iter_recent().collect();
        out.reverse();
        out
    }

    /// Copies all entries, most recently used first.
    pub fn iter_recent(&self) -> impl Iterator<Item = (K, V)> + '_ {
        let keys: Vec<K> = self.recency.lock().iter().cloned().collect();
        keys.into_iter().filter_map(move |key| {
            let value = self.entries.get(&key)?.value.clone();
            Some((key, value))
        })
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.keys()
    }

    // == Length ==
    /// Returns the current number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn evict_oldest(&mut self) -> Option<(K, V)> {
        let key = self.recency.get_mut().pop_oldest()?;
        let slot = self.entries.remove(&key)?;
        Some((key, slot.value))
    }
}
