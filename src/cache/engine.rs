//! Cache Engine Module
//!
//! Main cache façade combining the ordered store, expiry index, listener
//! registry and statistics behind a single read-write lock, and owning the
//! background expiry sweeper.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::cache::{
    CacheStats, Clock, ExpiryIndex, ExpiryPolicy, OrderedStore, Stamp, StatsCounter,
};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};
use crate::listener::{ListenerProvider, ListenerRegistry, SharedListener};
use crate::tasks::{EvictionScheduler, ExpirySweep};

// == Cache Engine ==
/// Thread-safe LRU cache with optional time-based expiration.
///
/// # Locking
/// One read-write lock covers the store, the expiry index and listener
/// delivery. `get`, `len`, `get_all` and `entries_by_frequency` take the
/// shared side; every mutation, including the background sweep, takes the
/// exclusive side. Listener callbacks run before that lock is released.
///
/// # Listener failures
/// A failing observer does not roll anything back: `put`, `remove` and
/// friends apply their mutation, then return [`CacheError::Listener`].
///
/// # Shutdown
/// Call [`CacheEngine::shutdown`] when the owner is torn down. Dropping the
/// engine also stops the sweeper. After shutdown the cache keeps serving
/// reads and writes but nothing expires on its own any more.
pub struct CacheEngine<K, V> {
    shared: Arc<Shared<K, V>>,
    scheduler: Mutex<EvictionScheduler>,
    sweep_period: Duration,
}

/// State reachable from the sweeper task.
struct Shared<K, V> {
    state: RwLock<State<K, V>>,
    stats: StatsCounter,
    policy: ExpiryPolicy,
    clock: Clock,
}

/// Everything guarded by the engine lock.
struct State<K, V> {
    store: OrderedStore<K, V>,
    expiry: ExpiryIndex<K>,
    listeners: ListenerRegistry<K, V>,
}

impl<K, V> CacheEngine<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    // == Constructor ==
    /// Creates an engine from a validated config.
    ///
    /// Starts the expiry sweeper when a relative TTL rule is enabled, which
    /// requires a running Tokio runtime.
    pub fn new(config: CacheConfig) -> Result<Self> {
        config.validate()?;

        let policy = config.expiry_policy();
        let engine = Self {
            shared: Arc::new(Shared {
                state: RwLock::new(State {
                    store: OrderedStore::new(config.capacity),
                    expiry: ExpiryIndex::new(),
                    listeners: ListenerRegistry::new(),
                }),
                stats: StatsCounter::new(),
                policy,
                clock: Clock::new(),
            }),
            scheduler: Mutex::new(EvictionScheduler::new()),
            sweep_period: config.sweep_period(),
        };

        if policy.is_enabled() {
            engine.start_sweeper()?;
        }

        info!(
            "Cache engine created: capacity={}, expire_after_access={:?}ms, expire_after_write={:?}ms, mode={:?}",
            config.capacity, policy.expire_after_access, policy.expire_after_write, policy.mode
        );
        Ok(engine)
    }

    /// Creates an engine and registers every observer the provider supplies.
    pub fn with_listener_provider<P>(config: CacheConfig, provider: &P) -> Result<Self>
    where
        P: ListenerProvider<K, V> + ?Sized,
    {
        let engine = Self::new(config)?;
        for listener in provider.listeners() {
            engine.add_listener(listener);
        }
        Ok(engine)
    }

    // == Get ==
    /// Returns a copy of the value for `key`, marking it most recently used.
    ///
    /// Records a hit or a miss.
    pub fn get(&self, key: &K) -> Option<V> {
        let state = self.shared.state.read();
        match state.store.get(key) {
            Some(value) => {
                state.expiry.touch_access(key, self.shared.clock.now_ms());
                self.shared.stats.record_hit();
                Some(value)
            }
            None => {
                self.shared.stats.record_miss();
                None
            }
        }
    }

    // == Put ==
    /// Inserts or overwrites an entry.
    ///
    /// May evict the least recently used entry, which fires a removal
    /// notification before the added notification for `key`.
    pub fn put(&self, key: K, value: V) -> Result<()> {
        let mut state = self.shared.state.write();
        let now = self.shared.clock.now_ms();
        self.insert_locked(&mut state, key, value, now, None)
    }

    // == Put With Expire ==
    /// Inserts or overwrites an entry that expires once `ttl` has elapsed.
    ///
    /// The deadline is absolute: reads do not extend it and the relative
    /// TTL rules do not apply to this entry. Starts the sweeper if it is not
    /// running yet and the engine has not been shut down. Outside a Tokio
    /// runtime the entry is stored anyway and expires through
    /// [`CacheEngine::purge_expired`].
    pub fn put_with_expire(&self, key: K, value: V, ttl: Duration) -> Result<()> {
        let out_of_range =
            || CacheError::InvalidArgument(format!("expiry of {:?} is out of range", ttl));
        let ttl_ms = u64::try_from(ttl.as_millis()).map_err(|_| out_of_range())?;

        // Without a runtime the entry is still stored; purge_expired removes it
        if let Err(CacheError::Runtime(err)) = self.start_sweeper() {
            warn!("Expiry sweeper not started, entry relies on purge_expired: {}", err);
        }

        let mut state = self.shared.state.write();
        let now = self.shared.clock.now_ms();
        let deadline = now.checked_add(ttl_ms).ok_or_else(out_of_range)?;
        self.insert_locked(&mut state, key, value, now, Some(deadline))
    }

    /// Like [`CacheEngine::put_with_expire`] with a wall-clock deadline.
    ///
    /// A deadline in the past expires the entry at the next sweep.
    pub fn put_with_expire_at(&self, key: K, value: V, deadline: DateTime<Utc>) -> Result<()> {
        let ttl = (deadline - Utc::now()).to_std().unwrap_or(Duration::ZERO);
        self.put_with_expire(key, value, ttl)
    }

    // == Remove ==
    /// Removes an entry, returning its value if it was present.
    ///
    /// Fires exactly one removal notification when something was removed.
    pub fn remove(&self, key: &K) -> Result<Option<V>> {
        let mut state = self.shared.state.write();
        let Some(value) = state.store.remove(key) else {
            return Ok(None);
        };
        state.expiry.remove(key);
        debug!("Removed cache entry, {} remaining", state.store.len());

        state.listeners.notify_removed(key, &value)?;
        Ok(Some(value))
    }

    // == Clear ==
    /// Drops every entry without notifying listeners.
    pub fn clear(&self) {
        let mut state = self.shared.state.write();
        let dropped = state.store.len();
        state.store.clear();
        state.expiry.clear();
        debug!("Cleared {} cache entries", dropped);
    }

    // == Length ==
    /// Returns the current number of entries.
    pub fn len(&self) -> usize {
        self.shared.state.read().store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.shared.state.read().store.capacity()
    }

    /// Checks for a key without promoting it or touching the statistics.
    pub fn contains_key(&self, key: &K) -> bool {
        self.shared.state.read().store.contains_key(key)
    }

    // == Get All ==
    /// Copies every entry, least recently used first.
    ///
    /// The copy is detached from the cache.
    pub fn get_all(&self) -> Vec<(K, V)> {
        self.shared.state.read().store.snapshot()
    }

    // == Entries By Frequency ==
    /// Returns up to `n` entries, most recently touched first.
    ///
    /// Ordered by the last read or write stamp; ties keep recency-list order.
    pub fn entries_by_frequency(&self, n: usize) -> Vec<(K, V)> {
        let state = self.shared.state.read();
        let mut ranked: Vec<(u64, (K, V))> = state
            .store
            .iter_recent()
            .map(|(key, value)| {
                let touched = state.expiry.get(&key).map(Stamp::last_access).unwrap_or(0);
                (touched, (key, value))
            })
            .collect();

        ranked.sort_by(|a, b| b.0.cmp(&a.0));
        ranked.into_iter().take(n).map(|(_, entry)| entry).collect()
    }

    // == Stats ==
    /// Returns a snapshot of the cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.shared.stats.snapshot(self.len())
    }

    // == Add Listener ==
    /// Registers an observer. Returns false if it was already registered.
    pub fn add_listener(&self, listener: SharedListener<K, V>) -> bool {
        let mut state = self.shared.state.write();
        let added = state.listeners.add(listener);
        if added {
            debug!("Registered cache listener, {} total", state.listeners.len());
        }
        added
    }

    // == Purge Expired ==
    /// Runs one expiry sweep on the calling thread.
    ///
    /// Returns the number of entries removed. Listener failures are logged,
    /// exactly as in the background sweep.
    pub fn purge_expired(&self) -> usize {
        self.shared.sweep_expired()
    }

    // == Shutdown ==
    /// Stops the expiry sweeper for good. Idempotent.
    pub fn shutdown(&self) {
        if self.scheduler.lock().stop() {
            info!("Expiry sweeper stopped");
        }
    }

    pub fn is_shut_down(&self) -> bool {
        self.scheduler.lock().is_stopped()
    }

    /// Returns true while the background sweeper task is alive.
    pub fn is_sweeper_running(&self) -> bool {
        self.scheduler.lock().is_running()
    }

    fn start_sweeper(&self) -> Result<bool> {
        self.scheduler
            .lock()
            .start(Arc::downgrade(&self.shared), self.sweep_period)
    }

    fn insert_locked(
        &self,
        state: &mut State<K, V>,
        key: K,
        value: V,
        now: u64,
        deadline: Option<u64>,
    ) -> Result<()> {
        let evicted = state.store.put(key.clone(), value.clone());
        match deadline {
            Some(deadline) => state.expiry.set_absolute_expiry(key.clone(), now, deadline),
            None => state.expiry.touch_write(key.clone(), now),
        }

        if let Some((old_key, old_value)) = evicted {
            state.expiry.remove(&old_key);
            self.shared.stats.record_eviction();
            debug!(
                "Evicted least recently used entry to stay within capacity {}",
                state.store.capacity()
            );
            state.listeners.notify_removed(&old_key, &old_value)?;
        }

        state.listeners.notify_added(&key, &value)
    }

    /// Checks that the store and the expiry index hold the same keys.
    #[cfg(test)]
    pub(crate) fn index_matches_store(&self) -> bool {
        use std::collections::HashSet;

        let state = self.shared.state.read();
        let store: HashSet<&K> = state.store.keys().collect();
        let index: HashSet<&K> = state.expiry.keys().collect();
        store == index
    }
}

impl<K, V> ExpirySweep for Shared<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn sweep_expired(&self) -> usize {
        let mut state = self.state.write();
        let now = self.clock.now_ms();
        let expired = state.expiry.expired_keys(&self.policy, now);

        let mut removed = 0;
        for key in expired {
            state.expiry.remove(&key);
            let Some(value) = state.store.remove(&key) else {
                continue;
            };
            removed += 1;
            self.stats.record_expiration();

            // A failing observer must not stop this or any later sweep
            if let Err(err) = state.listeners.notify_removed(&key, &value) {
                warn!("Listener failed while expiring a cache entry: {}", err);
            }
        }
        removed
    }
}

impl<K, V> fmt::Debug for CacheEngine<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.state.read();
        f.debug_struct("CacheEngine")
            .field("len", &state.store.len())
            .field("capacity", &state.store.capacity())
            .field("listeners", &state.listeners.len())
            .field("policy", &self.shared.policy)
            .field("sweep_period", &self.sweep_period)
            .finish()
    }
}
