//! Expiry Index Module
//!
//! Side table recording, per key, the timestamps that the expiry rules are
//! evaluated against, plus the policy that decides when an entry is stale.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::Deserialize;
use tokio::time::Instant;

// == Clock ==
/// Millisecond clock relative to the owning engine's creation.
///
/// Built on `tokio::time::Instant` so a paused Tokio clock also freezes
/// expiry bookkeeping.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    origin: Instant,
}

impl Clock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    /// Milliseconds elapsed since the clock was created.
    pub fn now_ms(&self) -> u64 {
        duration_ms(self.origin.elapsed())
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

// == Timestamp Mode ==
/// Which timestamps the relative expiry rules are measured from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimestampMode {
    /// `expire_after_access` uses the last read or write, `expire_after_write`
    /// uses the last write only.
    #[default]
    Separate,
    /// Both rules use a single last-touched stamp, refreshed by reads and writes.
    Shared,
}

impl TimestampMode {
    /// Parses `separate` or `shared`, ignoring case.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "separate" => Some(TimestampMode::Separate),
            "shared" => Some(TimestampMode::Shared),
            _ => None,
        }
    }
}

// == Expiry Policy ==
/// Relative time-to-live rules applied by the sweeper.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpiryPolicy {
    /// Maximum idle time since the last read or write, in milliseconds
    pub expire_after_access: Option<u64>,
    /// Maximum age since the last write, in milliseconds
    pub expire_after_write: Option<u64>,
    pub mode: TimestampMode,
}

impl ExpiryPolicy {
    /// Returns true if at least one relative rule is active.
    pub fn is_enabled(&self) -> bool {
        self.expire_after_access.is_some() || self.expire_after_write.is_some()
    }

    // == Is Expired ==
    /// Checks a stamp against the rules.
    ///
    /// An explicit deadline overrides the relative rules: the entry expires
    /// once `now` passes the deadline. Otherwise an entry expires when the
    /// elapsed time strictly exceeds an enabled limit.
    pub fn is_expired(&self, stamp: &Stamp, now: u64) -> bool {
        if let Some(deadline) = stamp.deadline {
            return now > deadline;
        }

        let last_access = stamp.last_access();
        let last_write = match self.mode {
            TimestampMode::Separate => stamp.last_write,
            TimestampMode::Shared => last_access,
        };

        let exceeded = |limit: Option<u64>, since: u64| match limit {
            Some(limit) => now.saturating_sub(since) > limit,
            None => false,
        };

        exceeded(self.expire_after_access, last_access)
            || exceeded(self.expire_after_write, last_write)
    }
}

// == Stamp ==
/// Per-key expiry bookkeeping.
#[derive(Debug)]
pub struct Stamp {
    /// Last read or write; updated under the shared lock, hence atomic
    last_access: AtomicU64,
    /// Last write
    last_write: u64,
    /// Absolute cutoff set by an explicit-expiry insertion
    deadline: Option<u64>,
}

impl Stamp {
    fn written(now: u64, deadline: Option<u64>) -> Self {
        Self {
            last_access: AtomicU64::new(now),
            last_write: now,
            deadline,
        }
    }

    pub fn last_access(&self) -> u64 {
        self.last_access.load(Ordering::Relaxed)
    }

    #[allow(dead_code)]
    pub fn last_write(&self) -> u64 {
        self.last_write
    }

    #[allow(dead_code)]
    pub fn deadline(&self) -> Option<u64> {
        self.deadline
    }
}

// == Expiry Index ==
/// Key to [`Stamp`] table kept in lockstep with the ordered store.
#[derive(Debug)]
pub struct ExpiryIndex<K> {
    stamps: HashMap<K, Stamp>,
}

impl<K> Default for ExpiryIndex<K> {
    fn default() -> Self {
        Self {
            stamps: HashMap::new(),
        }
    }
}

impl<K> ExpiryIndex<K>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    // == Touch Write ==
    /// Records a write at `now`, clearing any explicit deadline.
    pub fn touch_write(&mut self, key: K, now: u64) {
        self.stamps.insert(key, Stamp::written(now, None));
    }

    // == Touch Access ==
    /// Records a read at `now`.
    ///
    /// Safe under a shared reference; racing readers never move the stamp
    /// backwards.
    pub fn touch_access(&self, key: &K, now: u64) {
        if let Some(stamp) = self.stamps.get(key) {
            stamp.last_access.fetch_max(now, Ordering::Relaxed);
        }
    }

    // == Set Absolute Expiry ==
    /// Records a write at `now` that expires once `deadline` has passed.
    pub fn set_absolute_expiry(&mut self, key: K, now: u64, deadline: u64) {
        self.stamps.insert(key, Stamp::written(now, Some(deadline)));
    }

    pub fn get(&self, key: &K) -> Option<&Stamp> {
        self.stamps.get(key)
    }

    pub fn remove(&mut self, key: &K) -> bool {
        self.stamps.remove(key).is_some()
    }

    pub fn clear(&mut self) {
        self.stamps.clear();
    }

    // == Expired Keys ==
    /// Collects every key the policy considers expired at `now`.
    pub fn expired_keys(&self, policy: &ExpiryPolicy, now: u64) -> Vec<K> {
        self.stamps
            .iter()
            .filter(|(_, stamp)| policy.is_expired(stamp, now))
            .map(|(key, _)| key.clone())
            .collect()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.stamps.keys()
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.stamps.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.stamps.is_empty()
    }
}
