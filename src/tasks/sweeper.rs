//! Expiry Sweep Task
//!
//! Background task that periodically removes timed-out cache entries.

use std::sync::Weak;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::error::Result;

// == Expiry Sweep ==
/// Something the sweeper can clean up once per period.
pub trait ExpirySweep: Send + Sync + 'static {
    /// Runs one sweep cycle and returns the number of entries removed.
    fn sweep_expired(&self) -> usize;
}

/// Spawns a background task that calls [`ExpirySweep::sweep_expired`] once per
/// `period`, starting one period from now.
///
/// The task only holds a weak handle to its target and exits on its own once
/// the target has been dropped. Must be called from within a Tokio runtime.
///
/// # Example
/// ```ignore
/// let handle = spawn_sweeper(Arc::downgrade(&shared), Duration::from_secs(1));
/// // Later, during shutdown:
/// handle.abort();
/// ```
pub fn spawn_sweeper<S: ExpirySweep>(target: Weak<S>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Starting expiry sweeper with a period of {:?}", period);

        let mut ticker = time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            let Some(target) = target.upgrade() else {
                debug!("Expiry sweeper target dropped, stopping");
                break;
            };

            let removed = target.sweep_expired();
            if removed > 0 {
                info!("Expiry sweep: removed {} expired entries", removed);
            } else {
                debug!("Expiry sweep: no expired entries found");
            }
        }
    })
}

// == Eviction Scheduler ==
/// Owns the sweeper task for one engine.
///
/// Once stopped it can never be started again. Dropping the scheduler stops
/// the task as well.
#[derive(Debug, Default)]
pub struct EvictionScheduler {
    handle: Option<JoinHandle<()>>,
    stopped: bool,
}

impl EvictionScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    // == Start ==
    /// Spawns the sweeper unless it is already running or has been stopped.
    ///
    /// Returns whether a task was spawned. Fails if there is no Tokio
    /// runtime to spawn onto.
    pub fn start<S: ExpirySweep>(&mut self, target: Weak<S>, period: Duration) -> Result<bool> {
        if self.stopped || self.handle.is_some() {
            return Ok(false);
        }

        Handle::try_current()?;
        self.handle = Some(spawn_sweeper(target, period));
        Ok(true)
    }

    // == Stop ==
    /// Cancels the sweeper. Idempotent.
    ///
    /// A cycle already running finishes; no new cycle starts.
    pub fn stop(&mut self) -> bool {
        self.stopped = true;
        match self.handle.take() {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    /// Returns true while a sweeper task is alive.
    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }
}

impl Drop for EvictionScheduler {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
