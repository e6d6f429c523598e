//! Background Tasks Module
//!
//! Contains background tasks that run periodically while a cache engine lives.
//!
//! # Tasks
//! - Expiry Sweep: Removes timed-out cache entries at a fixed period

mod sweeper;

pub use sweeper::{spawn_sweeper, EvictionScheduler, ExpirySweep};
