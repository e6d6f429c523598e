//! Error types for the cache engine
//!
//! Provides unified error handling using thiserror.

use std::fmt;

use thiserror::Error;

// == Listener Event ==
/// Which notification was being delivered when an observer failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerEvent {
    /// An entry was inserted or overwritten
    Added,
    /// An entry was evicted, expired or explicitly removed
    Removed,
}

impl fmt::Display for ListenerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListenerEvent::Added => f.write_str("entry-added"),
            ListenerEvent::Removed => f.write_str("entry-removed"),
        }
    }
}

// == Cache Error Enum ==
/// Unified error type for the cache engine.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Rejected argument; the cache was not modified
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Invalid construction parameters; no engine was created
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The expiry sweeper had to start but no Tokio runtime is running
    #[error("Expiry sweeper needs a Tokio runtime: {0}")]
    Runtime(#[from] tokio::runtime::TryCurrentError),

    /// An observer callback failed.
    ///
    /// The mutation that triggered the notification has already been applied.
    #[error("Listener failed during {event} notification: {source}")]
    Listener {
        event: ListenerEvent,
        #[source]
        source: anyhow::Error,
    },
}

impl CacheError {
    /// Returns true if this error came from an observer rather than the cache itself.
    #[allow(dead_code)]
    pub fn is_listener_failure(&self) -> bool {
        matches!(self, CacheError::Listener { .. })
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache engine.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CacheError::Config("capacity must be positive".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid configuration: capacity must be positive"
        );

        let err = CacheError::InvalidArgument("bad".to_string());
        assert_eq!(err.to_string(), "Invalid argument: bad");
    }

    #[test]
    fn test_listener_error_keeps_source() {
        use std::error::Error as _;

        let err = CacheError::Listener {
            event: ListenerEvent::Removed,
            source: anyhow::anyhow!("observer exploded"),
        };

        assert!(err.is_listener_failure());
        assert_eq!(
            err.to_string(),
            "Listener failed during entry-removed notification: observer exploded"
        );
        assert_eq!(err.source().unwrap().to_string(), "observer exploded");
    }
}
