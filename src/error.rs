//! # Error Types
//!
//! Setup problems are reported as [`ConfigError`] before anything is spawned.
//! Everything that can go wrong once the dinner is running is a [`DiningError`].
//!
//! Contract violations (a chopstick picked up while someone else holds it, a
//! slot released twice) are not errors at all: they panic.

use std::time::Duration;

/// Invalid table configuration, caught before any task is spawned.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum ConfigError {
    /// A ring needs at least three seats to have non-adjacent philosophers.
    #[error("Ring too small: {0} philosophers (need at least 3)")]
    RingTooSmall(usize),

    /// The host must be able to seat somebody.
    #[error("Host capacity must be at least 1")]
    ZeroCapacity,

    /// A host that seats the whole ring can deadlock on the chopsticks.
    #[error("Host capacity {capacity} covers the whole ring of {philosophers}")]
    CapacityCoversRing { capacity: usize, philosophers: usize },

    /// `philosophers * rounds` doesn't fit in a `usize`.
    #[error("Too many meals: {philosophers} philosophers x {rounds} rounds")]
    TooManyMeals { philosophers: usize, rounds: usize },

    /// An environment variable could not be parsed.
    #[error("Invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },
}

/// Errors surfaced while the dinner is running.
#[derive(Debug, thiserror::Error)]
pub enum DiningError {
    #[error("Host closed")]
    HostClosed,
    #[error("Host dropped slot response")]
    HostDropped,
    #[error("Dinner stalled: {outstanding} meals outstanding after {deadline:?}")]
    Stalled { outstanding: usize, deadline: Duration },
    #[error("Task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
