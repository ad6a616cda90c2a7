//! # Meal Reporting
//!
//! Every meal produces exactly two [`MealEvent`]s, both emitted while the
//! philosopher still holds its chopsticks:
//!
//! ```text
//! starting to eat 3
//! finishing eating 3
//! ```
//!
//! [`StdoutReporter`] prints those lines. [`RecordingReporter`] keeps them in
//! memory and checks table invariants as they arrive, for tests.

pub mod recording;

pub use recording::RecordingReporter;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MealPhase {
    Starting,
    Finishing,
}

/// One observable event of one meal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealEvent {
    /// Philosopher id, 1-based.
    pub philosopher: usize,
    /// Per-philosopher meal number, counting from 1.
    pub meal: usize,
    pub phase: MealPhase,
}

impl MealEvent {
    pub fn starting(philosopher: usize, meal: usize) -> Self {
        Self {
            philosopher,
            meal,
            phase: MealPhase::Starting,
        }
    }

    pub fn finishing(philosopher: usize, meal: usize) -> Self {
        Self {
            philosopher,
            meal,
            phase: MealPhase::Finishing,
        }
    }
}

impl fmt::Display for MealEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.phase {
            MealPhase::Starting => write!(f, "starting to eat {}", self.philosopher),
            MealPhase::Finishing => write!(f, "finishing eating {}", self.philosopher),
        }
    }
}

/// Sink for meal events. Called from many tasks at once.
pub trait Reporter: Send + Sync {
    fn report(&self, event: MealEvent);
}

/// Prints each event on its own line to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutReporter;

impl Reporter for StdoutReporter {
    fn report(&self, event: MealEvent) {
        let mut out = std::io::stdout().lock();
        // A closed stdout shouldn't take the dinner down with it.
        let _ = writeln!(out, "{event}");
    }
}
