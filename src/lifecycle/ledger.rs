//! # Completion Ledger
//!
//! Counts meals that have been dispatched but not finished. The coordinator
//! adds the whole dinner up front, every finished meal checks itself off, and
//! [`Ledger::wait`] returns once the count is back to zero.
//!
//! Tasks check meals off through a [`MealClaim`], so a task that returns
//! early or unwinds still settles its share of the count.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

#[derive(Default)]
struct LedgerInner {
    outstanding: AtomicUsize,
    settled: Notify,
}

/// Shared outstanding-work counter. Clones refer to the same count.
#[derive(Clone, Default)]
pub struct Ledger {
    inner: Arc<LedgerInner>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, meals: usize) {
        self.inner.outstanding.fetch_add(meals, Ordering::AcqRel);
    }

    /// Checks off one meal.
    pub fn done(&self) {
        self.done_many(1);
    }

    /// Checks off `meals` at once.
    ///
    /// # Panics
    ///
    /// If that would take the count below zero.
    pub fn done_many(&self, meals: usize) {
        if meals == 0 {
            return;
        }
        let before = self.inner.outstanding.fetch_sub(meals, Ordering::AcqRel);
        assert!(before >= meals, "ledger underflow: {before} outstanding, {meals} done");
        if before == meals {
            self.inner.settled.notify_waiters();
        }
    }

    /// Makes the caller answerable for `meals` of the count already added.
    pub fn claim(&self, meals: usize) -> MealClaim {
        MealClaim {
            ledger: self.clone(),
            remaining: meals,
        }
    }

    pub fn outstanding(&self) -> usize {
        self.inner.outstanding.load(Ordering::Acquire)
    }

    /// Waits until nothing is outstanding.
    pub async fn wait(&self) {
        loop {
            let settled = self.inner.settled.notified();
            tokio::pin!(settled);
            // Register before checking so a `done` in between isn't missed.
            settled.as_mut().enable();
            if self.outstanding() == 0 {
                return;
            }
            settled.await;
        }
    }
}

/// A task's share of the [`Ledger`]. Whatever is still unchecked when the
/// claim is dropped gets checked off then.
#[must_use = "dropping a claim checks all of its meals off"]
pub struct MealClaim {
    ledger: Ledger,
    remaining: usize,
}

impl MealClaim {
    /// Checks off one meal of this claim.
    pub fn check_off(&mut self) {
        if self.remaining > 0 {
            self.remaining -= 1;
            self.ledger.done();
        }
    }

    pub fn remaining(&self) -> usize {
        self.remaining
    }
}

impl Drop for MealClaim {
    fn drop(&mut self) {
        self.ledger.done_many(self.remaining);
    }
}
