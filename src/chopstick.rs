//! # Chopsticks
//!
//! A [`Chopstick`] is the exclusive resource that sits between two adjacent
//! philosophers. It is a cheap, cloneable handle: both neighbours hold a clone,
//! neither owns it.
//!
//! Picking one up returns a [`HeldChopstick`]. Putting it down consumes that
//! value, so releasing a chopstick you don't hold (or releasing it twice) does
//! not compile.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::trace;

/// Holder value meaning "on the table".
const FREE: usize = 0;

/// One chopstick on the ring, identified by its position (0-based).
#[derive(Clone)]
pub struct Chopstick {
    position: usize,
    lock: Arc<Mutex<()>>,
    holder: Arc<AtomicUsize>,
}

impl Chopstick {
    pub fn new(position: usize) -> Self {
        Self {
            position,
            lock: Arc::new(Mutex::new(())),
            holder: Arc::new(AtomicUsize::new(FREE)),
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Philosopher currently holding this chopstick, if any.
    pub fn holder(&self) -> Option<usize> {
        match self.holder.load(Ordering::Acquire) {
            FREE => None,
            id => Some(id),
        }
    }

    /// Waits until the chopstick is free, then takes it for `philosopher`.
    ///
    /// # Panics
    ///
    /// If the chopstick is already marked as held after the lock was acquired.
    /// That can only happen if exclusivity is broken, so there is nothing to
    /// recover.
    pub async fn pick_up(&self, philosopher: usize) -> HeldChopstick {
        let guard = self.lock.clone().lock_owned().await;
        let previous = self.holder.swap(philosopher, Ordering::AcqRel);
        assert_eq!(
            previous, FREE,
            "chopstick {} picked up by {} while held by {}",
            self.position, philosopher, previous
        );
        trace!(chopstick = self.position, philosopher, "Picked up");
        HeldChopstick {
            position: self.position,
            philosopher,
            holder: self.holder.clone(),
            _guard: guard,
        }
    }
}

impl fmt::Debug for Chopstick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chopstick")
            .field("position", &self.position)
            .field("holder", &self.holder())
            .finish()
    }
}

/// A chopstick in somebody's hand. Dropping it puts it back on the table.
#[must_use = "dropping a held chopstick puts it straight back down"]
pub struct HeldChopstick {
    position: usize,
    philosopher: usize,
    holder: Arc<AtomicUsize>,
    _guard: OwnedMutexGuard<()>,
}

impl HeldChopstick {
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn put_down(self) {
        drop(self);
    }
}

impl Drop for HeldChopstick {
    fn drop(&mut self) {
        // Clear the holder before `_guard` is dropped and the next waiter runs.
        self.holder.store(FREE, Ordering::Release);
        trace!(chopstick = self.position, philosopher = self.philosopher, "Put down");
    }
}

/// Lays out `size` chopsticks, positions `0..size`.
pub fn ring(size: usize) -> Vec<Chopstick> {
    (0..size).map(Chopstick::new).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test]
    async fn test_pick_up_marks_holder() {
        let chopstick = Chopstick::new(3);
        assert_eq!(chopstick.holder(), None);

        let held = chopstick.pick_up(4).await;
        assert_eq!(held.position(), 3);
        assert_eq!(chopstick.holder(), Some(4));

        held.put_down();
        assert_eq!(chopstick.holder(), None);
    }

    #[tokio::test]
    async fn test_second_pick_up_waits_for_put_down() {
        let chopstick = Chopstick::new(0);
        let held = chopstick.pick_up(1).await;

        let neighbour = chopstick.clone();
        let blocked = timeout(Duration::from_millis(50), neighbour.pick_up(2)).await;
        assert!(blocked.is_err(), "neighbour got a held chopstick");

        held.put_down();
        let taken = timeout(Duration::from_secs(1), chopstick.pick_up(2))
            .await
            .expect("chopstick never came free");
        assert_eq!(chopstick.holder(), Some(2));
        drop(taken);
    }

    #[test]
    fn test_ring_positions() {
        let sticks = ring(5);
        let positions: Vec<_> = sticks.iter().map(Chopstick::position).collect();
        assert_eq!(positions, vec![0, 1, 2, 3, 4]);
    }
}
