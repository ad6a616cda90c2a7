//! # Philosophers
//!
//! A [`Philosopher`] knows its id and the two chopsticks beside it. Everything
//! it does is in [`Philosopher::dine_once`]; the coordinator decides how often
//! and from which task that runs.

use crate::chopstick::Chopstick;
use crate::error::DiningError;
use crate::host::Admission;
use crate::reporter::{MealEvent, Reporter};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::debug;

#[derive(Debug)]
pub struct Philosopher {
    id: usize,
    left: Chopstick,
    right: Chopstick,
    meal_duration: Duration,
    meals_eaten: AtomicUsize,
}

impl Philosopher {
    /// `id` is 1-based.
    pub fn new(id: usize, left: Chopstick, right: Chopstick) -> Self {
        Self {
            id,
            left,
            right,
            meal_duration: Duration::ZERO,
            meals_eaten: AtomicUsize::new(0),
        }
    }

    /// Time spent eating between the two reports. Zero by default.
    pub fn with_meal_duration(mut self, meal_duration: Duration) -> Self {
        self.meal_duration = meal_duration;
        self
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn left(&self) -> &Chopstick {
        &self.left
    }

    pub fn right(&self) -> &Chopstick {
        &self.right
    }

    pub fn meals_eaten(&self) -> usize {
        self.meals_eaten.load(Ordering::Acquire)
    }

    /// One meal: get seated, pick up left then right, report, put both down,
    /// leave the table.
    ///
    /// The finishing report goes out while both chopsticks are still held.
    pub async fn dine_once(
        &self,
        host: &dyn Admission,
        reporter: &dyn Reporter,
    ) -> Result<(), DiningError> {
        let slot = host.request_slot(self.id).await?;

        let left = self.left.pick_up(self.id).await;
        let right = self.right.pick_up(self.id).await;

        // Both chopsticks held: no other task of ours can be in here.
        let meal = self.meals_eaten.load(Ordering::Acquire) + 1;
        debug!(philosopher = self.id, meal, "Eating");
        reporter.report(MealEvent::starting(self.id, meal));
        if !self.meal_duration.is_zero() {
            tokio::time::sleep(self.meal_duration).await;
        }
        reporter.report(MealEvent::finishing(self.id, meal));
        self.meals_eaten.store(meal, Ordering::Release);

        right.put_down();
        left.put_down();

        host.release_slot(slot).await
    }
}

/// Seats one philosopher per chopstick. Philosopher `i` (1-based) gets
/// chopstick `i - 1` on the left and `i mod n` on the right, so each
/// right chopstick is the next philosopher's left.
pub fn seat_ring(chopsticks: &[Chopstick]) -> Vec<Philosopher> {
    let n = chopsticks.len();
    (0..n)
        .map(|i| Philosopher::new(i + 1, chopsticks[i].clone(), chopsticks[(i + 1) % n].clone()))
        .collect()
}
