//! # Recording Reporter
//!
//! An in-memory [`Reporter`] for tests. Besides keeping every event in arrival
//! order, it tracks who is eating right now and flags anything that should be
//! impossible:
//!
//! - two neighbours eating at once (they share a chopstick)
//! - a philosopher starting a meal while already eating
//! - meal numbers that skip or repeat
//! - a finish without a matching start
//! - more diners than the host capacity, when one is given
//!
//! # Example
//! ```rust
//! use dining_host::reporter::{MealEvent, RecordingReporter, Reporter};
//!
//! let recorder = RecordingReporter::new(5).with_capacity(2);
//! recorder.report(MealEvent::starting(1, 1));
//! recorder.report(MealEvent::starting(3, 1));
//! recorder.report(MealEvent::finishing(1, 1));
//! recorder.report(MealEvent::finishing(3, 1));
//!
//! assert_eq!(recorder.peak_diners(), 2);
//! assert!(recorder.violations().is_empty());
//! ```

use super::{MealEvent, MealPhase, Reporter};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Default)]
struct Recording {
    events: Vec<MealEvent>,
    /// philosopher -> meal in progress
    eating: HashMap<usize, usize>,
    last_meal: HashMap<usize, usize>,
    peak_diners: usize,
    violations: Vec<String>,
}

/// Records meal events and checks table invariants as they arrive.
#[derive(Clone)]
pub struct RecordingReporter {
    ring_size: usize,
    capacity: Option<usize>,
    inner: Arc<Mutex<Recording>>,
}

impl RecordingReporter {
    pub fn new(ring_size: usize) -> Self {
        Self {
            ring_size,
            capacity: None,
            inner: Arc::new(Mutex::new(Recording::default())),
        }
    }

    /// Also flag any moment with more than `capacity` philosophers eating.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    fn lock(&self) -> MutexGuard<'_, Recording> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn events(&self) -> Vec<MealEvent> {
        self.lock().events.clone()
    }

    /// Events rendered as output lines.
    pub fn lines(&self) -> Vec<String> {
        self.lock().events.iter().map(ToString::to_string).collect()
    }

    pub fn count(&self, philosopher: usize, phase: MealPhase) -> usize {
        self.lock()
            .events
            .iter()
            .filter(|e| e.philosopher == philosopher && e.phase == phase)
            .count()
    }

    pub fn total(&self, phase: MealPhase) -> usize {
        self.lock().events.iter().filter(|e| e.phase == phase).count()
    }

    /// Every philosopher that reported at least once.
    pub fn diners(&self) -> HashSet<usize> {
        self.lock().events.iter().map(|e| e.philosopher).collect()
    }

    pub fn peak_diners(&self) -> usize {
        self.lock().peak_diners
    }

    pub fn violations(&self) -> Vec<String> {
        self.lock().violations.clone()
    }

    fn neighbours(&self, philosopher: usize) -> [usize; 2] {
        let left = if philosopher == 1 {
            self.ring_size
        } else {
            philosopher - 1
        };
        let right = philosopher % self.ring_size + 1;
        [left, right]
    }
}

impl Reporter for RecordingReporter {
    fn report(&self, event: MealEvent) {
        let neighbours = self.neighbours(event.philosopher);
        let mut rec = self.lock();
        let id = event.philosopher;

        match event.phase {
            MealPhase::Starting => {
                if rec.eating.contains_key(&id) {
                    rec.violations
                        .push(format!("philosopher {id} started meal {} while eating", event.meal));
                }
                for n in neighbours {
                    if rec.eating.contains_key(&n) {
                        rec.violations
                            .push(format!("philosopher {id} started while neighbour {n} eats"));
                    }
                }
                let expected = rec.last_meal.get(&id).copied().unwrap_or(0) + 1;
                if event.meal != expected {
                    rec.violations.push(format!(
                        "philosopher {id} started meal {} (expected {expected})",
                        event.meal
                    ));
                }
                rec.last_meal.insert(id, event.meal);
                rec.eating.insert(id, event.meal);
                rec.peak_diners = rec.peak_diners.max(rec.eating.len());
                if let Some(capacity) = self.capacity {
                    if rec.eating.len() > capacity {
                        let diners = rec.eating.len();
                        rec.violations
                            .push(format!("{diners} eating with host capacity {capacity}"));
                    }
                }
            }
            MealPhase::Finishing => {
                let open = rec.eating.remove(&id);
                match open {
                    Some(meal) if meal == event.meal => {}
                    Some(meal) => rec.violations.push(format!(
                        "philosopher {id} finished meal {} but was eating meal {meal}",
                        event.meal
                    )),
                    None => rec.violations.push(format!(
                        "philosopher {id} finished meal {} without starting",
                        event.meal
                    )),
                }
            }
        }

        rec.events.push(event);
    }
}
