//! Table configuration.
//!
//! Defaults to the reference dinner: 5 philosophers, a host seating 2, 3 rounds.
//! Each field can be overridden from the environment:
//!
//! - `DINING_PHILOSOPHERS`: ring size (default `5`)
//! - `DINING_HOST_CAPACITY`: seats at the table (default `2`)
//! - `DINING_ROUNDS`: meals per philosopher (default `3`)
//! - `DINING_DISPATCH`: `rounds` or `loop` (default `rounds`)
//! - `DINING_MEAL_MILLIS`: time spent eating (default `0`)
//! - `DINING_DEADLINE_MILLIS`: give up after this long, `0` to wait forever (default `10000`)

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_PHILOSOPHERS: usize = 5;
const DEFAULT_HOST_CAPACITY: usize = 2;
const DEFAULT_ROUNDS: usize = 3;
const DEFAULT_DEADLINE: Duration = Duration::from_secs(10);

/// How the coordinator hands out meals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchMode {
    /// One wave of N tasks per round, all waves launched without waiting.
    #[default]
    Rounds,
    /// One task per philosopher, eating `rounds` times in a row.
    #[serde(rename = "loop")]
    PerPhilosopher,
}

impl FromStr for DispatchMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rounds" => Ok(Self::Rounds),
            "loop" => Ok(Self::PerPhilosopher),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
    pub philosophers: usize,
    pub host_capacity: usize,
    pub rounds: usize,
    pub dispatch: DispatchMode,
    pub meal_duration: Duration,
    /// Liveness safety net. `None` waits forever.
    pub deadline: Option<Duration>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            philosophers: DEFAULT_PHILOSOPHERS,
            host_capacity: DEFAULT_HOST_CAPACITY,
            rounds: DEFAULT_ROUNDS,
            dispatch: DispatchMode::default(),
            meal_duration: Duration::ZERO,
            deadline: Some(DEFAULT_DEADLINE),
        }
    }
}

impl TableConfig {
    pub fn new(philosophers: usize, host_capacity: usize, rounds: usize) -> Self {
        Self {
            philosophers,
            host_capacity,
            rounds,
            ..Self::default()
        }
    }

    pub fn with_dispatch(mut self, dispatch: DispatchMode) -> Self {
        self.dispatch = dispatch;
        self
    }

    pub fn with_meal_duration(mut self, meal_duration: Duration) -> Self {
        self.meal_duration = meal_duration;
        self
    }

    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    /// Reads overrides from the process environment. Unset variables keep
    /// their defaults. The result is validated.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|var| std::env::var(var).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable lookup.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(n) = parse_var(&lookup, "DINING_PHILOSOPHERS")? {
            config.philosophers = n;
        }
        if let Some(c) = parse_var(&lookup, "DINING_HOST_CAPACITY")? {
            config.host_capacity = c;
        }
        if let Some(r) = parse_var(&lookup, "DINING_ROUNDS")? {
            config.rounds = r;
        }
        if let Some(mode) = parse_var(&lookup, "DINING_DISPATCH")? {
            config.dispatch = mode;
        }
        if let Some(ms) = parse_var::<u64>(&lookup, "DINING_MEAL_MILLIS")? {
            config.meal_duration = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_var::<u64>(&lookup, "DINING_DEADLINE_MILLIS")? {
            config.deadline = (ms > 0).then_some(Duration::from_millis(ms));
        }

        config.validate()?;
        Ok(config)
    }

    /// Rejects tables that can't be served safely: fewer than 3 seats, no
    /// host capacity, a host that seats the whole ring, or more meals than
    /// can be counted.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.philosophers < 3 {
            return Err(ConfigError::RingTooSmall(self.philosophers));
        }
        if self.host_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.host_capacity >= self.philosophers {
            return Err(ConfigError::CapacityCoversRing {
                capacity: self.host_capacity,
                philosophers: self.philosophers,
            });
        }
        if self.philosophers.checked_mul(self.rounds).is_none() {
            return Err(ConfigError::TooManyMeals {
                philosophers: self.philosophers,
                rounds: self.rounds,
            });
        }
        Ok(())
    }

    /// Saturates on tables that [`validate`](Self::validate) would reject.
    pub fn total_meals(&self) -> usize {
        self.philosophers.saturating_mul(self.rounds)
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(var) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { var, value }),
    }
}
