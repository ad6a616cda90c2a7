use crate::chopstick::{self, Chopstick};
use crate::config::{DispatchMode, TableConfig};
use crate::error::DiningError;
use crate::host::{HostActor, HostClient, HostStats};
use crate::lifecycle::Ledger;
use crate::philosopher::{self, Philosopher};
use crate::reporter::Reporter;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::{JoinHandle, JoinSet};
use tracing::{error, info, info_span, Instrument};

/// Channel buffer for the host. Every philosopher has at most one request in
/// flight per task, so this only bounds bursts.
const HOST_BUFFER: usize = 32;

type MealTasks = JoinSet<Result<(), DiningError>>;

/// What a finished dinner looked like.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DinnerSummary {
    /// Meals eaten by philosopher `i + 1`, over the life of the system.
    pub meals_per_philosopher: Vec<usize>,
    /// Meals served by this call to [`DiningSystem::dine`].
    pub total_meals: usize,
    pub host: HostStats,
    pub elapsed: Duration,
}

/// The round coordinator: owns the ring, runs the host, and serves dinners.
///
/// `DiningSystem` is responsible for:
/// - **Setup**: laying out chopsticks, seating philosophers, spawning the host
/// - **Dispatch**: launching every meal as its own task ([`DispatchMode`])
/// - **Completion**: waiting on the [`Ledger`] until every meal is done, with
///   an optional deadline
/// - **Shutdown**: closing the host and waiting for its task
///
/// # Example
///
/// ```rust
/// use dining_host::config::TableConfig;
/// use dining_host::lifecycle::DiningSystem;
/// use dining_host::reporter::{MealPhase, RecordingReporter};
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() {
///     let recorder = RecordingReporter::new(5);
///     let system = DiningSystem::new(TableConfig::default(), Arc::new(recorder.clone())).unwrap();
///
///     let summary = system.dine().await.unwrap();
///     assert_eq!(summary.total_meals, 15);
///     assert_eq!(recorder.total(MealPhase::Starting), 15);
///
///     system.shutdown().await.unwrap();
/// }
/// ```
pub struct DiningSystem {
    /// Client for the host task. Cloned into every meal.
    pub host: HostClient,

    config: TableConfig,
    chopsticks: Vec<Chopstick>,
    philosophers: Vec<Arc<Philosopher>>,
    reporter: Arc<dyn Reporter>,

    /// Host task handle (used for shutdown)
    handles: Vec<JoinHandle<()>>,
}

impl DiningSystem {
    /// Validates `config`, sets the table and starts the host.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(config: TableConfig, reporter: Arc<dyn Reporter>) -> Result<Self, DiningError> {
        config.validate()?;

        let chopsticks = chopstick::ring(config.philosophers);
        let philosophers = philosopher::seat_ring(&chopsticks)
            .into_iter()
            .map(|p| Arc::new(p.with_meal_duration(config.meal_duration)))
            .collect();

        let (host_actor, host) = HostActor::new(HOST_BUFFER, config.host_capacity);
        let host_handle = tokio::spawn(host_actor.run());

        Ok(Self {
            host,
            config,
            chopsticks,
            philosophers,
            reporter,
            handles: vec![host_handle],
        })
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn philosophers(&self) -> &[Arc<Philosopher>] {
        &self.philosophers
    }

    pub fn chopsticks(&self) -> &[Chopstick] {
        &self.chopsticks
    }

    /// Serves `rounds` meals to every philosopher and waits for all of them.
    ///
    /// All tasks are launched before waiting; rounds are free to overlap.
    /// The first meal task to fail (an error or a panic) ends the dinner:
    /// the rest are aborted and that failure is returned. If a deadline is
    /// configured and passes first, every meal task is aborted and
    /// [`DiningError::Stalled`] is returned.
    pub async fn dine(&self) -> Result<DinnerSummary, DiningError> {
        let started = Instant::now();
        let total = self.config.total_meals();
        info!(
            philosophers = self.config.philosophers,
            host_capacity = self.config.host_capacity,
            rounds = self.config.rounds,
            dispatch = ?self.config.dispatch,
            "Dinner started"
        );

        let ledger = Ledger::new();
        ledger.add(total);

        let mut tasks = JoinSet::new();
        match self.config.dispatch {
            DispatchMode::Rounds => self.dispatch_rounds(&ledger, &mut tasks),
            DispatchMode::PerPhilosopher => self.dispatch_per_philosopher(&ledger, &mut tasks),
        }

        let served = match self.config.deadline {
            Some(deadline) => {
                let waited = tokio::time::timeout(deadline, settle(&ledger, &mut tasks)).await;
                match waited {
                    Ok(served) => served,
                    Err(_) => {
                        let outstanding = ledger.outstanding();
                        error!(outstanding, ?deadline, "Dinner stalled");
                        abandon(&mut tasks).await;
                        return Err(DiningError::Stalled {
                            outstanding,
                            deadline,
                        });
                    }
                }
            }
            None => settle(&ledger, &mut tasks).await,
        };

        if let Err(e) = served {
            error!(error = %e, outstanding = ledger.outstanding(), "Meal failed, dinner abandoned");
            abandon(&mut tasks).await;
            return Err(e);
        }

        let host = self.host.stats().await?;
        let summary = DinnerSummary {
            meals_per_philosopher: self.philosophers.iter().map(|p| p.meals_eaten()).collect(),
            total_meals: total,
            host,
            elapsed: started.elapsed(),
        };
        info!(
            total_meals = summary.total_meals,
            peak_seated = summary.host.peak_seated,
            elapsed = ?summary.elapsed,
            "Dinner finished"
        );
        Ok(summary)
    }

    /// One wave of tasks per round, every wave launched immediately.
    fn dispatch_rounds(&self, ledger: &Ledger, tasks: &mut MealTasks) {
        for round in 1..=self.config.rounds {
            for p in &self.philosophers {
                let philosopher = p.clone();
                let host = self.host.clone();
                let reporter = self.reporter.clone();
                let meal = ledger.claim(1);
                let span = info_span!("meal", philosopher = philosopher.id(), round);

                tasks.spawn(
                    async move {
                        let result = philosopher.dine_once(&host, reporter.as_ref()).await;
                        drop(meal);
                        result
                    }
                    .instrument(span),
                );
            }
        }
    }

    /// One task per philosopher, eating `rounds` meals back to back.
    fn dispatch_per_philosopher(&self, ledger: &Ledger, tasks: &mut MealTasks) {
        let rounds = self.config.rounds;
        for p in &self.philosophers {
            let philosopher = p.clone();
            let host = self.host.clone();
            let reporter = self.reporter.clone();
            // Whatever this task doesn't eat is checked off when it ends.
            let mut meals = ledger.claim(rounds);

            tasks.spawn(async move {
                for round in 1..=rounds {
                    let span = info_span!("meal", philosopher = philosopher.id(), round);
                    philosopher
                        .dine_once(&host, reporter.as_ref())
                        .instrument(span)
                        .await?;
                    meals.check_off();
                }
                Ok::<_, DiningError>(())
            });
        }
    }

    /// Closes the host and waits for its task.
    ///
    /// # Returns
    ///
    /// - `Ok(())` if the host shut down cleanly
    /// - `Err(DiningError::TaskFailed)` if it panicked
    pub async fn shutdown(self) -> Result<(), DiningError> {
        info!("Shutting down dining system...");

        // Dropping the last client closes the host's channel.
        drop(self.host);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Host task failed: {:?}", e);
                return Err(DiningError::TaskFailed(e));
            }
        }

        info!("Dining system shutdown complete.");
        Ok(())
    }
}

/// Waits for the ledger to settle, then reaps every task. Returns the first
/// failure as soon as it is joined, without waiting for the rest.
async fn settle(ledger: &Ledger, tasks: &mut MealTasks) -> Result<(), DiningError> {
    let settled = ledger.wait();
    tokio::pin!(settled);

    loop {
        tokio::select! {
            () = &mut settled => break,
            Some(joined) = tasks.join_next() => joined??,
        }
    }

    while let Some(joined) = tasks.join_next().await {
        joined??;
    }
    Ok(())
}

/// Aborts every meal still running and waits until they are gone, so their
/// chopsticks are back on the table and their slots on their way home.
async fn abandon(tasks: &mut MealTasks) {
    tasks.abort_all();
    while tasks.join_next().await.is_some() {}
}
