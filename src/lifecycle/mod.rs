//! # Dinner Lifecycle & Orchestration
//!
//! This module sets the table, serves the meals, and clears up afterwards.
//!
//! **Key Responsibilities:**
//! 1. **Setup** - Lay out the chopstick ring, seat the philosophers, spawn the host
//! 2. **Dispatch** - Launch one task per meal (or per philosopher)
//! 3. **Completion** - Track outstanding meals on a shared [`Ledger`]
//! 4. **Shutdown** - Close the host and await its task
//! 5. **Observability Setup** - Initialize tracing
//!
//! ## The DiningSystem Pattern
//!
//! ```rust,ignore
//! let system = DiningSystem::new(config, Arc::new(StdoutReporter))?;
//! let summary = system.dine().await?;
//! system.shutdown().await?;
//! ```
//!
//! ## Ordering Within a Meal
//!
//! Every meal task follows the same order, and the ledger is last:
//!
//! 1. starting reported
//! 2. finishing reported
//! 3. chopsticks put down
//! 4. slot returned to the host
//! 5. ledger checked off
//!
//! So by the time [`Ledger::wait`] returns, every chopstick is back on the
//! table and every release has been sent to the host.
//!
//! ## When a Meal Fails
//!
//! Each task checks its meals off through a [`MealClaim`], which settles on
//! drop, so a task that errors out or unwinds can't leave the ledger waiting.
//! [`DiningSystem::dine`] also watches the tasks themselves: the first one
//! that fails ends the dinner with that error and the rest are aborted.
//! Their chopsticks go back on the table and their slots return to the host
//! as they unwind.
//!
//! ## Shutdown
//!
//! The host exits when its last [`HostClient`](crate::host::HostClient) is
//! dropped. Meal tasks hold clones only while they run, so once a dinner is
//! over the system's own client is the last one, and dropping it in
//! [`DiningSystem::shutdown`] ends the host loop.

pub mod dining_system;
pub mod ledger;
pub mod tracing;

pub use dining_system::*;
pub use ledger::*;
pub use self::tracing::*;
