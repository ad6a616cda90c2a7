//! # Dining Host
//!
//! > **The dining philosophers, with a host at the door.**
//!
//! Five philosophers sit around a table with one chopstick between each pair.
//! To eat, a philosopher needs both neighbouring chopsticks. On top of that, a
//! host lets at most two of them sit down at a time, whatever chopsticks happen
//! to be free. Every philosopher eats exactly three times.
//!
//! ## 🏗️ Design
//!
//! ### Deadlock is the host's problem
//!
//! Everyone picks up their left chopstick first, then their right. On its own
//! that deadlocks the moment all five grab their left at once. The host is what
//! stops it: with fewer seats than philosophers, the seated set can never close
//! the ring into a wait cycle. See [`host`] for the argument.
//!
//! ### Shared state is passed, not global
//!
//! Chopsticks are cloneable handles to one lock each. The host is an actor in
//! its own Tokio task, reached through a cloneable [`HostClient`](host::HostClient).
//! The completion [`Ledger`](lifecycle::Ledger) is handed to every meal task.
//! Nothing lives in a `static`, so several independent tables can run in one
//! process (the tests do exactly that).
//!
//! ### Observable output
//!
//! Each meal prints two lines on stdout, both while the chopsticks are held:
//!
//! ```text
//! starting to eat 3
//! finishing eating 3
//! ```
//!
//! Logs go to stderr via `tracing`; see [`lifecycle::tracing`].
//!
//! ## 🗺️ Module Tour
//!
//! - [`chopstick`]: the shared exclusive resource
//! - [`philosopher`]: one diner and its acquire, eat, release sequence
//! - [`host`]: the admission controller actor and its client
//! - [`lifecycle`]: the round coordinator ([`DiningSystem`](lifecycle::DiningSystem)), ledger and tracing setup
//! - [`reporter`]: meal events, stdout output and an in-memory recorder for tests
//! - [`config`]: table configuration from defaults or environment
//! - [`error`]: configuration and runtime errors
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # The reference dinner: 5 philosophers, 2 seats, 3 rounds
//! cargo run
//!
//! # Bigger table, slower meals, with logs
//! DINING_PHILOSOPHERS=7 DINING_HOST_CAPACITY=3 DINING_MEAL_MILLIS=5 RUST_LOG=debug cargo run
//! ```

pub mod chopstick;
pub mod config;
pub mod error;
pub mod host;
pub mod lifecycle;
pub mod philosopher;
pub mod reporter;
