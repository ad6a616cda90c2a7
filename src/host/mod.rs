//! The host: a bounded gate on how many philosophers may be at the table.
//!
//! # Why the host prevents deadlock
//!
//! Philosopher `i`'s right chopstick is philosopher `i+1`'s left one, and
//! non-adjacent philosophers share nothing. Everyone picks up left first. A
//! wait cycle would need every philosopher on the ring holding one chopstick
//! and waiting for the next, so it needs all N of them seated at once. With
//! capacity `C <= N - 1` at least one seated philosopher has an unseated right
//! neighbour, whose chopstick nobody else can be holding. That philosopher
//! finishes, releases, and the rest follow.
//!
//! Nothing here depends on pick-up order: it is the seat count alone that
//! rules out the cycle.
//!
//! # Usage
//!
//! ```rust
//! use dining_host::host::{Admission, HostActor};
//!
//! #[tokio::main]
//! async fn main() {
//!     let (actor, client) = HostActor::new(32, 2);
//!     let handle = tokio::spawn(actor.run());
//!
//!     let slot = client.request_slot(1).await.unwrap();
//!     assert_eq!(client.stats().await.unwrap().seated, 1);
//!     client.release_slot(slot).await.unwrap();
//!
//!     drop(client);
//!     handle.await.unwrap();
//! }
//! ```

pub mod actor;
pub mod client;
pub mod message;

pub use actor::HostActor;
pub use client::{Admission, HostClient};
pub use message::{HostRequest, HostStats, Response, Slot};
