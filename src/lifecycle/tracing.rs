//! # Observability & Tracing
//!
//! Diagnostics go through `tracing` and are written to **stderr**. Stdout is
//! reserved for the meal lines themselves, so
//!
//! ```bash
//! RUST_LOG=debug cargo run > meals.txt
//! ```
//!
//! leaves `meals.txt` holding exactly the `starting to eat` / `finishing eating`
//! lines.
//!
//! ## What Gets Traced
//!
//! - **Host lifecycle** (`info`): `Host started`, `Host shutdown` with totals
//! - **Seating** (`debug`): `Seated`, `Table full, queued`, `Left the table`
//! - **Meals** (`debug`): `Eating`, inside a `meal{philosopher, round}` span
//! - **Chopsticks** (`trace`): `Picked up`, `Put down`
//! - **Dinner** (`info`): start and summary; stalls at `error`
//!
//! ## Usage Examples
//!
//! ```bash
//! # Dinner summary only
//! RUST_LOG=info cargo run
//!
//! # Watch the host seat and queue philosophers
//! RUST_LOG=debug cargo run
//!
//! # Every chopstick movement
//! RUST_LOG=trace cargo run
//! ```
//!
//! With `RUST_LOG=debug` a contended seat looks like:
//!
//! ```text
//! DEBUG Seated philosopher=1 ticket=1 seated=1
//! DEBUG Seated philosopher=2 ticket=2 seated=2
//! DEBUG Table full, queued philosopher=3 waiting=1
//! DEBUG meal: Eating philosopher=1 meal=1
//! DEBUG Left the table philosopher=1 seated=1
//! DEBUG Seated philosopher=3 ticket=3 seated=2
//! ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
