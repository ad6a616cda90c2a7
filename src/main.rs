use dining_host::config::TableConfig;
use dining_host::error::DiningError;
use dining_host::lifecycle::{setup_tracing, DiningSystem};
use dining_host::reporter::StdoutReporter;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), DiningError> {
    setup_tracing();

    let config = TableConfig::from_env()?;
    info!(?config, "Setting the table");

    let system = DiningSystem::new(config, Arc::new(StdoutReporter))?;
    let summary = system.dine().await?;
    info!(
        meals = ?summary.meals_per_philosopher,
        peak_seated = summary.host.peak_seated,
        "All philosophers have eaten"
    );

    system.shutdown().await?;
    Ok(())
}
