// Main entry point - Dependency injection and feed loop
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use probe_status::application::status_updater::StatusChartUpdater;
use probe_status::infrastructure::config::load_status_config;
use probe_status::infrastructure::probe_api::ProbeApi;
use probe_status::infrastructure::tracing_view::TracingView;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Load configuration
    let config = load_status_config()?;

    // Create status source (infrastructure layer)
    let api = Arc::new(ProbeApi::new(&config.server.base_url)?);

    tracing::info!(
        "Starting probe-status for probe {} against {}",
        config.probe.id,
        config.server.base_url
    );

    // Load history and draw the initial charts (application layer)
    let mut updater = StatusChartUpdater::setup(
        api,
        config.probe.id.clone(),
        TracingView::new(),
        config.window(),
    )
    .await?;

    // Follow the live feed until the server closes it
    updater.run().await?;

    Ok(())
}
