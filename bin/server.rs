// Superstore Sales Dashboard - Web Server
// Loads the CSV once, then serves the page and the chart bindings (Axum)

use anyhow::{Context, Result};
use sales_dashboard::{build_router, init_tracing, load_csv, AppState, DashboardConfig};
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let config = DashboardConfig::from_env();
    init_tracing(config.log_json);

    info!(version = sales_dashboard::VERSION, "starting sales dashboard server");

    // Load failure is fatal: nothing is served without the dataset
    let table = match load_csv(&config.data_path) {
        Ok(table) => table,
        Err(e) => {
            error!(path = %config.data_path.display(), error = %e, "failed to load dataset");
            return Err(e).context("Failed to load transactions");
        }
    };

    let state = AppState::new(Arc::new(table));
    let app = build_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("🚀 Dashboard running on http://{}", addr);

    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}
