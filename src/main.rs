// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use anyhow::Context;
use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::mount_registry::MountRegistry;
use crate::infrastructure::config::load_settings;
use crate::infrastructure::mount_table::MountTable;
use crate::infrastructure::quantumleap_source::QuantumLeapSource;
use crate::presentation::boards;
use crate::presentation::handlers::{health_check, read_version};

/// Service endpoints plus every mounted dashboard.
fn build_router(dashboards: MountTable) -> Router {
    let service = Router::new()
        .route("/", get(read_version))
        .route("/version", get(read_version))
        .route("/healthz", get(health_check));

    dashboards
        .into_router(service)
        .layer(TraceLayer::new_for_http())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let settings = load_settings()?;

    // Create data source (infrastructure layer)
    let source = Arc::new(QuantumLeapSource::new(&settings.quantumleap_base_url));

    // Assemble and mount every configured dashboard; any failure aborts startup
    let mut registry = MountRegistry::new(MountTable::new(), boards::catalog(), source);
    registry
        .mount_all(&settings)
        .context("Failed to mount dashboards")?;
    tracing::info!("Mounted {} dashboards", registry.mounted().len());

    let dashboards = registry.into_server();
    for path in dashboards.paths() {
        tracing::debug!("Serving dashboard at {}", path);
    }
    let router = build_router(dashboards);

    // Start server
    let addr: SocketAddr = settings
        .bind_address
        .parse()
        .with_context(|| format!("Invalid bind address {}", settings.bind_address))?;
    tracing::info!("Starting dazzler on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
