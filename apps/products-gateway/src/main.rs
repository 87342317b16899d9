//! Products Gateway - HTTP to bus bridge

use axum_helpers::{create_production_app, ShutdownCoordinator};
use core_config::tracing::{init_tracing, install_color_eyre};
use eyre::WrapErr;
use messaging::metrics::init_metrics;
use messaging::nats::NatsBroker;
use messaging::MessageBroker;
use products_gateway::{build_router, AppState, Config};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    let metrics_handle = init_metrics().wrap_err("Failed to install Prometheus recorder")?;

    info!(
        name = %config.app.name,
        version = %config.app.version,
        subject_prefix = %config.gateway.subject_prefix,
        timeout_ms = config.gateway.request_timeout.as_millis() as u64,
        "Starting products gateway"
    );

    let broker = Arc::new(
        NatsBroker::connect(&config.nats)
            .await
            .wrap_err_with(|| format!("Failed to connect to NATS at {}", config.nats.urls))?,
    );

    let state = AppState::new(broker.clone(), &config.gateway);
    let router = build_router(
        state,
        &config.gateway.path_prefix,
        config.app,
        Some(metrics_handle),
    );

    let shutdown = ShutdownCoordinator::new();
    shutdown.listen_for_signals();

    // HTTP stops first, then the bus connection is drained and closed
    create_production_app(router, &config.server, shutdown, SHUTDOWN_TIMEOUT, async move {
        match broker.drain().await {
            Ok(()) => info!("Bus connection drained"),
            Err(e) => warn!(error = %e, "Failed to drain bus connection"),
        }
    })
    .await
    .wrap_err("Server error")?;

    info!("Products gateway shutdown complete");
    Ok(())
}
