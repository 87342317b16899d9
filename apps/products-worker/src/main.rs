//! Products Worker - bus responder for catalog operations

use axum_helpers::{ShutdownCoordinator, serve};
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_products::{InMemoryProductRepository, ProductService};
use eyre::WrapErr;
use messaging::metrics::init_metrics;
use messaging::nats::NatsBroker;
use products_worker::monitoring::monitoring_router;
use products_worker::{Config, ProductsWorker};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    let metrics_handle = init_metrics().wrap_err("Failed to install Prometheus recorder")?;

    info!(
        name = %config.app.name,
        version = %config.app.version,
        environment = ?config.environment,
        "Starting products worker"
    );

    let broker = NatsBroker::connect(&config.nats)
        .await
        .wrap_err_with(|| format!("Failed to connect to NATS at {}", config.nats.urls))?;

    let usecase = ProductService::new(InMemoryProductRepository::new());
    let worker = ProductsWorker::new(Arc::new(broker), Arc::new(usecase), config.worker.clone());

    // Any missing subscription would only surface as client timeouts
    let subscriptions = worker
        .subscribe_all()
        .await
        .wrap_err("Failed to subscribe to product subjects")?;

    let shutdown = ShutdownCoordinator::new();
    shutdown.listen_for_signals();

    let listener = TcpListener::bind(("0.0.0.0", config.metrics_port))
        .await
        .wrap_err_with(|| format!("Failed to bind metrics port {}", config.metrics_port))?;
    let monitoring = monitoring_router(config.app, metrics_handle);
    let monitoring_shutdown = shutdown.clone();
    let monitoring_task = tokio::spawn(async move {
        let stopped = async move { monitoring_shutdown.wait().await };
        if let Err(e) = serve(listener, monitoring, stopped).await {
            error!(error = %e, "Monitoring server failed");
        }
    });

    let outcome = worker.run(subscriptions, shutdown.subscribe()).await;
    // The loops also end when the bus closes every subscription
    shutdown.shutdown();
    monitoring_task.await.ok();
    outcome?;

    info!("Products worker shutdown complete");
    Ok(())
}
