//! Health and Prometheus endpoints of the worker process

use axum::{Router, routing::get};
use axum_helpers::health_router;
use core_config::AppInfo;
use metrics_exporter_prometheus::PrometheusHandle;

/// `/health` plus `/metrics` rendered from the installed recorder
pub fn monitoring_router(app: AppInfo, metrics: PrometheusHandle) -> Router {
    Router::new()
        .route(
            "/metrics",
            get(move || {
                let metrics = metrics.clone();
                async move { metrics.render() }
            }),
        )
        .merge(health_router(app))
}
