//! Products Gateway
//!
//! HTTP front end of the catalog. Each request becomes one bus request on
//! `<prefix>.<operation>`; the worker's reply envelope is returned as the
//! response body and its status picks the HTTP status.
//!
//! | Envelope / outcome        | HTTP                  |
//! |---------------------------|-----------------------|
//! | `success`                 | 201 (create), 200     |
//! | `fail`                    | 400                   |
//! | `error`                   | 500                   |
//! | timeout, no responders    | 500 (`error` body)    |
//! | unreadable reply          | 500 (`error` body)    |

pub mod api;
pub mod config;
pub mod error;
pub mod rpc;
pub mod state;

use axum::{
    http::{StatusCode, Uri},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use axum_helpers::{create_router, health_router};
use core_config::AppInfo;
use messaging::{Envelope, MessageBroker};
use metrics_exporter_prometheus::PrometheusHandle;

pub use config::{Config, GatewayConfig};
pub use error::GatewayError;
pub use state::AppState;

/// Full gateway router: product routes, `/ping`, `/health` and, when a
/// handle is given, `/metrics`.
pub fn build_router<B: MessageBroker + ?Sized>(
    state: AppState<B>,
    path_prefix: &str,
    app_info: AppInfo,
    metrics: Option<PrometheusHandle>,
) -> Router {
    let mut router = api::routes(state, path_prefix).merge(health_router(app_info));

    if let Some(handle) = metrics {
        router = router.route(
            "/metrics",
            get(move || {
                let handle = handle.clone();
                async move { handle.render() }
            }),
        );
    }

    create_router(router.fallback(not_found))
}

async fn not_found(uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(Envelope::<()>::fail(format!("no route for {}", uri.path()))),
    )
}
