//! API routes module

pub mod health;
pub mod products;

use axum::Router;
use messaging::MessageBroker;

use crate::state::AppState;

/// Create all API routes, product routes mounted under `path_prefix`
pub fn routes<B: MessageBroker + ?Sized>(state: AppState<B>, path_prefix: &str) -> Router {
    let prefix = path_prefix.trim_end_matches('/');
    products::router(state, prefix).merge(health::router())
}
