//! Application state management

use domain_products::Subjects;
use messaging::RpcMetrics;
use std::sync::Arc;
use std::time::Duration;

use crate::config::GatewayConfig;

/// Shared application state
pub struct AppState<B: ?Sized> {
    pub broker: Arc<B>,
    pub subjects: Arc<Subjects>,
    pub request_timeout: Duration,
    pub metrics: RpcMetrics,
}

impl<B: ?Sized> AppState<B> {
    pub fn new(broker: Arc<B>, config: &GatewayConfig) -> Self {
        Self {
            broker,
            subjects: Arc::new(config.subjects()),
            request_timeout: config.request_timeout,
            metrics: RpcMetrics::new("products-gateway"),
        }
    }
}

impl<B: ?Sized> Clone for AppState<B> {
    fn clone(&self) -> Self {
        Self {
            broker: Arc::clone(&self.broker),
            subjects: Arc::clone(&self.subjects),
            request_timeout: self.request_timeout,
            metrics: self.metrics.clone(),
        }
    }
}
