//! Prometheus metrics for bus request/reply traffic.

use crate::envelope::EnvelopeStatus;
use metrics::{counter, histogram};
use std::time::Duration;

/// Metrics emitted by either side of a request/reply exchange.
///
/// Without an installed recorder every call is a no-op, so libraries and
/// tests can use this freely.
#[derive(Clone)]
pub struct RpcMetrics {
    service: String,
}

impl RpcMetrics {
    pub fn new(service: &str) -> Self {
        Self {
            service: service.to_string(),
        }
    }

    /// Request sent by a caller.
    pub fn request_sent(&self, subject: &str) {
        counter!(
            "bus_rpc_requests_total",
            "service" => self.service.clone(),
            "subject" => subject.to_string()
        )
        .increment(1);
    }

    /// Reply received by a caller, labelled with its envelope status.
    pub fn reply_received(&self, subject: &str, status: EnvelopeStatus, duration: Duration) {
        counter!(
            "bus_rpc_replies_total",
            "service" => self.service.clone(),
            "subject" => subject.to_string(),
            "status" => status.as_str()
        )
        .increment(1);

        histogram!(
            "bus_rpc_request_duration_seconds",
            "service" => self.service.clone(),
            "subject" => subject.to_string()
        )
        .record(duration.as_secs_f64());
    }

    /// Request that never produced a usable reply.
    pub fn request_failed(&self, subject: &str, reason: &'static str) {
        counter!(
            "bus_rpc_failures_total",
            "service" => self.service.clone(),
            "subject" => subject.to_string(),
            "reason" => reason
        )
        .increment(1);
    }

    /// Message taken off a subscription by a responder.
    pub fn message_received(&self, subject: &str) {
        counter!(
            "bus_rpc_messages_received_total",
            "service" => self.service.clone(),
            "subject" => subject.to_string()
        )
        .increment(1);
    }

    /// Reply published by a responder.
    pub fn reply_published(&self, subject: &str, status: EnvelopeStatus, duration: Duration) {
        counter!(
            "bus_rpc_replies_published_total",
            "service" => self.service.clone(),
            "subject" => subject.to_string(),
            "status" => status.as_str()
        )
        .increment(1);

        histogram!(
            "bus_rpc_dispatch_duration_seconds",
            "service" => self.service.clone(),
            "subject" => subject.to_string()
        )
        .record(duration.as_secs_f64());
    }
}

/// Install the global Prometheus recorder and return a handle for rendering.
#[cfg(feature = "prometheus")]
pub fn init_metrics() -> Result<metrics_exporter_prometheus::PrometheusHandle, metrics_exporter_prometheus::BuildError> {
    metrics_exporter_prometheus::PrometheusBuilder::new().install_recorder()
}
