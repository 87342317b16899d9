//! Transport-level errors.

use std::time::Duration;
use thiserror::Error;

/// Failure of the bus itself, as opposed to a failure reported inside a reply.
///
/// Callers cannot tell a slow responder from a missing one, so every variant
/// is treated as a server-side fault at the edge.
#[derive(Debug, Error)]
pub enum BusError {
    #[error("failed to connect to message bus: {0}")]
    Connection(String),

    #[error("request on '{subject}' timed out after {timeout:?}")]
    Timeout { subject: String, timeout: Duration },

    #[error("no responders available for '{0}'")]
    NoResponders(String),

    #[error("failed to publish to '{subject}': {reason}")]
    Publish { subject: String, reason: String },

    #[error("failed to subscribe to '{subject}': {reason}")]
    Subscribe { subject: String, reason: String },

    #[error("request on '{subject}' failed: {reason}")]
    Request { subject: String, reason: String },

    #[error("failed to flush connection: {0}")]
    Flush(String),

    #[error("failed to drain connection: {0}")]
    Drain(String),

    /// The connection was drained and accepts no more traffic
    #[error("connection is closed")]
    Closed,
}

impl BusError {
    pub fn publish(subject: &str, reason: impl ToString) -> Self {
        Self::Publish {
            subject: subject.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn subscribe(subject: &str, reason: impl ToString) -> Self {
        Self::Subscribe {
            subject: subject.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn request(subject: &str, reason: impl ToString) -> Self {
        Self::Request {
            subject: subject.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, BusError::Timeout { .. })
    }

    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            BusError::Connection(_) => "connection",
            BusError::Timeout { .. } => "timeout",
            BusError::NoResponders(_) => "no_responders",
            BusError::Publish { .. } => "publish",
            BusError::Subscribe { .. } => "subscribe",
            BusError::Request { .. } => "request",
            BusError::Flush(_) => "flush",
            BusError::Drain(_) => "drain",
            BusError::Closed => "closed",
        }
    }
}
