use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use messaging::{BusError, Envelope};
use thiserror::Error;

/// Failures local to the gateway. Domain failures arrive inside the reply
/// envelope and never become a `GatewayError`.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Timeout, no responders or any other transport problem
    #[error(transparent)]
    Bus(#[from] BusError),

    /// The reply is not a recognisable envelope
    #[error("malformed reply from '{subject}': {source}")]
    Decode {
        subject: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read request body: {0}")]
    Body(String),
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let body = Envelope::<()>::error(self.to_string());
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_timeout_renders_error_envelope() {
        let response = GatewayError::Bus(BusError::Timeout {
            subject: "products.getall".to_string(),
            timeout: Duration::from_millis(500),
        })
        .into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
