//! One HTTP request, one bus round trip.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use domain_products::Operation;
use messaging::{EnvelopeStatus, MessageBroker};
use serde_json::{Map, Value};
use std::time::Instant;
use tracing::{debug, instrument, warn};

use crate::error::GatewayError;
use crate::state::AppState;

/// HTTP status for a reply envelope.
///
/// `fail` is the caller's fault, `error` the system's; `success` uses the
/// operation's own status (201 for create, 200 otherwise).
pub fn http_status(status: EnvelopeStatus, on_success: StatusCode) -> StatusCode {
    match status {
        EnvelopeStatus::Success => on_success,
        EnvelopeStatus::Fail => StatusCode::BAD_REQUEST,
        EnvelopeStatus::Error => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Issue the bus request for `operation` and render the reply.
///
/// The reply bytes are returned untouched; only the `status` field is read to
/// pick the HTTP status.
#[instrument(skip(state, payload), fields(bytes = payload.len()))]
pub async fn send_request<B>(
    state: &AppState<B>,
    operation: Operation,
    payload: Bytes,
    on_success: StatusCode,
) -> Result<Response, GatewayError>
where
    B: MessageBroker + ?Sized,
{
    let subject = state.subjects.subject(operation);
    let started = Instant::now();
    state.metrics.request_sent(&subject);

    let reply = match state
        .broker
        .request(&subject, payload, state.request_timeout)
        .await
    {
        Ok(reply) => reply,
        Err(e) => {
            warn!(subject = %subject, error = %e, "Bus request failed");
            state.metrics.request_failed(&subject, e.kind());
            return Err(e.into());
        }
    };

    let status = match EnvelopeStatus::from_reply(&reply) {
        Ok(status) => status,
        Err(source) => {
            warn!(subject = %subject, error = %source, "Malformed reply");
            state.metrics.request_failed(&subject, "decode");
            return Err(GatewayError::Decode { subject, source });
        }
    };

    state
        .metrics
        .reply_received(&subject, status, started.elapsed());
    debug!(subject = %subject, %status, "Reply received");

    Ok((
        http_status(status, on_success),
        [(header::CONTENT_TYPE, "application/json")],
        reply,
    )
        .into_response())
}

/// JSON value for an id taken from the path.
///
/// Numeric ids become JSON numbers. Anything else stays a string, which the
/// worker rejects as a malformed identifier.
pub fn id_value(id: &str) -> Value {
    match id.parse::<u64>() {
        Ok(number) => Value::from(number),
        Err(_) => Value::from(id),
    }
}

/// `{"id": <id>}`
pub fn id_payload(id: &str) -> Bytes {
    let mut object = Map::new();
    object.insert("id".to_string(), id_value(id));
    Bytes::from(Value::Object(object).to_string())
}

/// `{"name": <name>}`, JSON-escaped
pub fn name_payload(name: &str) -> Bytes {
    let mut object = Map::new();
    object.insert("name".to_string(), Value::from(name));
    Bytes::from(Value::Object(object).to_string())
}

/// Body for routes that carry the id in the path as well.
///
/// A JSON object without an `id` gets the path id; any other body is
/// forwarded unchanged.
pub fn with_path_id(body: Bytes, id: &str) -> Bytes {
    match serde_json::from_slice::<Value>(&body) {
        Ok(Value::Object(mut object)) if !object.contains_key("id") => {
            object.insert("id".to_string(), id_value(id));
            Bytes::from(Value::Object(object).to_string())
        }
        _ => body,
    }
}
