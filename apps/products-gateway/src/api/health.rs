//! Liveness probe

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};

async fn ping() -> Json<Value> {
    Json(json!({ "message": "pong" }))
}

pub fn router() -> Router {
    Router::new().route("/ping", get(ping))
}
