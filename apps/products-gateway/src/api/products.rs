//! Products API routes

use axum::{
    extract::{rejection::BytesRejection, Path, State},
    http::StatusCode,
    response::Response,
    routing::{get, put},
    Router,
};
use bytes::Bytes;
use domain_products::Operation;
use messaging::MessageBroker;
use tracing::debug;

use crate::error::GatewayError;
use crate::rpc::{id_payload, name_payload, send_request, with_path_id};
use crate::state::AppState;

type GatewayResult = Result<Response, GatewayError>;

/// Create products router with every route under `prefix`.
///
/// `prefix` has no trailing slash and may be empty. The collection answers
/// on both `{prefix}` and `{prefix}/`.
pub fn router<B: MessageBroker + ?Sized>(state: AppState<B>, prefix: &str) -> Router {
    let collection = get(get_all::<B>).post(create::<B>);

    let mut router = Router::new().route(&format!("{prefix}/"), collection.clone());
    if !prefix.is_empty() {
        router = router.route(prefix, collection);
    }

    router
        .route(&format!("{prefix}/names/{{name}}"), get(get_by_name::<B>))
        .route(
            &format!("{prefix}/{{id}}"),
            get(get_by_id::<B>).put(update::<B>).delete(delete::<B>),
        )
        .route(&format!("{prefix}/{{id}}/stock"), put(update_stock::<B>))
        .with_state(state)
}

fn read_body(body: Result<Bytes, BytesRejection>) -> Result<Bytes, GatewayError> {
    body.map_err(|e| GatewayError::Body(e.body_text()))
}

async fn create<B: MessageBroker + ?Sized>(
    State(state): State<AppState<B>>,
    body: Result<Bytes, BytesRejection>,
) -> GatewayResult {
    let body = read_body(body)?;
    send_request(&state, Operation::Create, body, StatusCode::CREATED).await
}

async fn get_all<B: MessageBroker + ?Sized>(State(state): State<AppState<B>>) -> GatewayResult {
    send_request(&state, Operation::GetAll, Bytes::new(), StatusCode::OK).await
}

async fn get_by_id<B: MessageBroker + ?Sized>(
    State(state): State<AppState<B>>,
    Path(id): Path<String>,
) -> GatewayResult {
    send_request(&state, Operation::GetById, id_payload(&id), StatusCode::OK).await
}

async fn get_by_name<B: MessageBroker + ?Sized>(
    State(state): State<AppState<B>>,
    Path(name): Path<String>,
) -> GatewayResult {
    send_request(&state, Operation::GetByName, name_payload(&name), StatusCode::OK).await
}

async fn update<B: MessageBroker + ?Sized>(
    State(state): State<AppState<B>>,
    Path(id): Path<String>,
    body: Result<Bytes, BytesRejection>,
) -> GatewayResult {
    debug!(path_id = %id, "Update requested");
    let body = with_path_id(read_body(body)?, &id);
    send_request(&state, Operation::Update, body, StatusCode::OK).await
}

async fn delete<B: MessageBroker + ?Sized>(
    State(state): State<AppState<B>>,
    Path(id): Path<String>,
) -> GatewayResult {
    send_request(&state, Operation::Delete, id_payload(&id), StatusCode::OK).await
}

async fn update_stock<B: MessageBroker + ?Sized>(
    State(state): State<AppState<B>>,
    Path(id): Path<String>,
    body: Result<Bytes, BytesRejection>,
) -> GatewayResult {
    let body = with_path_id(read_body(body)?, &id);
    send_request(&state, Operation::UpdateStock, body, StatusCode::OK).await
}
