use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::json;

use crate::allocation::service::{AllocationServiceError, TicketAllocationService};

const SOURCE_HEADER: &str = "x-source-id";
const DEFAULT_SOURCE: &str = "servicenow";

/// Router builder exposing the webhook ingestion endpoint.
pub fn webhook_router(service: Arc<TicketAllocationService>) -> Router {
    Router::new()
        .route("/api/v1/webhooks/ticket", post(webhook_handler))
        .with_state(service)
}

pub(crate) async fn webhook_handler(
    State(service): State<Arc<TicketAllocationService>>,
    headers: HeaderMap,
    axum::Json(payload): axum::Json<serde_json::Value>,
) -> Response {
    let source_id = headers
        .get(SOURCE_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or(DEFAULT_SOURCE);

    match service.process_webhook(&payload, source_id) {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(error) => {
            let status = match &error {
                AllocationServiceError::UnknownSource(_)
                | AllocationServiceError::UnknownHandler(_) => StatusCode::BAD_REQUEST,
                AllocationServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
                AllocationServiceError::Provisioning(_)
                | AllocationServiceError::Assignment(_) => StatusCode::BAD_GATEWAY,
            };
            let payload = json!({
                "error": error.to_string(),
            });
            (status, axum::Json(payload)).into_response()
        }
    }
}
