use super::common::*;
use axum::http::StatusCode;
use std::sync::Arc;
use tower::ServiceExt;

use crate::allocation::adapters::AdapterRegistry;
use crate::allocation::router::webhook_router;
use crate::allocation::service::{AllocationServiceError, TicketAllocationService};
use crate::allocation::servicenow::ServiceNowSource;

fn webhook_request(payload: &serde_json::Value, source: Option<&str>) -> axum::http::Request<axum::body::Body> {
    let mut builder = axum::http::Request::post("/api/v1/webhooks/ticket")
        .header(axum::http::header::CONTENT_TYPE, "application/json");
    if let Some(source) = source {
        builder = builder.header("X-Source-ID", source);
    }
    builder
        .body(axum::body::Body::from(
            serde_json::to_vec(payload).unwrap(),
        ))
        .unwrap()
}

#[tokio::test]
async fn webhook_route_allocates_and_echoes_the_decision() {
    let (service, handler) = build_service();
    let router = webhook_router(service);

    let response = router
        .oneshot(webhook_request(&webhook_payload("network"), None))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["allocation"]["outcome"], "group");
    assert_eq!(payload["ticket_id"], "tkt-webhook-1");
    assert!(payload["confidence"].as_f64().is_some());
    assert!(!handler.assignments().is_empty());
}

#[tokio::test]
async fn webhook_route_reports_no_eligible_group_as_success() {
    let (service, handler) = build_service();
    let router = webhook_router(service);

    let response = router
        .oneshot(webhook_request(&webhook_payload("billing"), None))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["allocation"]["outcome"], "no_eligible_group");
    assert_eq!(payload["confidence"], 0.0);
    assert!(handler.assignments().is_empty());
}

#[tokio::test]
async fn webhook_route_rejects_unknown_sources() {
    let (service, _) = build_service();
    let router = webhook_router(service);

    let response = router
        .oneshot(webhook_request(&webhook_payload("network"), Some("jira")))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert!(payload["error"]
        .as_str()
        .expect("error string")
        .contains("jira"));
}

#[tokio::test]
async fn webhook_route_rejects_malformed_payloads() {
    let (service, _) = build_service();
    let router = webhook_router(service);

    // Missing the required title field.
    let payload = serde_json::json!({ "category": "network" });
    let response = router
        .oneshot(webhook_request(&payload, None))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn webhook_route_maps_provisioning_failures_to_bad_gateway() {
    let registry = AdapterRegistry::new()
        .with_source("servicenow", Arc::new(ServiceNowSource))
        .with_handler("servicenow", Arc::new(UnavailableHandler));
    let service = Arc::new(TicketAllocationService::new(registry, Arc::new(engine())));
    let router = webhook_router(service);

    let response = router
        .oneshot(webhook_request(&webhook_payload("network"), None))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[test]
fn service_surfaces_unknown_handler_separately() {
    let registry = AdapterRegistry::new().with_source("servicenow", Arc::new(ServiceNowSource));
    let service = TicketAllocationService::new(registry, Arc::new(engine()));

    let result = service.process_webhook(&webhook_payload("network"), "servicenow");

    assert!(matches!(
        result,
        Err(AllocationServiceError::UnknownHandler(_))
    ));
}
