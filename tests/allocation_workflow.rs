//! End-to-end scenarios for the ticket allocation workflow, driven through
//! the public service facade the way the webhook transport uses it.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde_json::json;

use triage_ai::allocation::{
    AdapterRegistry, AllocationEngine, AllocationTarget, AssignmentGroup, EngineConfig, GroupId,
    GroupMetrics, GroupStatus, RequesterLocation, TicketAllocationService,
};
use triage_ai::allocation::servicenow::{ServiceNowHandler, ServiceNowSource};

fn group(id: &str, load: u32, capacity: u32, tags: &[&str], offset: f64) -> AssignmentGroup {
    AssignmentGroup {
        id: GroupId(id.to_string()),
        name: format!("Group {id}"),
        location: RequesterLocation {
            region: None,
            timezone_offset_hours: Some(offset),
            coordinates: None,
        },
        capabilities: tags.iter().map(|tag| tag.to_string()).collect::<BTreeSet<_>>(),
        status: GroupStatus::Active,
        max_capacity: capacity,
        current_load: load,
        metrics: GroupMetrics::default(),
    }
}

fn service_with(
    catalog: Vec<AssignmentGroup>,
) -> (Arc<TicketAllocationService>, Arc<ServiceNowHandler>) {
    let handler = Arc::new(ServiceNowHandler::new(catalog));
    let registry = AdapterRegistry::new()
        .with_source("servicenow", Arc::new(ServiceNowSource))
        .with_handler("servicenow", handler.clone());
    let engine =
        Arc::new(AllocationEngine::new(EngineConfig::default()).expect("default config is valid"));
    (
        Arc::new(TicketAllocationService::new(registry, engine)),
        handler,
    )
}

fn network_payload() -> serde_json::Value {
    json!({
        "ticket_id": "tkt-e2e-1",
        "ticket_number": "INC0020001",
        "title": "Core switch flapping",
        "description": "Spanning tree reconvergence every few minutes",
        "category": "network",
        "priority": "critical",
        "urgency": "high",
        "impact": "high",
        "requester_location": { "timezone_offset": -5.0 }
    })
}

#[test]
fn webhook_flow_allocates_and_writes_back() {
    let (service, handler) = service_with(vec![
        group("network-east", 3, 10, &["network"], -5.0),
        group("network-apac", 2, 10, &["network"], 8.0),
    ]);

    let outcome = service
        .process_webhook(&network_payload(), "servicenow")
        .expect("webhook processes");

    match &outcome.allocation {
        AllocationTarget::Group { id, .. } => assert_eq!(id.0, "network-east"),
        other => panic!("expected an allocation, got {other:?}"),
    }
    assert!(outcome.confidence > 0.0);
    assert!(outcome.scores.is_some());

    let assignments = handler.assignments();
    assert_eq!(assignments.len(), 1);
    assert_eq!(assignments[0].0 .0, "tkt-e2e-1");
    assert_eq!(assignments[0].1 .0, "network-east");
}

#[test]
fn webhook_flow_handles_missing_capability_without_write_back() {
    let (service, handler) = service_with(vec![
        group("network-east", 3, 10, &["network"], -5.0),
        group("platform-west", 1, 10, &["platform"], -8.0),
    ]);

    let payload = json!({
        "ticket_id": "tkt-e2e-2",
        "title": "Invoice discrepancy for August",
        "category": "billing",
        "priority": "low"
    });

    let outcome = service
        .process_webhook(&payload, "servicenow")
        .expect("webhook processes");

    assert_eq!(outcome.allocation, AllocationTarget::NoEligibleGroup);
    assert_eq!(outcome.confidence, 0.0);
    assert!(outcome.rationale.starts_with("No eligible group"));
    assert!(handler.assignments().is_empty());
}

#[test]
fn webhook_flow_generates_ticket_ids_for_sparse_payloads() {
    let (service, _) = service_with(vec![group("catchall", 0, 5, &["other"], 0.0)]);

    let payload = json!({
        "title": "Printer on floor 3 is jammed",
        "category": "other"
    });

    let outcome = service
        .process_webhook(&payload, "servicenow")
        .expect("webhook processes");

    assert!(outcome.ticket_id.0.starts_with("tkt-"));
}

#[test]
fn repeated_webhooks_produce_identical_allocations() {
    let (service, _) = service_with(vec![
        group("network-east", 3, 10, &["network"], -5.0),
        group("network-west", 3, 10, &["network"], -8.0),
    ]);

    let first = service
        .process_webhook(&network_payload(), "servicenow")
        .expect("first webhook");
    let second = service
        .process_webhook(&network_payload(), "servicenow")
        .expect("second webhook");

    assert_eq!(first.allocation, second.allocation);
    assert_eq!(first.scores, second.scores);
    assert_eq!(first.rationale, second.rationale);
    assert_eq!(first.confidence, second.confidence);
}
