use std::collections::BTreeSet;
use std::sync::Arc;

use axum::response::Response;
use serde_json::{json, Value};

use crate::allocation::adapters::{
    AdapterRegistry, GroupProvisioningError, TicketHandler,
};
use crate::allocation::domain::{
    AllocationDecision, AssignmentGroup, GeoPoint, GroupId, GroupMetrics, GroupStatus,
    RequesterLocation, StandardTicket, TicketId, TicketSeverity,
};
use crate::allocation::engine::{AllocationEngine, EngineConfig};
use crate::allocation::service::TicketAllocationService;
use crate::allocation::servicenow::{ServiceNowHandler, ServiceNowSource};

pub(super) fn ticket(category: &str) -> StandardTicket {
    StandardTicket {
        id: TicketId("tkt-000042".to_string()),
        number: "INC0010042".to_string(),
        title: "VPN tunnel drops every hour".to_string(),
        description: "Site-to-site tunnel renegotiates and drops traffic".to_string(),
        category: category.to_string(),
        priority: TicketSeverity::High,
        urgency: TicketSeverity::High,
        impact: TicketSeverity::Medium,
        source: "servicenow".to_string(),
        requester_location: RequesterLocation {
            region: Some("us-east".to_string()),
            timezone_offset_hours: Some(-5.0),
            coordinates: Some(GeoPoint {
                latitude: 40.71,
                longitude: -74.0,
            }),
        },
        required_skills: Vec::new(),
        metadata: Default::default(),
    }
}

pub(super) fn group(id: &str, load: u32, capacity: u32, tags: &[&str]) -> AssignmentGroup {
    AssignmentGroup {
        id: GroupId(id.to_string()),
        name: format!("Group {id}"),
        location: RequesterLocation::default(),
        capabilities: tags.iter().map(|tag| tag.to_string()).collect::<BTreeSet<_>>(),
        status: GroupStatus::Active,
        max_capacity: capacity,
        current_load: load,
        metrics: GroupMetrics::default(),
    }
}

pub(super) fn group_at_offset(
    id: &str,
    load: u32,
    capacity: u32,
    tags: &[&str],
    offset: f64,
) -> AssignmentGroup {
    let mut group = group(id, load, capacity, tags);
    group.location.timezone_offset_hours = Some(offset);
    group
}

pub(super) fn engine() -> AllocationEngine {
    AllocationEngine::new(EngineConfig::default()).expect("default config is valid")
}

pub(super) fn catalog() -> Vec<AssignmentGroup> {
    vec![
        group_at_offset("network-east", 4, 12, &["network", "vpn"], -5.0),
        group_at_offset("platform-west", 5, 8, &["platform", "network"], -8.0),
        group_at_offset("engineering-apac", 2, 6, &["development", "platform"], 8.0),
    ]
}

pub(super) fn build_service() -> (Arc<TicketAllocationService>, Arc<ServiceNowHandler>) {
    let handler = Arc::new(ServiceNowHandler::new(catalog()));
    let registry = AdapterRegistry::new()
        .with_source("servicenow", Arc::new(ServiceNowSource))
        .with_handler("servicenow", handler.clone());
    let engine = Arc::new(engine());
    (
        Arc::new(TicketAllocationService::new(registry, engine)),
        handler,
    )
}

/// Handler whose provisioning backend is down, for failure-path tests.
pub(super) struct UnavailableHandler;

impl TicketHandler for UnavailableHandler {
    fn assignment_groups(
        &self,
        _category: &str,
    ) -> Result<Vec<AssignmentGroup>, GroupProvisioningError> {
        Err(GroupProvisioningError::Unavailable(
            "group sync offline".to_string(),
        ))
    }

    fn assign(
        &self,
        _decision: &AllocationDecision,
    ) -> Result<(), crate::allocation::adapters::AssignmentError> {
        Ok(())
    }
}

pub(super) fn webhook_payload(category: &str) -> Value {
    json!({
        "ticket_id": "tkt-webhook-1",
        "ticket_number": "INC0010099",
        "title": "Cannot reach the VPN gateway",
        "description": "Requester reports timeouts on the corporate VPN",
        "category": category,
        "priority": "high",
        "urgency": "medium",
        "impact": "medium",
        "requester_location": {
            "region": "us-east",
            "timezone_offset": -5.0,
            "latitude": 40.71,
            "longitude": -74.0
        }
    })
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
