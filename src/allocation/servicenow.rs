//! ServiceNow adapters: payload normalization on the source side and a
//! catalog-backed handler performing group provisioning and assignment
//! write-back.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use serde_json::Value;
use tracing::info;

use crate::allocation::adapters::{
    AssignmentError, GroupProvisioningError, TicketHandler, TicketSource, TicketValidationError,
};
use crate::allocation::domain::{
    AllocationDecision, AssignmentGroup, GeoPoint, GroupId, RequesterLocation, StandardTicket,
    TicketId, TicketSeverity,
};

static TICKET_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_ticket_id() -> TicketId {
    let id = TICKET_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    TicketId(format!("tkt-{id:06}"))
}

/// Maps the ServiceNow webhook payload shape onto `StandardTicket`. Title and
/// category are required; everything else degrades to defaults so a sparse
/// payload still normalizes.
#[derive(Debug, Default)]
pub struct ServiceNowSource;

impl TicketSource for ServiceNowSource {
    fn validate_ticket(&self, payload: &Value) -> Result<StandardTicket, TicketValidationError> {
        let object = payload
            .as_object()
            .ok_or(TicketValidationError::NotAnObject)?;

        let title = required_string(object, "title")?;
        let category = required_string(object, "category")?;

        let id = object
            .get("ticket_id")
            .and_then(Value::as_str)
            .filter(|raw| !raw.trim().is_empty())
            .map(|raw| TicketId(raw.to_string()))
            .unwrap_or_else(next_ticket_id);

        Ok(StandardTicket {
            id,
            number: optional_string(object, "ticket_number"),
            title,
            description: optional_string(object, "description"),
            category,
            priority: severity(object, "priority"),
            urgency: severity(object, "urgency"),
            impact: severity(object, "impact"),
            source: "servicenow".to_string(),
            requester_location: location(object.get("requester_location")),
            required_skills: string_list(object.get("required_skills")),
            metadata: metadata(object.get("external_metadata")),
        })
    }
}

fn required_string(
    object: &serde_json::Map<String, Value>,
    field: &'static str,
) -> Result<String, TicketValidationError> {
    match object.get(field) {
        Some(Value::String(raw)) if !raw.trim().is_empty() => Ok(raw.trim().to_string()),
        Some(Value::String(_)) | None => Err(TicketValidationError::MissingField(field)),
        Some(other) => Err(TicketValidationError::MalformedField {
            field,
            detail: format!("expected a string, got {other}"),
        }),
    }
}

fn optional_string(object: &serde_json::Map<String, Value>, field: &str) -> String {
    object
        .get(field)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .trim()
        .to_string()
}

fn severity(object: &serde_json::Map<String, Value>, field: &str) -> TicketSeverity {
    object
        .get(field)
        .and_then(Value::as_str)
        .map(TicketSeverity::parse_lenient)
        .unwrap_or(TicketSeverity::Low)
}

fn location(value: Option<&Value>) -> RequesterLocation {
    let Some(object) = value.and_then(Value::as_object) else {
        return RequesterLocation::default();
    };

    let coordinates = match (
        object.get("latitude").and_then(Value::as_f64),
        object.get("longitude").and_then(Value::as_f64),
    ) {
        (Some(latitude), Some(longitude)) => Some(GeoPoint {
            latitude,
            longitude,
        }),
        _ => None,
    };

    RequesterLocation {
        region: object
            .get("region")
            .and_then(Value::as_str)
            .map(str::to_string),
        timezone_offset_hours: object.get("timezone_offset").and_then(Value::as_f64),
        coordinates,
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn metadata(value: Option<&Value>) -> BTreeMap<String, String> {
    value
        .and_then(Value::as_object)
        .map(|object| {
            object
                .iter()
                .filter_map(|(key, value)| {
                    value.as_str().map(|raw| (key.clone(), raw.to_string()))
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Handler backed by a per-call group catalog snapshot. Assignments are
/// recorded in memory and logged; a production deployment would push them
/// through the ServiceNow table API instead.
pub struct ServiceNowHandler {
    catalog: Vec<AssignmentGroup>,
    assignments: Mutex<Vec<(TicketId, GroupId)>>,
}

impl ServiceNowHandler {
    pub fn new(catalog: Vec<AssignmentGroup>) -> Self {
        Self {
            catalog,
            assignments: Mutex::new(Vec::new()),
        }
    }

    /// Assignments written back so far, oldest first.
    pub fn assignments(&self) -> Vec<(TicketId, GroupId)> {
        self.assignments
            .lock()
            .expect("assignment mutex poisoned")
            .clone()
    }
}

impl TicketHandler for ServiceNowHandler {
    fn assignment_groups(
        &self,
        category: &str,
    ) -> Result<Vec<AssignmentGroup>, GroupProvisioningError> {
        // The catalog is already scoped per deployment; category filtering
        // stays with the engine's capability rules, which also honor
        // required_skills overlap.
        let _ = category;
        Ok(self.catalog.clone())
    }

    fn assign(&self, decision: &AllocationDecision) -> Result<(), AssignmentError> {
        let Some(group_id) = decision.target.group_id() else {
            return Ok(());
        };

        info!(
            ticket_id = %decision.ticket_id.0,
            group_id = %group_id.0,
            confidence = decision.confidence,
            "writing allocation back to servicenow"
        );

        self.assignments
            .lock()
            .map_err(|_| AssignmentError::WriteBack("assignment log poisoned".to_string()))?
            .push((decision.ticket_id.clone(), group_id.clone()));
        Ok(())
    }
}
