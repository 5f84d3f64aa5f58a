use std::collections::BTreeMap;
use std::sync::Arc;

use crate::allocation::domain::{AllocationDecision, AssignmentGroup, StandardTicket};

/// Normalizes a source-system-specific webhook payload into the canonical
/// ticket shape. The engine never sees raw payloads.
pub trait TicketSource: Send + Sync {
    fn validate_ticket(
        &self,
        payload: &serde_json::Value,
    ) -> Result<StandardTicket, TicketValidationError>;
}

/// Supplies candidate groups for a category and performs the final write-back
/// of an allocation to the external ticketing system. An empty group list is
/// a legal response and routes through the "no eligible group" path.
pub trait TicketHandler: Send + Sync {
    fn assignment_groups(
        &self,
        category: &str,
    ) -> Result<Vec<AssignmentGroup>, GroupProvisioningError>;

    fn assign(&self, decision: &AllocationDecision) -> Result<(), AssignmentError>;
}

/// Raised when a payload is missing required fields or carries malformed ones.
#[derive(Debug, thiserror::Error)]
pub enum TicketValidationError {
    #[error("payload must be a JSON object")]
    NotAnObject,
    #[error("missing required field '{0}'")]
    MissingField(&'static str),
    #[error("field '{field}' is malformed: {detail}")]
    MalformedField { field: &'static str, detail: String },
}

/// Raised when the candidate group list cannot be fetched.
#[derive(Debug, thiserror::Error)]
pub enum GroupProvisioningError {
    #[error("group provisioning unavailable: {0}")]
    Unavailable(String),
}

/// Raised when the assignment write-back to the ticketing system fails.
#[derive(Debug, thiserror::Error)]
pub enum AssignmentError {
    #[error("assignment write-back failed: {0}")]
    WriteBack(String),
}

/// Immutable adapter wiring built once at process startup and shared by
/// reference into the orchestrator. Registration happens before the service
/// starts; lookups afterwards are read-only.
#[derive(Default, Clone)]
pub struct AdapterRegistry {
    sources: BTreeMap<String, Arc<dyn TicketSource>>,
    handlers: BTreeMap<String, Arc<dyn TicketHandler>>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, source_id: impl Into<String>, source: Arc<dyn TicketSource>) -> Self {
        self.sources.insert(source_id.into(), source);
        self
    }

    pub fn with_handler(
        mut self,
        handler_id: impl Into<String>,
        handler: Arc<dyn TicketHandler>,
    ) -> Self {
        self.handlers.insert(handler_id.into(), handler);
        self
    }

    pub fn source(&self, source_id: &str) -> Option<Arc<dyn TicketSource>> {
        self.sources.get(source_id).cloned()
    }

    pub fn handler(&self, handler_id: &str) -> Option<Arc<dyn TicketHandler>> {
        self.handlers.get(handler_id).cloned()
    }

    pub fn source_ids(&self) -> impl Iterator<Item = &str> {
        self.sources.keys().map(String::as_str)
    }
}
