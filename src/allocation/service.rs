use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::allocation::adapters::{
    AdapterRegistry, AssignmentError, GroupProvisioningError, TicketValidationError,
};
use crate::allocation::domain::{AllocationTarget, ScoreVector, TicketId};
use crate::allocation::engine::AllocationEngine;

/// Orchestrator joining the adapter registry and the decision engine: resolve
/// adapters for the webhook's source, normalize the payload, fetch candidate
/// groups, allocate, then write the assignment back.
pub struct TicketAllocationService {
    registry: AdapterRegistry,
    engine: Arc<AllocationEngine>,
}

/// Serialized view of one processed webhook, returned to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookOutcome {
    pub ticket_id: TicketId,
    pub allocation: AllocationTarget,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scores: Option<ScoreVector>,
    pub rationale: String,
    pub confidence: f64,
    pub timestamp: DateTime<Utc>,
}

impl TicketAllocationService {
    pub fn new(registry: AdapterRegistry, engine: Arc<AllocationEngine>) -> Self {
        Self { registry, engine }
    }

    pub fn engine(&self) -> &AllocationEngine {
        &self.engine
    }

    /// Processes one incoming webhook payload for the given source. The
    /// handler id follows the source id, matching how deployments pair their
    /// ticketing-system adapters.
    pub fn process_webhook(
        &self,
        payload: &serde_json::Value,
        source_id: &str,
    ) -> Result<WebhookOutcome, AllocationServiceError> {
        let source = self
            .registry
            .source(source_id)
            .ok_or_else(|| AllocationServiceError::UnknownSource(source_id.to_string()))?;
        let handler = self
            .registry
            .handler(source_id)
            .ok_or_else(|| AllocationServiceError::UnknownHandler(source_id.to_string()))?;

        let ticket = source.validate_ticket(payload)?;
        let groups = handler.assignment_groups(&ticket.category)?;

        let decision = self.engine.allocate(&ticket, &groups);

        match &decision.target {
            AllocationTarget::Group { id, name } => {
                info!(
                    ticket_id = %ticket.id.0,
                    group_id = %id.0,
                    group_name = %name,
                    confidence = decision.confidence,
                    "ticket allocated"
                );
                handler.assign(&decision)?;
            }
            AllocationTarget::NoEligibleGroup => {
                warn!(
                    ticket_id = %ticket.id.0,
                    category = %ticket.category,
                    rationale = %decision.rationale,
                    "no eligible group for ticket"
                );
            }
        }

        Ok(WebhookOutcome {
            ticket_id: decision.ticket_id.clone(),
            allocation: decision.target.clone(),
            scores: decision.winner().map(|entry| entry.scores),
            rationale: decision.rationale.clone(),
            confidence: decision.confidence,
            timestamp: decision.decision_timestamp,
        })
    }
}

/// Error raised by the webhook orchestrator.
#[derive(Debug, thiserror::Error)]
pub enum AllocationServiceError {
    #[error("no source adapter registered for source id '{0}'")]
    UnknownSource(String),
    #[error("no handler adapter registered for handler id '{0}'")]
    UnknownHandler(String),
    #[error(transparent)]
    Validation(#[from] TicketValidationError),
    #[error(transparent)]
    Provisioning(#[from] GroupProvisioningError),
    #[error(transparent)]
    Assignment(#[from] AssignmentError),
}
