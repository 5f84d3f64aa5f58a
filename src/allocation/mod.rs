//! Ticket allocation: the multi-factor decision engine plus the adapter
//! seams that feed it normalized tickets and candidate groups.
//!
//! The engine itself is a pure, synchronous computation over one ticket and
//! one group snapshot; anything that touches the outside world (payload
//! normalization, group provisioning, assignment write-back) lives behind
//! the `adapters` traits and is sequenced by the service module.

pub mod adapters;
pub mod domain;
pub mod engine;
pub mod router;
pub mod service;
pub mod servicenow;

#[cfg(test)]
mod tests;

pub use adapters::{
    AdapterRegistry, AssignmentError, GroupProvisioningError, TicketHandler, TicketSource,
    TicketValidationError,
};
pub use domain::{
    AllocationDecision, AllocationTarget, AssignmentGroup, GeoPoint, GroupId, GroupMetrics,
    GroupScore, GroupStatus, RequesterLocation, ScoreDimension, ScoreVector, StandardTicket,
    TicketId, TicketSeverity,
};
pub use engine::{
    AllocationEngine, ConfidenceConfig, CurveConfig, EngineConfig, EngineConfigError,
    ExclusionReason, ScoreWeights,
};
pub use router::webhook_router;
pub use service::{AllocationServiceError, TicketAllocationService, WebhookOutcome};
