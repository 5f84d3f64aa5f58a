use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for normalized tickets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TicketId(pub String);

/// Identifier wrapper for candidate assignment groups.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupId(pub String);

/// Severity scale shared by ticket priority, urgency, and impact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl TicketSeverity {
    pub const fn label(self) -> &'static str {
        match self {
            TicketSeverity::Low => "low",
            TicketSeverity::Medium => "medium",
            TicketSeverity::High => "high",
            TicketSeverity::Critical => "critical",
        }
    }

    /// Lenient parse used by source adapters; unknown strings fall back to low.
    pub fn parse_lenient(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "critical" | "1" | "p1" => TicketSeverity::Critical,
            "high" | "2" | "p2" => TicketSeverity::High,
            "medium" | "moderate" | "3" | "p3" => TicketSeverity::Medium,
            _ => TicketSeverity::Low,
        }
    }
}

/// Geographic point attached to requester and group locations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// Structured location shared by tickets and groups. Every field is optional;
/// scorers treat missing pieces as neutral rather than disqualifying.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RequesterLocation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone_offset_hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<GeoPoint>,
}

/// Canonical ticket representation produced by source adapters. Immutable for
/// the duration of one allocation; the engine never mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardTicket {
    pub id: TicketId,
    pub number: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub priority: TicketSeverity,
    pub urgency: TicketSeverity,
    pub impact: TicketSeverity,
    pub source: String,
    pub requester_location: RequesterLocation,
    #[serde(default)]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl StandardTicket {
    /// Capability tags the ticket asks of a group: its category plus any
    /// explicitly required skills, lowercased and deduplicated. An empty set
    /// means the ticket places no capability constraint.
    pub fn required_capabilities(&self) -> BTreeSet<String> {
        let mut tags = BTreeSet::new();
        let category = self.category.trim().to_ascii_lowercase();
        if !category.is_empty() {
            tags.insert(category);
        }
        for skill in &self.required_skills {
            let skill = skill.trim().to_ascii_lowercase();
            if !skill.is_empty() {
                tags.insert(skill);
            }
        }
        tags
    }
}

/// Operational status of a candidate group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupStatus {
    Active,
    Inactive,
}

/// Historical performance signals supplied with each group snapshot. All
/// fields are optional; scorers fall back to a neutral score when absent.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GroupMetrics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_resolution_hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekly_throughput: Option<f64>,
}

/// Candidate support team snapshot supplied fresh per allocation call. The
/// engine treats it as read-only; there is no caching across calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentGroup {
    pub id: GroupId,
    pub name: String,
    #[serde(default)]
    pub location: RequesterLocation,
    #[serde(default)]
    pub capabilities: BTreeSet<String>,
    pub status: GroupStatus,
    pub max_capacity: u32,
    pub current_load: u32,
    #[serde(default)]
    pub metrics: GroupMetrics,
}

impl AssignmentGroup {
    pub fn spare_capacity(&self) -> u32 {
        self.max_capacity.saturating_sub(self.current_load)
    }

    pub fn has_capability(&self, tag: &str) -> bool {
        self.capabilities
            .iter()
            .any(|capability| capability.eq_ignore_ascii_case(tag))
    }
}

/// The seven independent fitness dimensions evaluated per (ticket, group) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreDimension {
    Availability,
    Bandwidth,
    Velocity,
    Performance,
    Proximity,
    CulturalFit,
    Timezone,
}

impl ScoreDimension {
    pub const ALL: [ScoreDimension; 7] = [
        ScoreDimension::Availability,
        ScoreDimension::Bandwidth,
        ScoreDimension::Velocity,
        ScoreDimension::Performance,
        ScoreDimension::Proximity,
        ScoreDimension::CulturalFit,
        ScoreDimension::Timezone,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            ScoreDimension::Availability => "availability",
            ScoreDimension::Bandwidth => "bandwidth",
            ScoreDimension::Velocity => "velocity",
            ScoreDimension::Performance => "performance",
            ScoreDimension::Proximity => "proximity",
            ScoreDimension::CulturalFit => "cultural fit",
            ScoreDimension::Timezone => "timezone alignment",
        }
    }
}

/// Per-dimension fitness values for one group against one ticket, plus the
/// derived weighted composite. Every value lies in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreVector {
    pub availability: f64,
    pub bandwidth: f64,
    pub velocity: f64,
    pub performance: f64,
    pub proximity: f64,
    pub cultural_fit: f64,
    pub timezone: f64,
    pub composite: f64,
}

impl ScoreVector {
    pub fn get(&self, dimension: ScoreDimension) -> f64 {
        match dimension {
            ScoreDimension::Availability => self.availability,
            ScoreDimension::Bandwidth => self.bandwidth,
            ScoreDimension::Velocity => self.velocity,
            ScoreDimension::Performance => self.performance,
            ScoreDimension::Proximity => self.proximity,
            ScoreDimension::CulturalFit => self.cultural_fit,
            ScoreDimension::Timezone => self.timezone,
        }
    }

    /// Dimension entries in declaration order, excluding the composite.
    pub fn entries(&self) -> [(ScoreDimension, f64); 7] {
        let mut out = [(ScoreDimension::Availability, 0.0); 7];
        for (slot, dimension) in out.iter_mut().zip(ScoreDimension::ALL) {
            *slot = (dimension, self.get(dimension));
        }
        out
    }
}

/// One ranked entry in a decision: the group reference and its full scoring
/// detail, retained for audit and observability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupScore {
    pub group_id: GroupId,
    pub group_name: String,
    pub current_load: u32,
    pub scores: ScoreVector,
}

/// Chosen group, or the explicit sentinel when no candidate survived filtering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AllocationTarget {
    Group { id: GroupId, name: String },
    NoEligibleGroup,
}

impl AllocationTarget {
    pub fn group_id(&self) -> Option<&GroupId> {
        match self {
            AllocationTarget::Group { id, .. } => Some(id),
            AllocationTarget::NoEligibleGroup => None,
        }
    }
}

/// The engine's sole output artifact: winner (or sentinel), full ranking,
/// rationale, and confidence. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationDecision {
    pub ticket_id: TicketId,
    pub decision_timestamp: DateTime<Utc>,
    pub target: AllocationTarget,
    pub ranking: Vec<GroupScore>,
    pub rationale: String,
    pub confidence: f64,
}

impl AllocationDecision {
    pub fn winner(&self) -> Option<&GroupScore> {
        self.target.group_id().and_then(|id| {
            self.ranking.iter().find(|entry| &entry.group_id == id)
        })
    }
}
