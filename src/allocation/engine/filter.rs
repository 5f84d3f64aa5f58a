use serde::{Deserialize, Serialize};

use crate::allocation::domain::{AssignmentGroup, GroupId, GroupStatus, StandardTicket};

/// Why a candidate group was removed before scoring. Retained so the sentinel
/// rationale can name the exclusion reasons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionReason {
    Inactive,
    NoSpareCapacity,
    MissingCapability,
}

impl ExclusionReason {
    pub const fn label(self) -> &'static str {
        match self {
            ExclusionReason::Inactive => "inactive",
            ExclusionReason::NoSpareCapacity => "at capacity",
            ExclusionReason::MissingCapability => "lacking a required capability",
        }
    }
}

/// Result of the eligibility pass: surviving candidates in input order, plus
/// one exclusion record per dropped group.
#[derive(Debug)]
pub(crate) struct FilterOutcome<'a> {
    pub eligible: Vec<&'a AssignmentGroup>,
    pub rejected: Vec<(GroupId, ExclusionReason)>,
}

/// Removes structurally ineligible groups. Rules apply in order: inactive
/// status, no spare bandwidth, no capability overlap. The capability rule is
/// a no-op when the ticket requires no tags. Pure over its inputs.
pub(crate) fn eligible_candidates<'a>(
    ticket: &StandardTicket,
    groups: &'a [AssignmentGroup],
) -> FilterOutcome<'a> {
    let required = ticket.required_capabilities();
    let mut eligible = Vec::with_capacity(groups.len());
    let mut rejected = Vec::new();

    for group in groups {
        if group.status != GroupStatus::Active {
            rejected.push((group.id.clone(), ExclusionReason::Inactive));
            continue;
        }
        if group.max_capacity == 0 || group.current_load >= group.max_capacity {
            rejected.push((group.id.clone(), ExclusionReason::NoSpareCapacity));
            continue;
        }
        if !required.is_empty() && !required.iter().any(|tag| group.has_capability(tag)) {
            rejected.push((group.id.clone(), ExclusionReason::MissingCapability));
            continue;
        }
        eligible.push(group);
    }

    FilterOutcome { eligible, rejected }
}
