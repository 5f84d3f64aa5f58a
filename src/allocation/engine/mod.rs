pub(crate) mod confidence;
pub(crate) mod config;
pub(crate) mod filter;
pub(crate) mod rationale;
pub(crate) mod scorers;
pub(crate) mod selection;

pub use config::{ConfidenceConfig, CurveConfig, EngineConfig, EngineConfigError, ScoreWeights};
pub use filter::ExclusionReason;

use chrono::Utc;

use crate::allocation::domain::{
    AllocationDecision, AllocationTarget, AssignmentGroup, GroupScore, ScoreDimension,
    StandardTicket,
};
use scorers::ScoringContext;

/// Stateless decision engine turning a normalized ticket and a candidate
/// group snapshot into a ranked allocation with rationale and confidence.
///
/// Configuration is validated once at construction and read-only afterwards,
/// so concurrent `allocate` calls for different tickets are independent.
pub struct AllocationEngine {
    config: EngineConfig,
}

impl AllocationEngine {
    /// Builds an engine, failing fast on invalid weights or curve parameters.
    /// This is the only failure point; per-call allocation is total.
    pub fn new(config: EngineConfig) -> Result<Self, EngineConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Read access to the immutable configuration for introspection.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The single entry point: filter, score, rank, explain. The "no eligible
    /// group" path is a normal outcome, not an error.
    pub fn allocate(
        &self,
        ticket: &StandardTicket,
        groups: &[AssignmentGroup],
    ) -> AllocationDecision {
        let outcome = filter::eligible_candidates(ticket, groups);

        if outcome.eligible.is_empty() {
            return AllocationDecision {
                ticket_id: ticket.id.clone(),
                decision_timestamp: Utc::now(),
                target: AllocationTarget::NoEligibleGroup,
                ranking: Vec::new(),
                rationale: rationale::explain_no_candidates(&outcome.rejected),
                confidence: 0.0,
            };
        }

        let context = ScoringContext::from_eligible(&outcome.eligible);
        let scored: Vec<GroupScore> = outcome
            .eligible
            .iter()
            .map(|group| {
                let mut scores = scorers::score_group(ticket, group, context, &self.config.curves);
                scores.composite = self.composite(&scores);
                GroupScore {
                    group_id: group.id.clone(),
                    group_name: group.name.clone(),
                    current_load: group.current_load,
                    scores,
                }
            })
            .collect();

        let ranking = selection::rank(scored);
        let winner = &ranking[0];

        let rationale = rationale::explain_winner(winner, &self.config.weights);
        let confidence = confidence::estimate(&ranking, &self.config.confidence);
        let target = AllocationTarget::Group {
            id: winner.group_id.clone(),
            name: winner.group_name.clone(),
        };

        AllocationDecision {
            ticket_id: ticket.id.clone(),
            decision_timestamp: Utc::now(),
            target,
            ranking,
            rationale,
            confidence,
        }
    }

    fn composite(&self, scores: &crate::allocation::domain::ScoreVector) -> f64 {
        ScoreDimension::ALL
            .iter()
            .map(|dimension| self.config.weights.get(*dimension) * scores.get(*dimension))
            .sum::<f64>()
            .clamp(0.0, 1.0)
    }
}
