use crate::allocation::domain::{GroupId, GroupScore, ScoreDimension};
use crate::allocation::engine::config::ScoreWeights;
use crate::allocation::engine::filter::ExclusionReason;

/// Renders the short templated explanation for a winning group, naming the
/// one or two dimensions contributing most to the composite (weight x score).
/// Deterministic for identical inputs: contribution ties resolve in dimension
/// declaration order.
pub(crate) fn explain_winner(winner: &GroupScore, weights: &ScoreWeights) -> String {
    let mut contributions: Vec<(ScoreDimension, f64)> = winner
        .scores
        .entries()
        .iter()
        .map(|(dimension, score)| (*dimension, weights.get(*dimension) * score))
        .collect();
    contributions.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    let leading: Vec<&'static str> = contributions
        .iter()
        .take(2)
        .filter(|(_, contribution)| *contribution > 0.0)
        .map(|(dimension, _)| dimension.label())
        .collect();

    match leading.as_slice() {
        [first, second] => format!(
            "Allocated to '{}' on strength of {} and {} (composite {:.2})",
            winner.group_name, first, second, winner.scores.composite
        ),
        [only] => format!(
            "Allocated to '{}' on strength of {} (composite {:.2})",
            winner.group_name, only, winner.scores.composite
        ),
        _ => format!(
            "Allocated to '{}' (composite {:.2})",
            winner.group_name, winner.scores.composite
        ),
    }
}

/// Explains the sentinel outcome by counting exclusion reasons, rendered in a
/// fixed reason order so audits of identical inputs read identically.
pub(crate) fn explain_no_candidates(rejected: &[(GroupId, ExclusionReason)]) -> String {
    if rejected.is_empty() {
        return "No eligible group: no candidate groups were supplied".to_string();
    }

    const REASON_ORDER: [ExclusionReason; 3] = [
        ExclusionReason::Inactive,
        ExclusionReason::NoSpareCapacity,
        ExclusionReason::MissingCapability,
    ];

    let parts: Vec<String> = REASON_ORDER
        .iter()
        .filter_map(|reason| {
            let count = rejected.iter().filter(|(_, r)| r == reason).count();
            (count > 0).then(|| format!("{count} {}", reason.label()))
        })
        .collect();

    format!("No eligible group: {}", parts.join(", "))
}
