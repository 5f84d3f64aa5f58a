use crate::allocation::domain::GroupScore;
use crate::allocation::engine::config::ConfidenceConfig;

/// Derives the confidence scalar from the final ranking. The base is the
/// winner's composite; a runner-up within the margin threshold dampens it
/// smoothly down to `floor * composite`, so a close call reports less
/// certainty than its raw score suggests.
pub(crate) fn estimate(ranking: &[GroupScore], config: &ConfidenceConfig) -> f64 {
    let Some(winner) = ranking.first() else {
        return 0.0;
    };
    let composite = winner.scores.composite;

    let Some(runner_up) = ranking.get(1) else {
        return composite;
    };

    let margin = (composite - runner_up.scores.composite).max(0.0);
    let damping = (margin / config.margin_threshold + config.floor).min(1.0);
    (composite * damping).clamp(0.0, 1.0)
}
