//! The seven per-dimension scorers. Each is total: malformed or missing
//! inputs map to a neutral 0.5 rather than failing, so a single bad metric
//! never vetoes an otherwise-eligible group. Every returned value is clamped
//! to [0, 1].

use crate::allocation::domain::{AssignmentGroup, GeoPoint, ScoreVector, StandardTicket};
use crate::allocation::engine::config::CurveConfig;

pub(crate) const NEUTRAL_SCORE: f64 = 0.5;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Cross-candidate context computed once per allocation. The bandwidth scorer
/// is relative to the roomiest eligible group.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ScoringContext {
    pub max_spare_capacity: u32,
}

impl ScoringContext {
    pub(crate) fn from_eligible(eligible: &[&AssignmentGroup]) -> Self {
        let max_spare_capacity = eligible
            .iter()
            .map(|group| group.spare_capacity())
            .max()
            .unwrap_or(0);
        Self { max_spare_capacity }
    }
}

/// Evaluates all seven dimensions for one (ticket, group) pair. The composite
/// slot is left at zero; the engine fills it from the configured weights.
pub(crate) fn score_group(
    ticket: &StandardTicket,
    group: &AssignmentGroup,
    context: ScoringContext,
    curves: &CurveConfig,
) -> ScoreVector {
    ScoreVector {
        availability: availability(group),
        bandwidth: bandwidth(group, context),
        velocity: velocity(group, curves),
        performance: performance(group),
        proximity: proximity(ticket, group, curves),
        cultural_fit: cultural_fit(ticket, group),
        timezone: timezone(ticket, group, curves),
        composite: 0.0,
    }
}

/// Fraction of capacity still free: `1 - load/cap`, clamped.
pub(crate) fn availability(group: &AssignmentGroup) -> f64 {
    if group.max_capacity == 0 {
        return 0.0;
    }
    clamp_unit(1.0 - group.current_load as f64 / group.max_capacity as f64)
}

/// Spare capacity relative to the roomiest eligible candidate, so the group
/// with the most headroom scores 1.0.
pub(crate) fn bandwidth(group: &AssignmentGroup, context: ScoringContext) -> f64 {
    if context.max_spare_capacity == 0 {
        return 0.0;
    }
    clamp_unit(group.spare_capacity() as f64 / context.max_spare_capacity as f64)
}

/// Historical throughput normalized against the configured reference rate.
pub(crate) fn velocity(group: &AssignmentGroup, curves: &CurveConfig) -> f64 {
    match group.metrics.weekly_throughput {
        Some(throughput) if throughput.is_finite() && throughput >= 0.0 => {
            clamp_unit(throughput / curves.reference_throughput)
        }
        _ => NEUTRAL_SCORE,
    }
}

/// Historical resolution-quality signal; the success rate is already a
/// fraction, so it only needs clamping.
pub(crate) fn performance(group: &AssignmentGroup) -> f64 {
    match group.metrics.success_rate {
        Some(rate) if rate.is_finite() && rate >= 0.0 => clamp_unit(rate),
        _ => NEUTRAL_SCORE,
    }
}

/// Linear falloff of great-circle distance: 0 km scores 1.0, anything at or
/// beyond the configured maximum scores 0.0. Missing coordinates on either
/// side are neutral.
pub(crate) fn proximity(
    ticket: &StandardTicket,
    group: &AssignmentGroup,
    curves: &CurveConfig,
) -> f64 {
    let (Some(from), Some(to)) = (
        ticket.requester_location.coordinates,
        group.location.coordinates,
    ) else {
        return NEUTRAL_SCORE;
    };
    let distance = haversine_km(from, to);
    if !distance.is_finite() {
        return NEUTRAL_SCORE;
    }
    clamp_unit(1.0 - distance / curves.max_distance_km)
}

/// Fraction of the ticket's required capability tags the group covers; a
/// ticket that requires nothing scores every group 1.0.
pub(crate) fn cultural_fit(ticket: &StandardTicket, group: &AssignmentGroup) -> f64 {
    let required = ticket.required_capabilities();
    if required.is_empty() {
        return 1.0;
    }
    let covered = required
        .iter()
        .filter(|tag| group.has_capability(tag))
        .count();
    clamp_unit(covered as f64 / required.len() as f64)
}

/// Linear falloff of absolute timezone-offset difference, shaped like the
/// proximity curve. Missing offsets on either side are neutral.
pub(crate) fn timezone(
    ticket: &StandardTicket,
    group: &AssignmentGroup,
    curves: &CurveConfig,
) -> f64 {
    let (Some(requester), Some(team)) = (
        ticket.requester_location.timezone_offset_hours,
        group.location.timezone_offset_hours,
    ) else {
        return NEUTRAL_SCORE;
    };
    if !requester.is_finite() || !team.is_finite() {
        return NEUTRAL_SCORE;
    }
    clamp_unit(1.0 - (requester - team).abs() / curves.max_offset_hours)
}

fn haversine_km(from: GeoPoint, to: GeoPoint) -> f64 {
    let lat_from = from.latitude.to_radians();
    let lat_to = to.latitude.to_radians();
    let d_lat = (to.latitude - from.latitude).to_radians();
    let d_lon = (to.longitude - from.longitude).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat_from.cos() * lat_to.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
}

pub(crate) fn clamp_unit(value: f64) -> f64 {
    if !value.is_finite() {
        return NEUTRAL_SCORE;
    }
    value.clamp(0.0, 1.0)
}
