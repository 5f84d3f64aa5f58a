use std::cmp::Ordering;

use crate::allocation::domain::GroupScore;

/// Two composites within this distance are treated as tied and fall through
/// to the deterministic tie-break chain.
const COMPOSITE_TOLERANCE: f64 = 1e-9;

/// Sorts scored candidates into their final ranking: composite descending,
/// ties broken by higher availability, then lower absolute load, then
/// lexicographically smaller group id. The chain ends in a total order so
/// identical inputs always rank identically.
pub(crate) fn rank(mut candidates: Vec<GroupScore>) -> Vec<GroupScore> {
    candidates.sort_by(compare);
    candidates
}

fn compare(a: &GroupScore, b: &GroupScore) -> Ordering {
    match descending(a.scores.composite, b.scores.composite) {
        Ordering::Equal => {}
        unequal => return unequal,
    }
    match descending(a.scores.availability, b.scores.availability) {
        Ordering::Equal => {}
        unequal => return unequal,
    }
    match a.current_load.cmp(&b.current_load) {
        Ordering::Equal => {}
        unequal => return unequal,
    }
    a.group_id.cmp(&b.group_id)
}

fn descending(a: f64, b: f64) -> Ordering {
    if (a - b).abs() <= COMPOSITE_TOLERANCE {
        Ordering::Equal
    } else if a > b {
        Ordering::Less
    } else {
        Ordering::Greater
    }
}
