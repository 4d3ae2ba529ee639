//! Quadrant hypothesis checker.
//!
//! Tests whether a storm's heading points into a compass quadrant that holds
//! its maximum wind-radius extent. The heading sector is offset 45 to 90
//! degrees clockwise of the bearing, which selects one or two 90-degree
//! quadrant buckets.

use crate::constants::{QUADRANT_SPAN_DEGREES, RADIUS_NO_EXTENT, STATIONARY_BEARING};
use crate::models::{HypothesisOutcome, LegOutcome, Quadrant, RadiusReading, SkipReason, WindRadii};
use std::collections::BTreeSet;

/// Bring an angle below 360 by subtracting one full turn when needed.
///
/// Inputs are bearing + offset with bearing in [0, 360) and offset at most
/// 90, so a single wrap is always enough.
pub fn norm(angle: f64) -> f64 {
    if angle >= 360.0 { angle - 360.0 } else { angle }
}

/// The `(low, high)` quadrant buckets covered by the heading sector
pub fn heading_buckets(bearing: f64) -> (usize, usize) {
    let low = (norm(bearing + 45.0) / QUADRANT_SPAN_DEGREES).floor() as usize;
    let high = (norm(bearing + 90.0) / QUADRANT_SPAN_DEGREES).floor() as usize;
    (low, high)
}

/// Quadrants named by a set of wind-radii positions
pub fn quadrants_of(max_indices: &[usize]) -> BTreeSet<Quadrant> {
    max_indices
        .iter()
        .map(|&i| Quadrant::from_radius_index(i))
        .collect()
}

/// Check the heading against the quadrants holding the maximum radius
pub fn check(max_indices: &[usize], bearing: f64) -> HypothesisOutcome {
    let quadrants = quadrants_of(max_indices);
    let (low, high) = heading_buckets(bearing);

    let hit = [low, high]
        .into_iter()
        .filter_map(Quadrant::from_bucket)
        .any(|q| quadrants.contains(&q));

    if hit {
        HypothesisOutcome::Confirmed
    } else {
        HypothesisOutcome::Inapplicable
    }
}

/// Evaluate one leg from the radii of the fix it departs and the leg
/// bearing, skipping legs that carry no usable signal.
pub fn evaluate_leg(radii: &WindRadii, bearing: f64) -> LegOutcome {
    match radii.max_reading() {
        RadiusReading::NoData => LegOutcome::Skipped(SkipReason::NoRadiiData),
        RadiusReading::Measured(RADIUS_NO_EXTENT) => LegOutcome::Skipped(SkipReason::NoWindExtent),
        _ if bearing == STATIONARY_BEARING => LegOutcome::Skipped(SkipReason::ZeroBearing),
        _ => LegOutcome::Evaluated(check(&radii.max_indices(), bearing)),
    }
}
