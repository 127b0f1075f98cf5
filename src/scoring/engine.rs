use serde::Serialize;

use super::components::{Component, ComponentSet};
use super::config::ScoringConfig;

/// Upper bound of a per-event score.
pub const MAX_EVENT_POINTS: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentContribution {
    pub component: Component,
    pub value: f64,
    pub weight: f64,
    /// Share of the normalised weight, in [0, 1] for non-negative weights
    pub share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointsBreakdown {
    pub contributions: Vec<ComponentContribution>,
    /// Sum of the weights of the supplied components only
    pub weight_sum: f64,
    /// Weighted score before the penalty, unrounded
    pub base: f64,
    /// Penalty actually subtracted
    pub penalty: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointsResult {
    /// Final event score in [0, 10], rounded to 3 decimals
    pub points: f64,
    pub breakdown: PointsBreakdown,
}

/// Round to 3 decimals. All published scores go through here so repeated
/// computation on identical input is bit-identical.
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Penalty magnitude: sign discarded, capped at `max_penalty`.
pub fn clamp_penalty(pf: f64, max_penalty: f64) -> f64 {
    pf.abs().min(max_penalty).max(0.0)
}

/// Score one participant at one event.
///
/// The weighted mean runs over the supplied components only, so a participant
/// with every supplied component at 10 scores 10 whichever components are
/// missing. The clamped penalty is then subtracted and the result clamped
/// to [0, 10].
pub fn calculate_points(
    components: &ComponentSet,
    pf: f64,
    config: &ScoringConfig,
) -> PointsResult {
    let mut contributions: Vec<ComponentContribution> = components
        .present()
        .map(|(component, value)| ComponentContribution {
            component,
            value,
            weight: config.weights.weight(component),
            share: 0.0,
        })
        .collect();
    let weight_sum: f64 = contributions.iter().map(|c| c.weight).sum();

    let base = if contributions.is_empty() || weight_sum <= 0.0 {
        0.0
    } else {
        // Σ value * share stays within the range of the inputs
        let mut base = 0.0;
        for c in &mut contributions {
            c.share = c.weight / weight_sum;
            base += c.value * c.share;
        }
        base
    };
    // Only infinite or NaN inputs get here
    let base = if base.is_finite() {
        base
    } else if base == f64::INFINITY {
        MAX_EVENT_POINTS
    } else {
        0.0
    };

    let penalty = clamp_penalty(pf, config.max_penalty);
    let points = round3((base - penalty).clamp(0.0, MAX_EVENT_POINTS));

    PointsResult {
        points,
        breakdown: PointsBreakdown {
            contributions,
            weight_sum,
            base,
            penalty,
        },
    }
}

/// Context-adjusted merit index: plain mean of the supplied components
/// divided by the (floored) car strength. Unbounded above.
pub fn calculate_csi(components: &ComponentSet, car_strength: f64, config: &ScoringConfig) -> f64 {
    let base = components.mean().unwrap_or(0.0);
    round3(base / car_strength.max(config.car_strength_floor))
}
