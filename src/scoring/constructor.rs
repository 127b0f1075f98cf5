use serde::{Deserialize, Serialize};

use super::config::ConstructorWeights;
use super::engine::round3;
use crate::error::ScoreError;

/// Inputs of a constructor's event score. All four are mandatory; they are
/// `Option` only so that an absent value is reported instead of guessed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ConstructorInputs {
    /// Mean CSI of the team's drivers at the event
    pub merit: Option<f64>,
    pub ops: Option<f64>,
    pub reliability: Option<f64>,
    pub development: Option<f64>,
}

/// Fixed-weight constructor event score, rounded to 3 decimals.
///
/// Unlike the driver scorer there is no renormalisation: a missing input
/// rejects the computation. Out-of-range inputs are not clamped.
pub fn constructor_points(
    inputs: &ConstructorInputs,
    weights: &ConstructorWeights,
) -> Result<f64, ScoreError> {
    let merit = inputs.merit.ok_or(ScoreError::MissingInput { field: "merit" })?;
    let ops = inputs.ops.ok_or(ScoreError::MissingInput { field: "ops" })?;
    let reliability = inputs
        .reliability
        .ok_or(ScoreError::MissingInput { field: "reliability" })?;
    let development = inputs
        .development
        .ok_or(ScoreError::MissingInput { field: "development" })?;

    Ok(round3(
        weights.merit * merit
            + weights.ops * ops
            + weights.reliability * reliability
            + weights.development * development,
    ))
}

/// Mean of a team's driver CSI values for one event, `None` for an empty team.
pub fn mean_csi(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}
