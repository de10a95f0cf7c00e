use super::weights::WeightVector;
use crate::error::{SynthError, SynthResult};

// Per-entry allowance; summing n entries accumulates up to n rounding steps.
pub const NORMALIZED_TOLERANCE: f64 = 1e-12;

pub fn normalize(weights: &WeightVector) -> SynthResult<WeightVector> {
    if weights.is_empty() {
        return Err(SynthError::Precondition(
            "cannot normalize an empty weight vector".to_string(),
        ));
    }
    if let Some((day_index, weight)) = weights
        .as_slice()
        .iter()
        .enumerate()
        .find(|(_, w)| !w.is_finite() || **w < 0.0)
    {
        return Err(SynthError::Precondition(format!(
            "weight for day {day_index} must be finite and non-negative (got {weight})"
        )));
    }

    let total = weights.sum();
    if total <= 0.0 || !total.is_finite() {
        return Err(SynthError::Precondition(format!(
            "weight vector sum must be positive (got {total})"
        )));
    }

    Ok(WeightVector::new(
        weights.as_slice().iter().map(|w| w / total).collect(),
    ))
}

pub fn is_normalized(weights: &WeightVector) -> bool {
    let tolerance = NORMALIZED_TOLERANCE * weights.len().max(1_000) as f64;
    !weights.is_empty() && (weights.sum() - 1.0).abs() <= tolerance
}
