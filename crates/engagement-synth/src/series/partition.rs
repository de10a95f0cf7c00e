use super::normalize::is_normalized;
use super::weights::WeightVector;
use crate::error::{SynthError, SynthResult};

// Largest total whose per-day shares are still exact integers in an f64.
pub const MAX_EXACT_TOTAL: u64 = 1 << 53;

/// Splits `total` across the days of `weights`, flooring every share but the
/// last; the calendar-last day takes whatever is left so the allocations sum
/// to `total` exactly.
pub fn partition(weights: &WeightVector, total: u64) -> SynthResult<Vec<u64>> {
    if !is_normalized(weights) {
        return Err(SynthError::Precondition(format!(
            "partition requires normalized weights (sum={})",
            weights.sum()
        )));
    }
    if total > MAX_EXACT_TOTAL {
        return Err(SynthError::Precondition(format!(
            "total {total} exceeds the largest exactly divisible total {MAX_EXACT_TOTAL}"
        )));
    }

    let last_day = weights.len() - 1;
    let mut remaining = total;
    let mut allocations = Vec::with_capacity(weights.len());
    for (day_index, weight) in weights.as_slice().iter().enumerate() {
        if day_index == last_day {
            allocations.push(remaining);
            break;
        }
        let share = ((weight * total as f64).floor() as u64).min(remaining);
        remaining -= share;
        allocations.push(share);
    }

    Ok(allocations)
}
