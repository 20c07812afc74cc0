//! Shared numeric normalization policy.
//!
//! Every extractor and composite step funnels raw values through these
//! helpers so the edge cases (all-equal series, zero denominators,
//! non-finite intermediates) are handled in exactly one place.

use crate::types::NicheScores;

/// Midpoint returned for an all-equal series. Ties carry no ordering
/// information, so they map to the middle of the range instead of
/// collapsing to 0.
const TIE_VALUE: f64 = 0.5;

/// Linearly rescales `scores` to [0, 1] in place.
///
/// An all-equal series (including a single element) maps every value to
/// 0.5 — there is no spread to measure, and dividing by zero or pinning
/// ties to 0 would both misrepresent the data.
pub fn min_max(scores: &mut NicheScores) {
    let Some((min, max)) = bounds(scores) else {
        return;
    };

    if (max - min).abs() < f64::EPSILON {
        for value in scores.values_mut() {
            *value = TIE_VALUE;
        }
        return;
    }

    for value in scores.values_mut() {
        *value = (*value - min) / (max - min);
    }
}

/// The "stabilized" rescale used for the hype score: min-max into [0, 1],
/// then map onto [0.2, 1.0] so tightly-clustered inputs do not collapse
/// toward zero.
pub fn stabilized(scores: &mut NicheScores) {
    min_max(scores);
    for value in scores.values_mut() {
        *value = 0.8f64.mul_add(*value, 0.2);
    }
}

/// Coerces a non-finite per-row result (division by zero upstream) to 0
/// so it can never propagate as NaN/Inf into an average.
#[must_use]
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Log-scaled ratio `log1p(value) / log1p(max)`, the saturation-resistant
/// normalization for raw volume counts. Callers guarantee `max > 0`.
#[must_use]
pub fn log_scaled(value: f64, max: f64) -> f64 {
    finite_or_zero(value.ln_1p() / max.ln_1p())
}

/// Mean of a non-empty slice; 0.0 for an empty one.
#[must_use]
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let denom = values.len() as f64;
    values.iter().sum::<f64>() / denom
}

fn bounds(scores: &NicheScores) -> Option<(f64, f64)> {
    let mut iter = scores.values();
    let first = *iter.next()?;
    let mut min = first;
    let mut max = first;
    for &value in iter {
        min = min.min(value);
        max = max.max(value);
    }
    Some((min, max))
}
