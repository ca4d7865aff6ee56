//! Rounding and percentage helpers used by the reducers.
//!
//! Every hour and percent value reported by a metric goes through
//! [`round_tenth`] so all outputs carry one decimal place.

/// Rounds to one decimal place, halves to even.
///
/// The tie is judged on the exact binary value, so `0.25` rounds to `0.2`
/// while `0.35` (stored just below the tie) rounds to `0.3`.
pub fn round_tenth(value: f64) -> f64 {
    let floor = (value * 10.0).floor();
    // Fused so the sign of the residual is exact even when `value * 10`
    // would have rounded onto a tie.
    let residual = value.mul_add(10.0, -(floor + 0.5));
    let tenths = if residual > 0.0 {
        floor + 1.0
    } else if residual < 0.0 {
        floor
    } else {
        (floor + 0.5).round_ties_even()
    };
    tenths / 10.0
}

/// Converts minutes to hours, rounded to one decimal place.
#[allow(clippy::cast_precision_loss)]
pub fn minutes_to_hours(minutes: u64) -> f64 {
    round_tenth(minutes as f64 / 60.0)
}

/// Completion percentage of `unlocked` out of `total`.
///
/// Returns `None` when `total` is zero. The result is clamped to `[0, 100]`.
pub fn completion_percent(unlocked: u32, total: u32) -> Option<f64> {
    if total == 0 {
        return None;
    }
    let ratio = f64::from(unlocked) / f64::from(total) * 100.0;
    Some(round_tenth(ratio.clamp(0.0, 100.0)))
}

/// Arithmetic mean rounded to one decimal, or `0.0` for an empty slice.
#[allow(clippy::cast_precision_loss)]
pub fn mean_rounded(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    round_tenth(values.iter().sum::<f64>() / values.len() as f64)
}
