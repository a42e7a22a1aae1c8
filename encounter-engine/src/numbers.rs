//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

use crate::constants::{PERCENT_DECIMAL_SCALE, PERCENT_FULL, PERCENT_SNAP_TOLERANCE};

/// Truncate a f64 toward zero and clamp it to the i64 range, returning 0 for non-finite values.
#[must_use]
pub fn trunc_f64_to_i64(value: f64) -> i64 {
    if !value.is_finite() {
        return 0;
    }
    let min = cast::<i64, f64>(i64::MIN).unwrap_or(f64::MIN);
    let max = cast::<i64, f64>(i64::MAX).unwrap_or(f64::MAX);
    let clamped = value.clamp(min, max).trunc();
    cast::<f64, i64>(clamped).unwrap_or(0)
}

/// Convert i64 to f64 while allowing precision loss in a single location.
#[must_use]
pub fn i64_to_f64(value: i64) -> f64 {
    cast::<i64, f64>(value).unwrap_or(0.0)
}

/// Convert a `0.0..=1.0` share into a percentage truncated (not rounded) to
/// four decimal places, e.g. `0.123_456_7` becomes `12.3456`.
///
/// Values within float noise of a whole step are snapped to it first, so an
/// exact `0.29` share reports `29.0` rather than `28.9999`.
#[must_use]
pub fn truncate_percentage(share: f64) -> f64 {
    let scaled = share * PERCENT_FULL * PERCENT_DECIMAL_SCALE;
    let nearest = scaled.round();
    let snapped = if (scaled - nearest).abs() < PERCENT_SNAP_TOLERANCE {
        nearest
    } else {
        scaled
    };
    i64_to_f64(trunc_f64_to_i64(snapped)) / PERCENT_DECIMAL_SCALE
}

/// Convert a whole-number percent into a probability.
#[must_use]
pub fn percent_to_probability(percent: u32) -> f64 {
    f64::from(percent) / PERCENT_FULL
}
