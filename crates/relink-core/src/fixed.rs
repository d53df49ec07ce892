//! Fixed-point scaling of landscape indices.
//!
//! Landscape indices are real-valued but compared as integers: a value is
//! multiplied by `10^precision` and rounded half-up. Every filter in the
//! workspace scales through the same helper so that index comparisons stay
//! consistent across filters.

use crate::error::BuildError;

/// Largest supported precision.
///
/// `10^9` keeps scaled values of realistic indices (landscape areas up to
/// hundreds of millions of cells) well inside `i64`.
pub const MAX_PRECISION: u32 = 9;

/// Reject a precision outside `[0, MAX_PRECISION]`.
pub fn check_precision(precision: u32) -> Result<(), BuildError> {
    if precision > MAX_PRECISION {
        return Err(BuildError::PrecisionOutOfRange {
            precision,
            max: MAX_PRECISION,
        });
    }
    Ok(())
}

/// Scale `value` by `10^precision`, rounding half-up.
///
/// Half-up matches the reference behavior for index comparison and must be
/// used for every scaled index in the workspace.
pub fn scaled(value: f64, precision: u32) -> i64 {
    (value * 10f64.powi(precision as i32) + 0.5).floor() as i64
}

/// Inverse of [`scaled`], for reporting.
pub fn unscaled(value: i64, precision: u32) -> f64 {
    value as f64 / 10f64.powi(precision as i32)
}
