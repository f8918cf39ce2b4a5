//! Numeric helpers shared by the WRES verification crates.
//!
//! Every place where a score can degenerate (0/0, an empty group, a ratio against a
//! zero reference) routes through [`finite_or_missing`], so the missing-value policy
//! lives in one place.

/// The missing-value sentinel. It is IEEE NaN and is kept in results, never dropped.
pub const MISSING: f64 = f64::NAN;

/// Returns `true` when `value` is the missing sentinel (or any other non-finite value).
pub fn is_missing(value: f64) -> bool {
    !value.is_finite()
}

/// Identity for finite input, [`MISSING`] otherwise.
pub fn finite_or_missing(value: f64) -> f64 {
    if value.is_finite() { value } else { MISSING }
}

/// `numerator / denominator` under the finite-or-missing policy.
pub fn ratio(numerator: f64, denominator: f64) -> f64 {
    finite_or_missing(numerator / denominator)
}

/// Skill of a score whose perfect value is zero: `1 - main / reference`.
pub fn skill(main: f64, reference: f64) -> f64 {
    finite_or_missing(1.0 - main / reference)
}

/// Arithmetic mean of a slice. Returns [`MISSING`] if empty.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return MISSING;
    }
    let sum: f64 = data.iter().sum();
    finite_or_missing(sum / data.len() as f64)
}

/// Copies the finite values of `data` into a new vector sorted ascending.
pub fn sorted_finite(data: &[f64]) -> Vec<f64> {
    let mut sorted: Vec<f64> = data.iter().copied().filter(|v| v.is_finite()).collect();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Equality to 8 decimal places for finite values; bitwise-style comparison otherwise,
/// so two missing values compare equal.
pub fn doubles_equal(a: f64, b: f64) -> bool {
    if a.is_finite() && b.is_finite() {
        (a - b).abs() < 1e-8
    } else {
        (a.is_nan() && b.is_nan()) || a == b
    }
}
