// ===== Float tolerance helpers =====
// Used by the differentiation rules to drop trivial terms without being
// fooled by values like `1.0/3.0 * 3.0 != 1.0`.

/// Default tolerance for floating-point comparisons
pub(crate) const FLOAT_TOLERANCE: f64 = 1e-10;

/// Check if a float is approximately zero (within tolerance)
#[inline]
pub(crate) fn is_zero(n: f64) -> bool {
    n.abs() < FLOAT_TOLERANCE
}

/// Check if a float is approximately one (within tolerance)
#[inline]
pub(crate) fn is_one(n: f64) -> bool {
    (n - 1.0).abs() < FLOAT_TOLERANCE
}
