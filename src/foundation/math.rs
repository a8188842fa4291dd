/// Clamp to `[0, 1]`; NaN maps to 0.
pub(crate) fn clamp01(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

pub(crate) fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Position of `v` inside `[a, b]` as a clamped fraction.
///
/// A degenerate window behaves like a step at `b`.
pub(crate) fn inverse_lerp_clamped(a: f64, b: f64, v: f64) -> f64 {
    if b <= a {
        return if v >= b { 1.0 } else { 0.0 };
    }
    clamp01((v - a) / (b - a))
}

pub(crate) fn is_finite_non_negative(v: f64) -> bool {
    v.is_finite() && v >= 0.0
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
