//! Scalar helpers shared by the passes.
//!
//! The clamps never panic on inverted bounds: a value below `min` resolves to `min`
//! before the upper bound is consulted, which several placement formulas rely on when
//! a map is only just large enough for a district.

pub(crate) fn clamp_i32(value: i32, min: i32, max: i32) -> i32 {
    if value < min {
        return min;
    }
    if value > max {
        return max;
    }
    value
}

pub(crate) fn clamp_f64(value: f64, min: f64, max: f64) -> f64 {
    if value < min {
        return min;
    }
    if value > max {
        return max;
    }
    value
}

pub(crate) fn lerp(start: f64, end: f64, t: f64) -> f64 {
    start + (end - start) * t
}

pub(crate) fn smoothstep(value: f64) -> f64 {
    let clamped = clamp_f64(value, 0.0, 1.0);
    clamped * clamped * (3.0 - 2.0 * clamped)
}

/// Rounds half-way cases toward positive infinity.
pub(crate) fn round_half_up(value: f64) -> i32 {
    (value + 0.5).floor() as i32
}
