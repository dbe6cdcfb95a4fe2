//! Small axis helpers shared by both layout variants and the coordinator.

/// `f64::abs` without requiring `std`.
#[inline]
pub fn abs(v: f64) -> f64 {
    if v < 0.0 { -v } else { v }
}

/// Clamps `v` into `-limit..=limit`.
#[inline]
pub fn clamp_symmetric(v: f64, limit: f64) -> f64 {
    if v < -limit {
        -limit
    } else if v > limit {
        limit
    } else {
        v
    }
}

/// Visible length of the span `[start, start + len]` inside `[0, viewport]`.
///
/// `start` is in screen coordinates (scroll position already applied).
#[inline]
pub fn visible_extent(start: f64, len: f64, viewport: f64) -> f64 {
    let lo = start.max(0.0);
    let hi = (start + len).min(viewport);
    (hi - lo).max(0.0)
}
