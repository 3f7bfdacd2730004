//! 2D vector helpers on top of `glam::Vec2`
//!
//! Addition, subtraction, scaling and dot products come straight from `Vec2`.
//! This module only pins down the policies the simulation relies on.

use glam::Vec2;

/// Unit vector pointing along `v`.
///
/// A zero-length (or non-finite) vector has no direction; it normalizes to
/// `Vec2::ZERO` instead of producing NaNs. Callers treat a zero result as
/// "no direction" (e.g. a shot with no aim does nothing).
#[inline]
pub fn direction(v: Vec2) -> Vec2 {
    v.normalize_or_zero()
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n, with `normal` of unit length.
#[inline]
pub fn reflect(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Linear interpolation between two points
#[inline]
pub fn lerp(a: Vec2, b: Vec2, t: f32) -> Vec2 {
    a + (b - a) * t
}
