//! Circle collision detection and response
//!
//! Every collidable thing in the playfield is a circle. Pegs, the launcher
//! and the side walls never move in response to a hit, so a single routine
//! handles every "moving circle against static body" pair: find the contact,
//! reflect the moving velocity about the contact normal, apply friction, and
//! nudge the moving body out along the normal so it cannot stick.

use glam::Vec2;

use super::vector::{direction, lerp, reflect};

/// A circle in screen space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    #[inline]
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }
}

/// Contact between a moving circle and a static one
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Radius-weighted point between the two centers
    pub point: Vec2,
    /// Unit normal pointing out of the static body, toward the moving one
    pub normal: Vec2,
    /// Overlap depth along the normal
    pub penetration: f32,
}

/// Overlap test: `distance < ra + rb`. Touching circles do not overlap.
#[inline]
pub fn overlaps(a: Circle, b: Circle) -> bool {
    a.center.distance(b.center) < a.radius + b.radius
}

/// Compute the contact between `moving` and `fixed`, or `None` if they are apart.
pub fn contact(moving: Circle, fixed: Circle) -> Option<Contact> {
    if !overlaps(moving, fixed) {
        return None;
    }

    let radius_sum = moving.radius + fixed.radius;
    let t = if radius_sum > 0.0 {
        moving.radius / radius_sum
    } else {
        0.5
    };
    let point = lerp(moving.center, fixed.center, t);

    let mut normal = direction(point - fixed.center);
    if normal == Vec2::ZERO {
        // Concentric circles: push straight up, away from the launcher side
        normal = Vec2::NEG_Y;
    }

    Some(Contact {
        point,
        normal,
        penetration: radius_sum - moving.center.distance(fixed.center),
    })
}

/// Bounce a moving circle off a static one
///
/// On overlap, reflects `vel` about the contact normal (only while the body is
/// still approaching), scales it by `friction`, and pushes `pos` by `nudge`
/// along the normal. Returns the contact so callers can run hit effects.
pub fn resolve_against_static(
    pos: &mut Vec2,
    vel: &mut Vec2,
    radius: f32,
    fixed: Circle,
    friction: f32,
    nudge: f32,
) -> Option<Contact> {
    let hit = contact(Circle::new(*pos, radius), fixed)?;

    if vel.dot(hit.normal) < 0.0 {
        *vel = reflect(*vel, hit.normal) * friction;
    }
    *pos += hit.normal * nudge;

    Some(hit)
}

/// Keep a circle between x = 0 and x = `width`
///
/// Returns true if either wall was hit this tick.
pub fn bounce_off_side_walls(
    pos: &mut Vec2,
    vel: &mut Vec2,
    radius: f32,
    width: f32,
    friction: f32,
) -> bool {
    let (normal, limit) = if pos.x - radius < 0.0 {
        (Vec2::X, radius)
    } else if pos.x + radius > width {
        (Vec2::NEG_X, width - radius)
    } else {
        return false;
    };

    if vel.dot(normal) < 0.0 {
        *vel = reflect(*vel, normal) * friction;
    }
    pos.x = limit;
    true
}
