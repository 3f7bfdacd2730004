//! Countdown-driven shrink animation
//!
//! Pegs shrink away once struck and balls shrink away once a net catches
//! them. Both use the same state machine:
//!
//! ```text
//! None ──start_shrink──▶ Shrinking ──remaining <= 0──▶ Finished
//! ```
//!
//! `Finished` is terminal; the owning entity retires when it is reached.

/// Relative slack when checking whether a countdown has run out, so a
/// duration split into whole fixed steps ends on the last step despite
/// f32 rounding.
pub const TIMER_EPSILON: f32 = 1e-4;

/// True once `remaining` of a `total` second countdown is used up
#[inline]
pub fn countdown_elapsed(remaining: f32, total: f32) -> bool {
    remaining <= total * TIMER_EPSILON
}

use serde::{Deserialize, Serialize};

/// Animation currently applied to an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AnimationKind {
    #[default]
    None,
    Shrinking,
    Finished,
}

/// Result of advancing an animation by one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimationStep {
    /// Nothing is animating
    Idle,
    /// Still shrinking; radius should be `base_radius * scale`
    Running { scale: f32 },
    /// Reached zero this tick. Reported exactly once.
    Finished,
}

/// Animation descriptor owned by a ball or peg
///
/// `remaining <= total_duration` always holds. When `kind` is `None` the
/// durations carry no meaning.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AnimationState {
    pub kind: AnimationKind,
    pub total_duration: f32,
    pub remaining: f32,
}

impl AnimationState {
    /// Enter `Shrinking`. Returns false if an animation already ran or is running.
    pub fn start_shrink(&mut self, duration: f32) -> bool {
        if self.kind != AnimationKind::None {
            return false;
        }
        let duration = duration.max(0.0);
        self.kind = AnimationKind::Shrinking;
        self.total_duration = duration;
        self.remaining = duration;
        true
    }

    #[inline]
    pub fn is_shrinking(&self) -> bool {
        self.kind == AnimationKind::Shrinking
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.kind == AnimationKind::Finished
    }

    /// Fraction of the base radius still visible (1.0 when not animating)
    pub fn scale(&self) -> f32 {
        match self.kind {
            AnimationKind::None => 1.0,
            AnimationKind::Finished => 0.0,
            AnimationKind::Shrinking => {
                if self.total_duration <= 0.0 {
                    0.0
                } else {
                    (self.remaining / self.total_duration).clamp(0.0, 1.0)
                }
            }
        }
    }

    /// Count down by `dt`
    pub fn advance(&mut self, dt: f32) -> AnimationStep {
        match self.kind {
            AnimationKind::None | AnimationKind::Finished => AnimationStep::Idle,
            AnimationKind::Shrinking => {
                self.remaining -= dt;
                if countdown_elapsed(self.remaining, self.total_duration) {
                    self.remaining = 0.0;
                    self.kind = AnimationKind::Finished;
                    AnimationStep::Finished
                } else {
                    AnimationStep::Running {
                        scale: self.scale(),
                    }
                }
            }
        }
    }
}
