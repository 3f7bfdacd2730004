//! Platform abstraction layer
//!
//! The window/input backend reports raw device state once per frame as a
//! [`RawInput`]. This module turns it into the [`TickInput`] intents the
//! simulation understands.

use glam::Vec2;

use crate::sim::TickInput;
use crate::sim::vector::direction;

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// R - restart the round
    Reset,
    /// Space - fire a ball
    ShootBall,
    /// N - fire a net
    ShootNet,
    /// Backspace - back to the start screen
    Cancel,
    /// Escape - quit
    Quit,
}

/// Mouse buttons the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    /// Fires a ball toward the cursor
    Left,
    /// Fires a net toward the cursor
    Right,
}

/// Device state for one frame, as reported by the platform
#[derive(Debug, Clone, Default)]
pub struct RawInput {
    /// Keys that went down this frame
    pub keys_down: Vec<Key>,
    /// Mouse buttons that went down this frame
    pub buttons_down: Vec<MouseButton>,
    /// Cursor position in window pixels
    pub cursor: Option<Vec2>,
    /// Window size in pixels
    pub window: Option<(u32, u32)>,
    /// Window close requested
    pub close_requested: bool,
}

impl RawInput {
    /// Translate device state into simulation intents
    ///
    /// The aim is the unit vector from the launcher to the cursor. Without a
    /// cursor, `fallback_aim` is used (e.g. the previous frame's aim).
    pub fn to_tick_input(&self, launcher: Vec2, fallback_aim: Vec2) -> TickInput {
        let aim = self
            .cursor
            .map(|cursor| direction(cursor - launcher))
            .unwrap_or(fallback_aim);

        let key = |k: Key| self.keys_down.contains(&k);
        let button = |b: MouseButton| self.buttons_down.contains(&b);

        TickInput {
            reset: key(Key::Reset),
            shoot_ball: key(Key::ShootBall) || button(MouseButton::Left),
            shoot_net: key(Key::ShootNet) || button(MouseButton::Right),
            cancel: key(Key::Cancel),
            quit: key(Key::Quit) || self.close_requested,
            aim,
            window: self.window,
        }
    }
}
