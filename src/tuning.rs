//! Data-driven game balance
//!
//! Every gameplay constant lives in [`Tuning`]. Defaults reproduce the stock
//! game; a JSON document can override any subset of fields.

use serde::{Deserialize, Serialize};

/// Gameplay tuning values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Round setup ===
    /// Balls the player starts each round with
    pub starting_balls: u32,
    /// Total pegs generated on reset
    pub peg_count: usize,
    /// Leading pegs that are Normal
    pub normal_pegs: usize,
    /// Pegs after the normal ones that are Required; the rest are Special
    pub required_pegs: usize,
    /// Peg field bounds as fractions of the window (left, top, right, bottom)
    pub peg_field: [f32; 4],
    /// Placement retries per peg before accepting an overlapping spot
    pub peg_placement_attempts: u32,

    // === Entity sizes ===
    pub ball_radius: f32,
    pub peg_radius: f32,
    pub net_radius: f32,
    pub launcher_radius: f32,

    // === Motion ===
    /// Downward acceleration on balls (pixels/s²)
    pub gravity: f32,
    pub ball_speed: f32,
    pub net_speed: f32,
    /// Horizontal patrol speed of the launcher
    pub launcher_speed: f32,
    /// Launcher distance above the bottom edge of the window
    pub launcher_bottom_offset: f32,
    /// Positional bump applied when the launcher turns around at a bound
    pub launcher_bump: f32,

    // === Collision response ===
    pub peg_friction: f32,
    pub launcher_friction: f32,
    pub wall_friction: f32,
    /// Distance a body is pushed out along the contact normal
    pub collision_nudge: f32,

    // === Effects and timers (seconds) ===
    /// Velocity multiplier for the ball spawned by a DuplicateBall peg
    pub duplicate_velocity_scale: f32,
    pub peg_shrink_duration: f32,
    pub ball_capture_duration: f32,
    pub net_cooldown: f32,
    pub message_duration: f32,
    /// Time scale while the last ball is in play
    pub last_ball_time_scale: f32,

    // === Capacities ===
    pub max_balls: usize,
    pub max_pegs: usize,
    pub max_nets: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            starting_balls: 8,
            peg_count: 50,
            normal_pegs: 30,
            required_pegs: 15,
            peg_field: [0.1, 0.15, 0.9, 0.7],
            peg_placement_attempts: 16,

            ball_radius: 10.0,
            peg_radius: 10.0,
            net_radius: 16.0,
            launcher_radius: 24.0,

            gravity: 250.0,
            ball_speed: 450.0,
            net_speed: 520.0,
            launcher_speed: 150.0,
            launcher_bottom_offset: 60.0,
            launcher_bump: 1.0,

            peg_friction: 0.95,
            launcher_friction: 1.0,
            wall_friction: 0.9,
            collision_nudge: 1.0,

            duplicate_velocity_scale: 0.8,
            peg_shrink_duration: 0.4,
            ball_capture_duration: 0.5,
            net_cooldown: 3.0,
            message_duration: 2.0,
            last_ball_time_scale: 0.5,

            max_balls: 128,
            max_pegs: 64,
            max_nets: 32,
        }
    }
}

/// Errors from loading a tuning document
#[derive(Debug)]
pub enum TuningError {
    Json(serde_json::Error),
    Invalid(String),
}

impl std::fmt::Display for TuningError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TuningError::Json(e) => write!(f, "tuning JSON error: {e}"),
            TuningError::Invalid(msg) => write!(f, "invalid tuning: {msg}"),
        }
    }
}

impl std::error::Error for TuningError {}

impl From<serde_json::Error> for TuningError {
    fn from(e: serde_json::Error) -> Self {
        TuningError::Json(e)
    }
}

impl Tuning {
    /// Parse and validate a tuning document. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check cross-field constraints the simulation relies on
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.normal_pegs + self.required_pegs > self.peg_count {
            return Err(TuningError::Invalid(format!(
                "normal_pegs ({}) + required_pegs ({}) exceeds peg_count ({})",
                self.normal_pegs, self.required_pegs, self.peg_count
            )));
        }
        if self.peg_count > self.max_pegs {
            return Err(TuningError::Invalid(format!(
                "peg_count ({}) exceeds max_pegs ({})",
                self.peg_count, self.max_pegs
            )));
        }
        let [left, top, right, bottom] = self.peg_field;
        if !(0.0..=1.0).contains(&left)
            || !(0.0..=1.0).contains(&right)
            || !(0.0..=1.0).contains(&top)
            || !(0.0..=1.0).contains(&bottom)
            || left >= right
            || top >= bottom
        {
            return Err(TuningError::Invalid(format!(
                "peg_field {:?} is not a region inside the window",
                self.peg_field
            )));
        }
        let radii = [
            self.ball_radius,
            self.peg_radius,
            self.net_radius,
            self.launcher_radius,
        ];
        if radii.iter().any(|r| *r <= 0.0) {
            return Err(TuningError::Invalid("entity radii must be positive".into()));
        }
        if self.net_cooldown < 0.0 || self.message_duration < 0.0 {
            return Err(TuningError::Invalid("timers must not be negative".into()));
        }
        Ok(())
    }
}
