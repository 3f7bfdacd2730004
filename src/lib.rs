//! Pegfall - A ball-and-peg arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, game rules)
//! - `tuning`: Data-driven game balance
//! - `platform`: Raw input to per-tick intents
//! - `view`: Read-only snapshot handed to the renderer
//! - `audio`: Sound cues derived from simulation events
//! - `session`: Fixed-timestep frame loop around the simulation

pub mod audio;
pub mod platform;
pub mod session;
pub mod sim;
pub mod tuning;
pub mod view;

pub use session::Session;
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz for smooth physics)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame the session will try to catch up on
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Window size used before the platform reports one
    pub const DEFAULT_WINDOW_WIDTH: u32 = 600;
    pub const DEFAULT_WINDOW_HEIGHT: u32 = 800;
}
