//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Externally supplied timestep only
//! - Seeded RNG only
//! - Stable iteration order (insertion order, entities are never removed mid-round)
//! - No rendering or platform dependencies

pub mod animation;
pub mod collision;
pub mod rules;
pub mod special;
pub mod state;
pub mod tick;
pub mod vector;

pub use animation::{AnimationKind, AnimationState};
pub use collision::{Circle, Contact, overlaps, resolve_against_static};
pub use rules::Message;
pub use special::trigger_special;
pub use state::{
    Ball, GameEvent, GameState, Launcher, Net, Peg, PegKind, Screen, SpawnError, SpecialKind,
};
pub use tick::{TickInput, generate_pegs, reset, tick, update};
pub use vector::{direction, reflect};
