//! Game state and core simulation types
//!
//! Entities are stored in insertion order and never removed during a round;
//! they are only flagged as retired. `reset` is the one place the collections
//! are cleared.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::animation::{AnimationState, AnimationStep};
use super::collision::Circle;
use super::rules::Message;
use super::tick::TickInput;
use crate::consts::*;
use crate::tuning::Tuning;

/// Which screen the game is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Screen {
    /// Title screen, waiting for the first shot
    #[default]
    Start,
    /// Active round
    Playing,
    /// Every required peg cleared
    Won,
}

/// Bonus carried by a special peg
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpecialKind {
    /// Clears the first remaining required peg
    RandomClear,
    /// Grants one more ball
    ExtraBall,
    /// Splits the striking ball in two
    DuplicateBall,
}

impl SpecialKind {
    pub const ALL: [SpecialKind; 3] = [
        SpecialKind::RandomClear,
        SpecialKind::ExtraBall,
        SpecialKind::DuplicateBall,
    ];

    /// Uniform pick among the three kinds
    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// Peg types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PegKind {
    #[default]
    Normal,
    /// Must be cleared to win the round
    Required,
    Special(SpecialKind),
}

/// A ball entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub position: Vec2,
    pub velocity: Vec2,
    pub radius: f32,
    pub base_radius: f32,
    pub animation: AnimationState,
    /// Caught by a net. Implies `retired`.
    pub captured: bool,
    /// Permanently out of play (off-screen or captured)
    pub retired: bool,
}

impl Ball {
    pub fn new(position: Vec2, velocity: Vec2, radius: f32) -> Self {
        Self {
            position,
            velocity,
            radius,
            base_radius: radius,
            animation: AnimationState::default(),
            captured: false,
            retired: false,
        }
    }

    #[inline]
    pub fn circle(&self) -> Circle {
        Circle::new(self.position, self.radius)
    }

    /// Free to move and collide (not retired, not being captured)
    #[inline]
    pub fn is_free(&self) -> bool {
        !self.retired && !self.animation.is_shrinking()
    }

    /// Advance the capture animation. Returns true on the tick the ball is captured.
    pub fn update_animation(&mut self, dt: f32) -> bool {
        match self.animation.advance(dt) {
            AnimationStep::Idle => false,
            AnimationStep::Running { scale } => {
                self.radius = self.base_radius * scale;
                false
            }
            AnimationStep::Finished => {
                self.radius = 0.0;
                self.captured = true;
                self.retired = true;
                true
            }
        }
    }
}

/// A peg entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Peg {
    pub position: Vec2,
    pub kind: PegKind,
    /// Set once, when the special effect fires
    pub special_claimed: bool,
    /// Shrink animation completed; the peg is retired
    pub hit: bool,
    pub radius: f32,
    pub base_radius: f32,
    pub animation: AnimationState,
}

impl Peg {
    pub fn new(position: Vec2, kind: PegKind, radius: f32) -> Self {
        Self {
            position,
            kind,
            special_claimed: false,
            hit: false,
            radius,
            base_radius: radius,
            animation: AnimationState::default(),
        }
    }

    #[inline]
    pub fn circle(&self) -> Circle {
        Circle::new(self.position, self.radius)
    }

    #[inline]
    pub fn is_required(&self) -> bool {
        self.kind == PegKind::Required
    }

    /// Special kind that has not fired yet
    pub fn unclaimed_special(&self) -> Option<SpecialKind> {
        match self.kind {
            PegKind::Special(kind) if !self.special_claimed => Some(kind),
            _ => None,
        }
    }

    /// Advance the shrink animation. Returns true on the tick the peg is cleared.
    pub fn update_animation(&mut self, dt: f32) -> bool {
        match self.animation.advance(dt) {
            AnimationStep::Idle => false,
            AnimationStep::Running { scale } => {
                self.radius = self.base_radius * scale;
                false
            }
            AnimationStep::Finished => {
                self.radius = 0.0;
                self.hit = true;
                true
            }
        }
    }
}

/// A net projectile. Catches balls, stops on the first peg it touches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Net {
    pub position: Vec2,
    pub velocity: Vec2,
    pub radius: f32,
    pub out_of_play: bool,
}

impl Net {
    pub fn new(position: Vec2, velocity: Vec2, radius: f32) -> Self {
        Self {
            position,
            velocity,
            radius,
            out_of_play: false,
        }
    }

    #[inline]
    pub fn circle(&self) -> Circle {
        Circle::new(self.position, self.radius)
    }
}

/// The patrolling launcher at the bottom of the playfield
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Launcher {
    pub position: Vec2,
    pub velocity: Vec2,
    pub radius: f32,
    /// Inner ring drawn while the net recharges (0 = just fired, radius = ready)
    pub net_cooldown_visible_radius: f32,
}

impl Launcher {
    pub fn new(position: Vec2, velocity: Vec2, radius: f32) -> Self {
        Self {
            position,
            velocity,
            radius,
            net_cooldown_visible_radius: radius,
        }
    }

    #[inline]
    pub fn circle(&self) -> Circle {
        Circle::new(self.position, self.radius)
    }

    /// Move horizontally, turning around at the window edges
    ///
    /// The bump pushes the launcher back inside the bound so it cannot get
    /// stuck flipping direction every tick.
    pub fn patrol(&mut self, dt: f32, width: f32, bump: f32) {
        self.position += self.velocity * dt;

        let min_x = self.radius;
        let max_x = (width - self.radius).max(min_x);
        if self.position.x < min_x {
            self.velocity.x = self.velocity.x.abs();
            self.position.x = min_x + bump;
        } else if self.position.x > max_x {
            self.velocity.x = -self.velocity.x.abs();
            self.position.x = max_x - bump;
        }
    }
}

/// Things that happened during a tick, drained by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A round started from the start screen
    GameStart,
    BallShot,
    /// A ball struck a fresh peg
    BallHit,
    /// A ball fell out of the playfield
    BallLost,
    NetShot,
    /// A net caught a ball
    NetHit,
    NetReady,
    SpecialTriggered(SpecialKind),
    /// A peg finished shrinking
    PegCleared(PegKind),
    GameWon,
    GameLost,
}

/// Entity storage is full
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnError {
    BallsFull { capacity: usize },
    PegsFull { capacity: usize },
    NetsFull { capacity: usize },
}

impl std::fmt::Display for SpawnError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpawnError::BallsFull { capacity } => write!(f, "ball storage full ({capacity})"),
            SpawnError::PegsFull { capacity } => write!(f, "peg storage full ({capacity})"),
            SpawnError::NetsFull { capacity } => write!(f, "net storage full ({capacity})"),
        }
    }
}

impl std::error::Error for SpawnError {}

/// Complete game state, advanced in place by [`super::tick::update`]
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    /// Balance values in effect
    pub tuning: Tuning,
    /// Current window size in pixels
    pub window: Vec2,
    /// Intents for the next update, merged in by the frame driver
    pub input: TickInput,
    /// Set by a quit intent; the embedding loop stops at the next frame
    pub quit: bool,
    pub screen: Screen,
    pub balls: Vec<Ball>,
    pub pegs: Vec<Peg>,
    pub nets: Vec<Net>,
    pub launcher: Launcher,
    pub balls_available: u32,
    pub score: u32,
    pub required_peg_count: u32,
    pub net_available: bool,
    pub net_cooldown_remaining: f32,
    pub message: Option<Message>,
    pub message_remaining: f32,
    /// Lose condition already reported this round
    pub round_lost: bool,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game on the start screen with the default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    /// Create a new game with custom tuning; the peg field is laid out immediately
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let window = Vec2::new(DEFAULT_WINDOW_WIDTH as f32, DEFAULT_WINDOW_HEIGHT as f32);
        let launcher = Launcher::new(Vec2::ZERO, Vec2::ZERO, tuning.launcher_radius);
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            window,
            input: TickInput::default(),
            quit: false,
            screen: Screen::Start,
            balls: Vec::new(),
            pegs: Vec::new(),
            nets: Vec::new(),
            launcher,
            balls_available: 0,
            score: 0,
            required_peg_count: 0,
            net_available: true,
            net_cooldown_remaining: 0.0,
            message: None,
            message_remaining: 0.0,
            round_lost: false,
            events: Vec::new(),
        };

        super::tick::reset(&mut state);

        state
    }

    /// Append a ball. Returns its index.
    pub fn spawn_ball(&mut self, position: Vec2, velocity: Vec2) -> Result<usize, SpawnError> {
        if self.balls.len() >= self.tuning.max_balls {
            return Err(SpawnError::BallsFull {
                capacity: self.tuning.max_balls,
            });
        }
        self.balls
            .push(Ball::new(position, velocity, self.tuning.ball_radius));
        Ok(self.balls.len() - 1)
    }

    /// Append a peg. Returns its index.
    pub fn spawn_peg(&mut self, position: Vec2, kind: PegKind) -> Result<usize, SpawnError> {
        if self.pegs.len() >= self.tuning.max_pegs {
            return Err(SpawnError::PegsFull {
                capacity: self.tuning.max_pegs,
            });
        }
        self.pegs
            .push(Peg::new(position, kind, self.tuning.peg_radius));
        Ok(self.pegs.len() - 1)
    }

    /// Append a net. Returns its index.
    pub fn spawn_net(&mut self, position: Vec2, velocity: Vec2) -> Result<usize, SpawnError> {
        if self.nets.len() >= self.tuning.max_nets {
            return Err(SpawnError::NetsFull {
                capacity: self.tuning.max_nets,
            });
        }
        self.nets
            .push(Net::new(position, velocity, self.tuning.net_radius));
        Ok(self.nets.len() - 1)
    }

    /// Any ball not yet retired (including ones being captured)
    pub fn has_live_ball(&self) -> bool {
        self.balls.iter().any(|b| !b.retired)
    }

    /// Required pegs not yet cleared
    pub fn required_remaining(&self) -> u32 {
        self.required_peg_count.saturating_sub(self.score)
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Events recorded since the last drain
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Take all events recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
