//! Sound cues
//!
//! The simulation never plays audio. It records [`GameEvent`]s, and the frame
//! loop maps them to [`SoundEffect`]s for whatever [`AudioSink`] the platform
//! provides.

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Round started
    GameStart,
    /// Ball leaves the launcher
    BallShot,
    /// Ball strikes a peg
    BallHit,
    /// Ball falls out of the playfield
    BallLost,
    /// Net catches a ball
    NetHit,
    /// Net leaves the launcher
    NetShot,
    /// Out of balls
    GameLost,
    /// Every required peg cleared
    GameWon,
}

impl SoundEffect {
    /// Cue for a simulation event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::GameStart => Some(SoundEffect::GameStart),
            GameEvent::BallShot => Some(SoundEffect::BallShot),
            GameEvent::BallHit => Some(SoundEffect::BallHit),
            GameEvent::BallLost => Some(SoundEffect::BallLost),
            GameEvent::NetShot => Some(SoundEffect::NetShot),
            GameEvent::NetHit => Some(SoundEffect::NetHit),
            GameEvent::GameLost => Some(SoundEffect::GameLost),
            GameEvent::GameWon => Some(SoundEffect::GameWon),
            GameEvent::NetReady | GameEvent::SpecialTriggered(_) | GameEvent::PegCleared(_) => {
                None
            }
        }
    }
}

/// Audio output provided by the platform
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect);
}

/// Sink for headless runs: writes each cue to the log
#[derive(Debug, Default)]
pub struct LogAudio {
    pub played: usize,
}

impl AudioSink for LogAudio {
    fn play(&mut self, effect: SoundEffect) {
        self.played += 1;
        log::debug!("Sound: {:?}", effect);
    }
}
