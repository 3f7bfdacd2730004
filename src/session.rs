//! Fixed-timestep frame loop
//!
//! The platform calls [`Session::frame`] once per rendered frame with the
//! wall-clock time since the previous one. The session runs as many fixed
//! simulation ticks as fit, then hands finished events to the audio sink.

use glam::Vec2;

use crate::audio::{AudioSink, SoundEffect};
use crate::consts::*;
use crate::platform::RawInput;
use crate::sim::{GameState, TickInput, tick};
use crate::view::RenderView;

/// One running game plus its frame timing
pub struct Session<A: AudioSink> {
    pub state: GameState,
    audio: A,
    accumulator: f32,
    /// Intents waiting for the next tick (one-shots survive short frames)
    pending: TickInput,
    /// Last non-zero aim, used when the platform reports no cursor
    aim: Vec2,
}

impl<A: AudioSink> Session<A> {
    pub fn new(state: GameState, audio: A) -> Self {
        Self {
            state,
            audio,
            accumulator: 0.0,
            pending: TickInput::default(),
            aim: Vec2::NEG_Y,
        }
    }

    /// False once a quit intent has been processed
    pub fn is_running(&self) -> bool {
        !self.state.quit
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    /// Snapshot for the renderer
    pub fn view(&self) -> RenderView {
        RenderView::capture(&self.state)
    }

    /// Advance by one rendered frame. Returns whether the game is still running.
    pub fn frame(&mut self, frame_dt: f32, raw: &RawInput) -> bool {
        if self.state.quit {
            return false;
        }

        let fresh = raw.to_tick_input(self.state.launcher.position, self.aim);
        if fresh.aim != Vec2::ZERO {
            self.aim = fresh.aim;
        }
        self.merge_pending(fresh);

        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut self.state, &self.pending, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.pending.clear_one_shots();

            if self.state.quit {
                break;
            }
        }
        if substeps == MAX_SUBSTEPS {
            // Too far behind; drop the backlog instead of spiralling
            self.accumulator = self.accumulator.min(SIM_DT);
        }

        for event in self.state.drain_events() {
            if let Some(effect) = SoundEffect::for_event(&event) {
                self.audio.play(effect);
            }
        }

        !self.state.quit
    }

    fn merge_pending(&mut self, fresh: TickInput) {
        let pending = &mut self.pending;
        pending.reset |= fresh.reset;
        pending.shoot_ball |= fresh.shoot_ball;
        pending.shoot_net |= fresh.shoot_net;
        pending.cancel |= fresh.cancel;
        pending.quit |= fresh.quit;
        pending.aim = fresh.aim;
        if fresh.window.is_some() {
            pending.window = fresh.window;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::LogAudio;
    use crate::platform::{Key, MouseButton};
    use crate::sim::Screen;

    fn session() -> Session<LogAudio> {
        Session::new(GameState::new(77), LogAudio::default())
    }

    fn click() -> RawInput {
        RawInput {
            buttons_down: vec![MouseButton::Left],
            cursor: Some(Vec2::new(300.0, 100.0)),
            ..Default::default()
        }
    }

    #[test]
    fn test_click_starts_then_shoots() {
        let mut session = session();
        assert!(session.frame(1.0 / 60.0, &click()));
        assert_eq!(session.state.screen, Screen::Playing);

        session.frame(1.0 / 60.0, &click());
        assert_eq!(session.state.balls.len(), 1);
        // GameStart + BallShot
        assert!(session.audio().played >= 2);
    }

    #[test]
    fn test_short_frame_keeps_one_shot() {
        let mut session = session();
        // Not enough time for a tick yet
        session.frame(SIM_DT * 0.25, &click());
        assert_eq!(session.state.screen, Screen::Start);

        session.frame(SIM_DT, &RawInput::default());
        assert_eq!(session.state.screen, Screen::Playing);
    }

    #[test]
    fn test_substeps_are_capped() {
        let mut session = session();
        session.frame(10.0, &RawInput::default());
        assert!(session.accumulator <= SIM_DT);
    }

    #[test]
    fn test_quit_stops_session() {
        let mut session = session();
        let quit = RawInput {
            keys_down: vec![Key::Quit],
            ..Default::default()
        };
        assert!(!session.frame(1.0 / 60.0, &quit));
        assert!(!session.is_running());
        assert!(!session.frame(1.0 / 60.0, &RawInput::default()));
    }

    #[test]
    fn test_view_reflects_state() {
        let session = session();
        let view = session.view();
        assert_eq!(view.pegs.len(), 50);
        assert_eq!(view.balls_available, 8);
        assert_eq!(view.screen, Screen::Start);
    }
}
