//! Pegfall headless runner
//!
//! Plays a scripted round against the simulation with no window attached and
//! prints the final render view as JSON. Useful for checking balance changes.
//!
//! Usage: `pegfall [seed] [tuning.json]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Pegfall (headless) starting...");

    if let Err(e) = native::run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use glam::Vec2;

    use pegfall::audio::LogAudio;
    use pegfall::consts::*;
    use pegfall::platform::{Key, MouseButton, RawInput};
    use pegfall::sim::{GameState, Screen};
    use pegfall::{Session, Tuning};

    /// Frames per second of the simulated display
    const FRAME_DT: f32 = 1.0 / 60.0;
    /// Give up after this many seconds of play
    const MAX_SECONDS: f32 = 180.0;

    pub fn run() -> Result<(), Box<dyn std::error::Error>> {
        let mut args = std::env::args().skip(1);
        let seed = match args.next() {
            Some(arg) => arg.parse::<u64>()?,
            None => 12345,
        };
        let tuning = match args.next() {
            Some(path) => Tuning::from_json(&std::fs::read_to_string(&path)?)?,
            None => Tuning::default(),
        };

        let state = GameState::with_tuning(seed, tuning);
        log::info!("Game initialized with seed: {}", seed);
        let mut session = Session::new(state, LogAudio::default());

        let total_frames = (MAX_SECONDS / FRAME_DT) as u32;
        for frame in 0..total_frames {
            let raw = scripted_input(&session, frame);
            if !session.frame(FRAME_DT, &raw) {
                break;
            }
            if session.state.screen == Screen::Won || session.state.round_lost {
                break;
            }
        }

        let state = &session.state;
        let view = session.view();
        log::info!(
            "Finished on {:?} ({:?}): score {}, {} required pegs remaining, {} balls left, {} sounds played",
            state.screen,
            view.title(),
            state.score,
            state.required_remaining(),
            state.balls_available,
            session.audio().played
        );

        println!("{}", serde_json::to_string_pretty(&view)?);
        Ok(())
    }

    /// A simple player: fire at the lowest remaining required peg once the
    /// previous ball is gone, and throw a net at balls heading for the floor.
    fn scripted_input(session: &Session<LogAudio>, frame: u32) -> RawInput {
        let state = &session.state;
        let mut raw = RawInput {
            window: Some((DEFAULT_WINDOW_WIDTH, DEFAULT_WINDOW_HEIGHT)),
            ..Default::default()
        };

        if state.screen == Screen::Start {
            raw.buttons_down.push(MouseButton::Left);
            raw.cursor = Some(Vec2::new(state.window.x / 2.0, 0.0));
            return raw;
        }

        let falling = state.balls.iter().find(|b| {
            b.is_free() && b.velocity.y > 0.0 && b.position.y > state.window.y * 0.75
        });
        if let Some(ball) = falling {
            if state.net_available {
                raw.buttons_down.push(MouseButton::Right);
                raw.cursor = Some(ball.position);
            }
            return raw;
        }

        if !state.has_live_ball() && state.balls_available > 0 && frame % 30 == 0 {
            let target = state
                .pegs
                .iter()
                .filter(|p| p.is_required() && !p.hit)
                .max_by(|a, b| a.position.y.total_cmp(&b.position.y));
            match target {
                Some(peg) => {
                    raw.buttons_down.push(MouseButton::Left);
                    raw.cursor = Some(peg.position);
                }
                None => raw.keys_down.push(Key::Reset),
            }
        }

        raw
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser builds embed the library directly
}
