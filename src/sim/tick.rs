//! Per-frame simulation update
//!
//! Advances the game by one externally supplied timestep. Passes run in a
//! fixed order: intents → launcher → balls → pegs → nets → messages and
//! cooldowns → win/lose.

use glam::Vec2;
use rand::Rng;

use super::collision::{bounce_off_side_walls, overlaps, resolve_against_static};
use super::rules::{self, handle_screen_intents};
use super::special::trigger_special;
use super::state::{GameEvent, GameState, Launcher, PegKind, SpecialKind};
use super::vector::direction;

/// Intents for a single tick, produced by the input layer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Restart the round
    pub reset: bool,
    /// Fire a ball from the launcher along `aim`
    pub shoot_ball: bool,
    /// Fire a net from the launcher along `aim`
    pub shoot_net: bool,
    /// Leave the round and return to the start screen
    pub cancel: bool,
    /// Stop the game
    pub quit: bool,
    /// Aim direction from the launcher (normalized by the simulation)
    pub aim: Vec2,
    /// Window size reported by the platform this frame
    pub window: Option<(u32, u32)>,
}

impl TickInput {
    /// Drop the one-shot intents once they have been applied
    pub fn clear_one_shots(&mut self) {
        self.reset = false;
        self.shoot_ball = false;
        self.shoot_net = false;
        self.cancel = false;
    }
}

/// Merge `input` into the state and advance by `dt`
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.input = input.clone();
    update(state, dt);
}

/// Advance the game state by `dt` seconds using the intents in `state.input`
pub fn update(state: &mut GameState, dt: f32) {
    if state.quit {
        return;
    }

    if let Some((width, height)) = state.input.window {
        state.window = Vec2::new(width as f32, height as f32);
    }

    let skip_round = handle_screen_intents(state);
    if !skip_round {
        play(state, dt);
    } else if !state.quit {
        // Banners still fade on the start and win screens
        rules::update_message(state, dt);
    }

    state.input.clear_one_shots();
}

fn play(state: &mut GameState, dt: f32) {
    // Slow motion while the last ball is in the air
    let dt = if state.balls_available == 0 && state.has_live_ball() {
        dt * state.tuning.last_ball_time_scale
    } else {
        dt
    };

    if state.input.shoot_ball {
        shoot_ball(state);
    }
    if state.input.shoot_net {
        shoot_net(state);
    }

    let width = state.window.x;
    let bump = state.tuning.launcher_bump;
    state.launcher.patrol(dt, width, bump);

    update_balls(state, dt);
    update_pegs(state, dt);
    update_nets(state, dt);

    rules::update_message(state, dt);
    rules::update_net_cooldown(state, dt);

    if !rules::check_win(state) {
        rules::check_lose(state);
    }
}

/// Point just outside the launcher along `aim` where projectiles appear
fn muzzle(launcher: &Launcher, aim: Vec2, projectile_radius: f32) -> Vec2 {
    launcher.position + aim * (launcher.radius + projectile_radius + 1.0)
}

fn shoot_ball(state: &mut GameState) {
    let aim = direction(state.input.aim);
    if aim == Vec2::ZERO || state.balls_available == 0 {
        return;
    }

    let position = muzzle(&state.launcher, aim, state.tuning.ball_radius);
    let velocity = aim * state.tuning.ball_speed;
    match state.spawn_ball(position, velocity) {
        Ok(_) => {
            state.balls_available -= 1;
            state.push_event(GameEvent::BallShot);
        }
        Err(e) => log::warn!("Shot ignored: {e}"),
    }
}

fn shoot_net(state: &mut GameState) {
    let aim = direction(state.input.aim);
    if aim == Vec2::ZERO || !state.net_available {
        return;
    }

    let position = muzzle(&state.launcher, aim, state.tuning.net_radius);
    let velocity = aim * state.tuning.net_speed;
    match state.spawn_net(position, velocity) {
        Ok(_) => {
            rules::start_net_cooldown(state);
            state.push_event(GameEvent::NetShot);
        }
        Err(e) => log::warn!("Net ignored: {e}"),
    }
}

fn update_balls(state: &mut GameState, dt: f32) {
    let gravity = state.tuning.gravity;
    let width = state.window.x;
    let height = state.window.y;
    let wall_friction = state.tuning.wall_friction;
    let launcher_friction = state.tuning.launcher_friction;
    let nudge = state.tuning.collision_nudge;
    let launcher = state.launcher.circle();

    // Balls spawned during this pass start moving next tick
    let count = state.balls.len();
    for index in 0..count {
        let ball = &mut state.balls[index];
        if ball.retired {
            continue;
        }

        if ball.animation.is_shrinking() {
            if ball.update_animation(dt) {
                state.balls_available += 1;
            }
            continue;
        }

        ball.velocity.y += gravity * dt;
        ball.position += ball.velocity * dt;

        bounce_off_side_walls(
            &mut ball.position,
            &mut ball.velocity,
            ball.radius,
            width,
            wall_friction,
        );

        if ball.position.y - ball.radius > height {
            ball.retired = true;
            state.push_event(GameEvent::BallLost);
            continue;
        }

        resolve_against_static(
            &mut ball.position,
            &mut ball.velocity,
            ball.radius,
            launcher,
            launcher_friction,
            nudge,
        );

        collide_ball_with_pegs(state, index);
    }
}

/// Every overlapping peg is processed, so a ball wedged between two pegs
/// bounces off both in the same tick.
fn collide_ball_with_pegs(state: &mut GameState, ball_index: usize) {
    let friction = state.tuning.peg_friction;
    let nudge = state.tuning.collision_nudge;
    let shrink = state.tuning.peg_shrink_duration;

    for peg_index in 0..state.pegs.len() {
        let peg = &state.pegs[peg_index];
        if peg.hit {
            continue;
        }
        let peg_circle = peg.circle();
        if !overlaps(state.balls[ball_index].circle(), peg_circle) {
            continue;
        }

        if state.pegs[peg_index].animation.start_shrink(shrink) {
            state.push_event(GameEvent::BallHit);
        }
        // Before the bounce, so a duplicate inherits the incoming velocity
        trigger_special(state, peg_index, ball_index);

        let ball = &mut state.balls[ball_index];
        resolve_against_static(
            &mut ball.position,
            &mut ball.velocity,
            ball.radius,
            peg_circle,
            friction,
            nudge,
        );
    }
}

fn update_pegs(state: &mut GameState, dt: f32) {
    for index in 0..state.pegs.len() {
        if state.pegs[index].update_animation(dt) {
            let kind = state.pegs[index].kind;
            rules::credit_cleared_peg(state, kind);
        }
    }
}

fn update_nets(state: &mut GameState, dt: f32) {
    let capture = state.tuning.ball_capture_duration;
    let window = state.window;

    for index in 0..state.nets.len() {
        let net = &mut state.nets[index];
        if net.out_of_play {
            continue;
        }

        net.position += net.velocity * dt;
        let pos = net.position;
        let r = net.radius;
        if pos.x + r < 0.0 || pos.x - r > window.x || pos.y + r < 0.0 || pos.y - r > window.y {
            net.out_of_play = true;
            continue;
        }
        let net_circle = net.circle();

        let mut caught = 0;
        for ball in state.balls.iter_mut() {
            if ball.is_free() && overlaps(net_circle, ball.circle()) {
                ball.animation.start_shrink(capture);
                ball.velocity = Vec2::ZERO;
                caught += 1;
            }
        }
        for _ in 0..caught {
            state.push_event(GameEvent::NetHit);
        }

        let blocked = state
            .pegs
            .iter()
            .any(|p| !p.hit && overlaps(net_circle, p.circle()));
        if blocked {
            state.nets[index].out_of_play = true;
        }
    }
}

/// Start a fresh round: clear entities, restore counters, lay out pegs and
/// park the launcher. The current screen is left alone.
pub fn reset(state: &mut GameState) {
    state.balls.clear();
    state.pegs.clear();
    state.nets.clear();

    state.balls_available = state.tuning.starting_balls;
    state.score = 0;
    state.net_available = true;
    state.net_cooldown_remaining = 0.0;
    state.message = None;
    state.message_remaining = 0.0;
    state.round_lost = false;

    let start = Vec2::new(
        state.window.x / 2.0,
        state.window.y - state.tuning.launcher_bottom_offset,
    );
    state.launcher = Launcher::new(
        start,
        Vec2::new(state.tuning.launcher_speed, 0.0),
        state.tuning.launcher_radius,
    );

    generate_pegs(state);
    state.required_peg_count = state.pegs.iter().filter(|p| p.is_required()).count() as u32;

    log::info!(
        "Round reset: {} pegs ({} required), {} balls",
        state.pegs.len(),
        state.required_peg_count,
        state.balls_available
    );
}

/// Scatter the peg field inside the window-relative peg region
///
/// The first `normal_pegs` are Normal, the next `required_pegs` Required and
/// the rest Special with a random bonus. Positions avoid overlapping earlier
/// pegs when a free spot turns up within the attempt budget.
pub fn generate_pegs(state: &mut GameState) {
    let tuning = state.tuning.clone();
    let [left, top, right, bottom] = tuning.peg_field;
    let r = tuning.peg_radius;
    let min_x = state.window.x * left + r;
    let max_x = state.window.x * right - r;
    let min_y = state.window.y * top + r;
    let max_y = state.window.y * bottom - r;
    // Leave room for a ball to pass between neighbours
    let spacing = 2.0 * r + tuning.ball_radius;

    for index in 0..tuning.peg_count {
        let kind = if index < tuning.normal_pegs {
            PegKind::Normal
        } else if index < tuning.normal_pegs + tuning.required_pegs {
            PegKind::Required
        } else {
            PegKind::Special(SpecialKind::random(&mut state.rng))
        };

        let mut position = Vec2::ZERO;
        for _ in 0..tuning.peg_placement_attempts.max(1) {
            position = Vec2::new(
                random_in(&mut state.rng, min_x, max_x),
                random_in(&mut state.rng, min_y, max_y),
            );
            let clear = state
                .pegs
                .iter()
                .all(|p| p.position.distance(position) >= spacing);
            if clear {
                break;
            }
        }

        if let Err(e) = state.spawn_peg(position, kind) {
            log::warn!("Peg field truncated: {e}");
            break;
        }
    }
}

/// Uniform value in `[lo, hi)`, or the midpoint when the range is empty
fn random_in(rng: &mut impl Rng, lo: f32, hi: f32) -> f32 {
    if hi > lo {
        rng.random_range(lo..hi)
    } else {
        (lo + hi) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::rules::Message;
    use crate::sim::state::{Peg, Screen};

    /// A round in progress with an empty playfield
    fn playing_state() -> GameState {
        let mut state = GameState::new(4242);
        state.screen = Screen::Playing;
        state.pegs.clear();
        // Nothing left to clear, so the round can only end by a test's choice
        state.required_peg_count = 1;
        state.drain_events();
        state
    }

    #[test]
    fn test_reset_scenario() {
        let mut state = GameState::new(12345);
        state.window = Vec2::new(600.0, 800.0);
        state.score = 3;
        state.balls_available = 1;
        state.spawn_ball(Vec2::new(10.0, 10.0), Vec2::ZERO).unwrap();

        reset(&mut state);

        assert_eq!(state.balls_available, 8);
        assert_eq!(state.pegs.len(), 50);
        assert_eq!(state.score, 0);
        assert_eq!(state.screen, Screen::Start);
        assert_eq!(state.balls.len(), 0);
        assert_eq!(state.required_peg_count, 15);
    }

    #[test]
    fn test_reset_intent_keeps_screen() {
        let mut state = GameState::new(12345);
        let input = TickInput {
            reset: true,
            window: Some((600, 800)),
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.screen, Screen::Start);
        assert_eq!(state.pegs.len(), 50);
        assert_eq!(state.balls_available, 8);
    }

    #[test]
    fn test_peg_layout() {
        let state = GameState::new(99);
        let kinds: Vec<_> = state.pegs.iter().map(|p| p.kind).collect();
        assert!(kinds[..30].iter().all(|k| *k == PegKind::Normal));
        assert!(kinds[30..45].iter().all(|k| *k == PegKind::Required));
        assert!(kinds[45..].iter().all(|k| matches!(k, PegKind::Special(_))));

        let [left, top, right, bottom] = state.tuning.peg_field;
        for peg in &state.pegs {
            assert!(peg.position.x >= state.window.x * left);
            assert!(peg.position.x <= state.window.x * right);
            assert!(peg.position.y >= state.window.y * top);
            assert!(peg.position.y <= state.window.y * bottom);
        }
    }

    #[test]
    fn test_launcher_parked_on_reset() {
        let state = GameState::new(5);
        assert_eq!(state.launcher.position, Vec2::new(300.0, 740.0));
        assert_eq!(state.launcher.velocity, Vec2::new(150.0, 0.0));
    }

    #[test]
    fn test_start_then_shoot() {
        let mut state = GameState::new(12345);
        let shoot = TickInput {
            shoot_ball: true,
            aim: Vec2::new(0.0, -1.0),
            ..Default::default()
        };

        // First click only starts the round
        tick(&mut state, &shoot, SIM_DT);
        assert_eq!(state.screen, Screen::Playing);
        assert!(state.balls.is_empty());

        tick(&mut state, &shoot, SIM_DT);
        assert_eq!(state.balls.len(), 1);
        assert_eq!(state.balls_available, 7);
        assert!(state.balls[0].velocity.y < 0.0);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::GameStart));
        assert!(events.contains(&GameEvent::BallShot));
    }

    #[test]
    fn test_shot_without_aim_is_ignored() {
        let mut state = playing_state();
        let input = TickInput {
            shoot_ball: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert!(state.balls.is_empty());
        assert_eq!(state.balls_available, 8);
    }

    #[test]
    fn test_shot_rejected_at_capacity() {
        let mut state = playing_state();
        state.tuning.max_balls = 0;
        let input = TickInput {
            shoot_ball: true,
            aim: Vec2::new(0.0, -1.0),
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert!(state.balls.is_empty());
        assert_eq!(state.balls_available, 8);
    }

    #[test]
    fn test_net_cooldown_scenario() {
        let mut state = playing_state();
        let fire = TickInput {
            shoot_net: true,
            aim: Vec2::new(0.0, -1.0),
            ..Default::default()
        };
        tick(&mut state, &fire, 0.5);
        assert!(!state.net_available);
        assert_eq!(state.nets.len(), 1);

        let idle = TickInput::default();
        for _ in 0..4 {
            tick(&mut state, &idle, 0.5);
            assert!(!state.net_available);
        }
        // 6 × 0.5 s == 3 s cooldown
        tick(&mut state, &idle, 0.5);
        assert!(state.net_available);
        assert_eq!(state.message, Some(Message::NetReady));
        assert_eq!(state.message.map(|m| m.text()), Some("Net ready"));
    }

    #[test]
    fn test_net_not_refired_during_cooldown() {
        let mut state = playing_state();
        let fire = TickInput {
            shoot_net: true,
            aim: Vec2::new(0.3, -1.0),
            ..Default::default()
        };
        tick(&mut state, &fire, SIM_DT);
        tick(&mut state, &fire, SIM_DT);
        assert_eq!(state.nets.len(), 1);
    }

    #[test]
    fn test_ball_clears_required_peg_and_wins() {
        let mut state = playing_state();
        state.pegs.push(Peg::new(Vec2::new(300.0, 300.0), PegKind::Required, 10.0));
        state.required_peg_count = 1;
        state.spawn_ball(Vec2::new(300.0, 280.0), Vec2::new(0.0, 100.0)).unwrap();

        let idle = TickInput::default();
        for _ in 0..120 {
            tick(&mut state, &idle, SIM_DT);
            assert!(state.score <= state.required_peg_count);
        }

        assert!(state.pegs[0].hit);
        assert_eq!(state.score, 1);
        assert_eq!(state.screen, Screen::Won);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::BallHit));
        assert!(events.contains(&GameEvent::PegCleared(PegKind::Required)));
        assert!(events.contains(&GameEvent::GameWon));
    }

    #[test]
    fn test_ball_bounces_off_peg() {
        let mut state = playing_state();
        state.pegs.push(Peg::new(Vec2::new(300.0, 300.0), PegKind::Normal, 10.0));
        state.spawn_ball(Vec2::new(300.0, 280.0), Vec2::new(0.0, 100.0)).unwrap();

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(state.balls[0].velocity.y < 0.0);
        assert!(state.pegs[0].animation.is_shrinking());
    }

    #[test]
    fn test_ball_bounces_off_launcher() {
        let mut state = playing_state();
        state.launcher.velocity = Vec2::ZERO;
        let above = state.launcher.position - Vec2::new(0.0, 35.0);
        state.spawn_ball(above, Vec2::new(0.0, 200.0)).unwrap();

        tick(&mut state, &TickInput::default(), SIM_DT);
        let ball = &state.balls[0];
        assert!(ball.velocity.y < 0.0);
        // Launcher friction is 1.0, so the bounce keeps the incoming speed
        let incoming = 200.0 + state.tuning.gravity * SIM_DT;
        assert!((ball.velocity.length() - incoming).abs() < 1e-3);
    }

    #[test]
    fn test_peg_field_truncated_at_capacity() {
        let mut state = GameState::new(12345);
        state.tuning.max_pegs = 40;
        reset(&mut state);

        assert_eq!(state.pegs.len(), 40);
        let required = state.pegs.iter().filter(|p| p.is_required()).count() as u32;
        assert_eq!(required, 10);
        assert_eq!(state.required_peg_count, required);
    }

    #[test]
    fn test_overlapping_pegs_all_hit_in_one_tick() {
        let mut state = playing_state();
        state.pegs.push(Peg::new(Vec2::new(290.0, 300.0), PegKind::Normal, 10.0));
        state.pegs.push(Peg::new(Vec2::new(310.0, 300.0), PegKind::Normal, 10.0));
        state.spawn_ball(Vec2::new(300.0, 285.0), Vec2::new(0.0, 50.0)).unwrap();

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(state.pegs.iter().all(|p| p.animation.is_shrinking()));
        let hits = state
            .drain_events()
            .into_iter()
            .filter(|e| *e == GameEvent::BallHit)
            .count();
        assert_eq!(hits, 2);
    }

    #[test]
    fn test_special_peg_fires_once_across_hits() {
        let mut state = playing_state();
        state.pegs.push(Peg::new(
            Vec2::new(300.0, 300.0),
            PegKind::Special(SpecialKind::ExtraBall),
            10.0,
        ));
        state.tuning.peg_shrink_duration = 10.0;
        state.spawn_ball(Vec2::new(300.0, 285.0), Vec2::new(0.0, 50.0)).unwrap();
        state.spawn_ball(Vec2::new(300.0, 315.0), Vec2::new(0.0, -50.0)).unwrap();

        for _ in 0..10 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert_eq!(state.balls_available, 9);
        assert!(state.pegs[0].special_claimed);
    }

    #[test]
    fn test_ball_lost_off_bottom() {
        let mut state = playing_state();
        state.spawn_ball(Vec2::new(300.0, 815.0), Vec2::new(0.0, 100.0)).unwrap();
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(state.balls[0].retired);
        assert!(!state.balls[0].captured);
        assert!(state.events().contains(&GameEvent::BallLost));
    }

    #[test]
    fn test_net_catches_ball() {
        let mut state = playing_state();
        state.spawn_ball(Vec2::new(300.0, 400.0), Vec2::ZERO).unwrap();
        state.spawn_net(Vec2::new(300.0, 420.0), Vec2::new(0.0, -100.0)).unwrap();
        let before = state.balls_available;

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(state.balls[0].animation.is_shrinking());
        assert!(state.events().contains(&GameEvent::NetHit));

        for _ in 0..90 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert!(state.balls[0].captured);
        assert!(state.balls[0].retired);
        assert_eq!(state.balls_available, before + 1);
    }

    #[test]
    fn test_net_stops_on_peg() {
        let mut state = playing_state();
        state.pegs.push(Peg::new(Vec2::new(300.0, 300.0), PegKind::Normal, 10.0));
        state.spawn_net(Vec2::new(300.0, 320.0), Vec2::new(0.0, -100.0)).unwrap();

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(state.nets[0].out_of_play);
        // Nets do not clear pegs
        assert!(!state.pegs[0].animation.is_shrinking());
    }

    #[test]
    fn test_net_leaves_screen() {
        let mut state = playing_state();
        state.spawn_net(Vec2::new(300.0, -20.0), Vec2::new(0.0, -100.0)).unwrap();
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(state.nets[0].out_of_play);
    }

    #[test]
    fn test_last_ball_slow_motion() {
        let mut state = playing_state();
        state.balls_available = 0;
        state.spawn_ball(Vec2::new(300.0, 100.0), Vec2::ZERO).unwrap();

        tick(&mut state, &TickInput::default(), 0.1);
        let expected = state.tuning.gravity * 0.1 * state.tuning.last_ball_time_scale;
        assert!((state.balls[0].velocity.y - expected).abs() < 1e-3);
    }

    #[test]
    fn test_out_of_balls_message() {
        let mut state = playing_state();
        state.balls_available = 0;
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.message, Some(Message::OutOfBalls));
        assert_eq!(state.screen, Screen::Playing);
    }

    #[test]
    fn test_quit() {
        let mut state = GameState::new(1);
        let input = TickInput {
            quit: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert!(state.quit);
    }

    #[test]
    fn test_score_invariant_over_long_session() {
        let mut state = GameState::new(2024);
        let start = TickInput {
            shoot_ball: true,
            aim: Vec2::new(0.0, -1.0),
            ..Default::default()
        };
        tick(&mut state, &start, SIM_DT);

        for step in 0..120 * 60 {
            let input = if step % 240 == 0 {
                let angle = -0.4 - (step / 240 % 5) as f32 * 0.6;
                TickInput {
                    shoot_ball: true,
                    aim: Vec2::new(angle.cos(), angle.sin()),
                    ..Default::default()
                }
            } else if step % 300 == 150 {
                TickInput {
                    shoot_net: true,
                    aim: Vec2::new(0.0, -1.0),
                    ..Default::default()
                }
            } else {
                TickInput::default()
            };
            tick(&mut state, &input, SIM_DT);

            assert!(state.score <= state.required_peg_count);
            assert_eq!(
                state.screen == Screen::Won,
                state.score == state.required_peg_count
            );
            for ball in &state.balls {
                assert!(!ball.captured || ball.retired);
                assert!(ball.radius >= 0.0);
            }
        }
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = GameState::new(99999);
        let mut state2 = GameState::new(99999);

        let inputs = [
            TickInput {
                shoot_ball: true,
                ..Default::default()
            },
            TickInput {
                shoot_ball: true,
                aim: Vec2::new(0.2, -1.0),
                ..Default::default()
            },
            TickInput {
                shoot_net: true,
                aim: Vec2::new(-0.2, -1.0),
                ..Default::default()
            },
            TickInput::default(),
        ];

        for input in &inputs {
            for _ in 0..30 {
                tick(&mut state1, input, SIM_DT);
                tick(&mut state2, input, SIM_DT);
            }
        }

        assert_eq!(state1.balls.len(), state2.balls.len());
        assert_eq!(state1.score, state2.score);
        for (a, b) in state1.pegs.iter().zip(&state2.pegs) {
            assert_eq!(a.position, b.position);
            assert_eq!(a.kind, b.kind);
        }
        for (a, b) in state1.balls.iter().zip(&state2.balls) {
            assert_eq!(a.position, b.position);
        }
    }
}
