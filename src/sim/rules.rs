//! Game rules: screens, scoring, win/lose, messages and the net cooldown

use serde::{Deserialize, Serialize};

use super::animation::countdown_elapsed;
use super::state::{GameEvent, GameState, PegKind, Screen};
use super::tick::reset;

/// Banner shown over the playfield for a short time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Message {
    ExtraBall,
    FreePeg,
    Multiball,
    NetReady,
    OutOfBalls,
}

impl Message {
    pub fn text(&self) -> &'static str {
        match self {
            Message::ExtraBall => "Extra ball",
            Message::FreePeg => "Free peg",
            Message::Multiball => "Multiball",
            Message::NetReady => "Net ready",
            Message::OutOfBalls => "Out of balls",
        }
    }
}

/// Show a message, replacing whatever is on screen and restarting its timer
pub fn show_message(state: &mut GameState, message: Message) {
    state.message = Some(message);
    state.message_remaining = state.tuning.message_duration;
}

/// Count down the visible message and clear it when its time is up
pub fn update_message(state: &mut GameState, dt: f32) {
    if state.message.is_none() {
        return;
    }
    state.message_remaining -= dt;
    if state.message_remaining <= 0.0 {
        state.message = None;
        state.message_remaining = 0.0;
    }
}

/// Mark the net as spent and start recharging it
pub fn start_net_cooldown(state: &mut GameState) {
    state.net_available = false;
    state.net_cooldown_remaining = state.tuning.net_cooldown;
    state.launcher.net_cooldown_visible_radius = 0.0;
}

/// Recharge the net; announces when it is ready again
pub fn update_net_cooldown(state: &mut GameState, dt: f32) {
    if state.net_available {
        return;
    }

    state.net_cooldown_remaining -= dt;
    if countdown_elapsed(state.net_cooldown_remaining, state.tuning.net_cooldown) {
        state.net_cooldown_remaining = 0.0;
        state.net_available = true;
        state.launcher.net_cooldown_visible_radius = state.launcher.radius;
        show_message(state, Message::NetReady);
        state.push_event(GameEvent::NetReady);
        return;
    }

    let total = state.tuning.net_cooldown;
    let progress = if total > 0.0 {
        1.0 - state.net_cooldown_remaining / total
    } else {
        1.0
    };
    state.launcher.net_cooldown_visible_radius = state.launcher.radius * progress.clamp(0.0, 1.0);
}

/// Book-keeping for a peg whose shrink animation just completed
pub fn credit_cleared_peg(state: &mut GameState, kind: PegKind) {
    if kind == PegKind::Required && state.score < state.required_peg_count {
        state.score += 1;
    }
    state.push_event(GameEvent::PegCleared(kind));
}

/// Playing → Won once every required peg is cleared
pub fn check_win(state: &mut GameState) -> bool {
    if state.screen != Screen::Playing || state.score != state.required_peg_count {
        return false;
    }
    state.screen = Screen::Won;
    state.push_event(GameEvent::GameWon);
    log::info!(
        "Round won: {}/{} required pegs cleared",
        state.score,
        state.required_peg_count
    );
    true
}

/// No balls in hand and none in play: show the lose banner
///
/// The banner is held for as long as the condition lasts. The screen does not
/// change; the player resets manually.
pub fn check_lose(state: &mut GameState) -> bool {
    if state.screen != Screen::Playing || state.balls_available > 0 || state.has_live_ball() {
        return false;
    }
    show_message(state, Message::OutOfBalls);
    if !state.round_lost {
        state.round_lost = true;
        state.push_event(GameEvent::GameLost);
        log::info!(
            "Round lost with {}/{} required pegs cleared",
            state.score,
            state.required_peg_count
        );
    }
    true
}

/// Apply screen-changing intents. Returns true when the rest of the tick
/// should be skipped (quit, or no round is running).
pub fn handle_screen_intents(state: &mut GameState) -> bool {
    if state.input.quit {
        state.quit = true;
        log::info!("Quit requested");
        return true;
    }

    match state.screen {
        Screen::Start => {
            if state.input.shoot_ball {
                reset(state);
                set_screen(state, Screen::Playing);
                state.push_event(GameEvent::GameStart);
                // Swallow the click that started the round
                state.input.shoot_ball = false;
                state.input.shoot_net = false;
            } else if state.input.reset {
                reset(state);
            }
            state.screen != Screen::Playing
        }
        Screen::Playing => {
            if state.input.cancel {
                set_screen(state, Screen::Start);
                return true;
            }
            if state.input.reset {
                reset(state);
            }
            false
        }
        Screen::Won => {
            if state.input.cancel {
                set_screen(state, Screen::Start);
            } else if state.input.reset {
                reset(state);
                set_screen(state, Screen::Playing);
                state.push_event(GameEvent::GameStart);
            }
            true
        }
    }
}

fn set_screen(state: &mut GameState, screen: Screen) {
    if state.screen != screen {
        log::info!("Screen {:?} -> {:?}", state.screen, screen);
        state.screen = screen;
    }
}
