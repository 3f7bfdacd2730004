//! Special peg effects
//!
//! A special peg fires its effect the first time a ball touches it. The
//! `special_claimed` flag on the peg guarantees it never fires twice.

use super::rules::{Message, show_message};
use super::state::{GameEvent, GameState, SpecialKind};

/// Fire the special effect of `peg_index`, struck by `ball_index`
///
/// Returns the kind that fired, or `None` if the peg is not special or was
/// already claimed.
pub fn trigger_special(
    state: &mut GameState,
    peg_index: usize,
    ball_index: usize,
) -> Option<SpecialKind> {
    let kind = state.pegs.get(peg_index)?.unclaimed_special()?;
    state.pegs[peg_index].special_claimed = true;

    log::debug!("Special peg {} fired {:?}", peg_index, kind);
    state.push_event(GameEvent::SpecialTriggered(kind));

    match kind {
        SpecialKind::ExtraBall => {
            state.balls_available += 1;
            show_message(state, Message::ExtraBall);
        }
        SpecialKind::RandomClear => {
            let duration = state.tuning.peg_shrink_duration;
            let target = state
                .pegs
                .iter_mut()
                .find(|p| p.is_required() && !p.hit && !p.animation.is_shrinking());
            if let Some(peg) = target {
                peg.animation.start_shrink(duration);
                show_message(state, Message::FreePeg);
            }
        }
        SpecialKind::DuplicateBall => {
            if let Some(ball) = state.balls.get(ball_index) {
                let position = ball.position;
                let velocity = ball.velocity * state.tuning.duplicate_velocity_scale;
                match state.spawn_ball(position, velocity) {
                    Ok(_) => show_message(state, Message::Multiball),
                    Err(e) => log::warn!("Multiball skipped: {e}"),
                }
            }
        }
    }

    Some(kind)
}
