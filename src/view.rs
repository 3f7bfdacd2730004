//! Read-only snapshot of the game for the renderer
//!
//! The renderer never touches [`GameState`] directly. After each update the
//! frame loop captures a [`RenderView`]: live entities in storage order with
//! their colours already chosen.

use serde::{Deserialize, Serialize};

use crate::sim::{GameState, PegKind, Screen};

/// 8-bit RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const BLUE: Rgb = Rgb(40, 110, 255);
    pub const ORANGE: Rgb = Rgb(255, 140, 0);
    pub const GREEN: Rgb = Rgb(40, 200, 80);
    pub const PURPLE: Rgb = Rgb(170, 90, 220);
    pub const YELLOW: Rgb = Rgb(250, 220, 60);
}

/// Colour for a peg
///
/// Normal pegs are blue, required ones orange, specials green until their
/// bonus is spent and purple after.
pub fn peg_color(kind: PegKind, special_claimed: bool) -> Rgb {
    match kind {
        PegKind::Normal => Rgb::BLUE,
        PegKind::Required => Rgb::ORANGE,
        PegKind::Special(_) if special_claimed => Rgb::PURPLE,
        PegKind::Special(_) => Rgb::GREEN,
    }
}

/// A filled circle to draw
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CircleView {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub color: Rgb,
}

/// Launcher body plus the net recharge ring
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LauncherView {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub cooldown_radius: f32,
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderView {
    pub screen: Screen,
    pub balls: Vec<CircleView>,
    pub pegs: Vec<CircleView>,
    pub nets: Vec<CircleView>,
    pub launcher: LauncherView,
    pub score: u32,
    pub required: u32,
    pub balls_available: u32,
    pub net_available: bool,
    pub message: Option<&'static str>,
}

impl RenderView {
    pub fn capture(state: &GameState) -> Self {
        let balls = state
            .balls
            .iter()
            .filter(|b| !b.retired)
            .map(|b| CircleView {
                x: b.position.x,
                y: b.position.y,
                radius: b.radius,
                color: Rgb::WHITE,
            })
            .collect();

        let pegs = state
            .pegs
            .iter()
            .filter(|p| !p.hit)
            .map(|p| CircleView {
                x: p.position.x,
                y: p.position.y,
                radius: p.radius,
                color: peg_color(p.kind, p.special_claimed),
            })
            .collect();

        let nets = state
            .nets
            .iter()
            .filter(|n| !n.out_of_play)
            .map(|n| CircleView {
                x: n.position.x,
                y: n.position.y,
                radius: n.radius,
                color: Rgb::YELLOW,
            })
            .collect();

        Self {
            screen: state.screen,
            balls,
            pegs,
            nets,
            launcher: LauncherView {
                x: state.launcher.position.x,
                y: state.launcher.position.y,
                radius: state.launcher.radius,
                cooldown_radius: state.launcher.net_cooldown_visible_radius,
            },
            score: state.score,
            required: state.required_peg_count,
            balls_available: state.balls_available,
            net_available: state.net_available,
            message: state.message.map(|m| m.text()),
        }
    }

    /// Headline text for the current screen
    pub fn title(&self) -> &'static str {
        match self.screen {
            Screen::Start => "Click to start",
            Screen::Playing => "",
            Screen::Won => "You win! Press R to play again",
        }
    }
}
