use glam::Vec2;
use serde::Serialize;

use crate::api::types::{ArrangementMode, BallTag, GameOutcome};
use crate::core::physics::PhysicsAdapter;
use crate::game::{GamePhase, SnookerGame};
use crate::rules::modifiers::Modifier;

/// One drawable ball.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BallView {
    pub position: Vec2,
    pub radius: f32,
    pub tag: BallTag,
    pub value: u32,
    pub visible: bool,
}

/// Read-only picture of the game for a renderer or UI layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub balls: Vec<BallView>,
    pub cue: Option<BallView>,
    /// Anchor and cue ball centre while the aiming spring is attached.
    pub anchor_line: Option<[Vec2; 2]>,
    /// Cushion highlight flags, in table order.
    pub cushions: Vec<bool>,
    pub foul: bool,
    pub foul_text: String,
    pub target: String,
    pub score: i32,
    pub remaining_secs: u32,
    pub outcome: GameOutcome,
    pub mode: Option<ArrangementMode>,
    pub phase: GamePhase,
    pub used_modifiers: Vec<Modifier>,
    pub active_modifiers: Vec<Modifier>,
}

impl Snapshot {
    pub fn capture<P: PhysicsAdapter>(game: &SnookerGame<P>) -> Self {
        let physics = game.physics();
        let state = game.state();

        let balls = game
            .registry()
            .iter()
            .map(|ball| BallView {
                position: physics.position(ball.body),
                radius: physics.radius(ball.body),
                tag: BallTag::from(ball.kind),
                value: ball.value,
                visible: true,
            })
            .collect();

        let cue = game.cue().body().map(|body| BallView {
            position: physics.position(body),
            radius: physics.radius(body),
            tag: BallTag::Cue,
            value: 0,
            visible: true,
        });

        Self {
            balls,
            cue,
            anchor_line: game.cue().anchor_line(physics).map(|(a, b)| [a, b]),
            cushions: game.table().highlights(),
            foul: state.turn.is_foul(),
            foul_text: state.foul_text().to_string(),
            target: state.target.label().to_string(),
            score: state.score,
            remaining_secs: game.remaining_secs(),
            outcome: state.outcome,
            mode: state.mode,
            phase: game.phase(),
            used_modifiers: game.modifiers().used(),
            active_modifiers: game.modifiers().active(),
        }
    }

    /// Every ball including the cue ball, cue last.
    pub fn all_balls(&self) -> impl Iterator<Item = &BallView> {
        self.balls.iter().chain(self.cue.iter())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
