use serde::Serialize;

use crate::api::types::{ArrangementMode, GameOutcome, HitKind, TargetBall};
use crate::rules::scoring::FoulReason;

/// Memory of the current turn. Cleared whenever the cue ball re-anchors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TurnState {
    /// Set once a foul is recorded. Suppresses pocketing points for the rest of the turn.
    pub foul: Option<FoulReason>,
    /// First ball class the cue ball touched this turn.
    pub last_hit: HitKind,
    pub consecutive_colored: u32,
    /// Whether any red was on the table when the first contact happened.
    pub reds_on_table_at_hit: bool,
}

impl TurnState {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_foul(&self) -> bool {
        self.foul.is_some()
    }
}

/// Everything the rules mutate, owned by the turn controller.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct GameState {
    pub mode: Option<ArrangementMode>,
    pub score: i32,
    pub target: TargetBall,
    pub outcome: GameOutcome,
    /// A red dropped and no contact has been judged since.
    pub red_inside: bool,
    pub turn: TurnState,
}

impl GameState {
    pub fn is_over(&self) -> bool {
        self.outcome != GameOutcome::InProgress
    }

    pub fn foul_text(&self) -> &'static str {
        self.turn.foul.map(|r| r.text()).unwrap_or("")
    }
}
