//! Foul and scoring rules.
//!
//! Each tick the turn controller feeds in the first cue-ball contact of the
//! shot (if any) and then every ball that crossed a pocket threshold. Contacts
//! are judged before pocketing, so a foul from the first contact suppresses
//! points for balls that drop in the same tick.

use std::fmt;

use serde::Serialize;

use crate::api::config::GameConfig;
use crate::api::types::{BallKind, BodyHandle, GameOutcome, HitKind, TargetBall};
use crate::core::physics::PhysicsAdapter;
use crate::rules::registry::BallRegistry;
use crate::rules::state::GameState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FoulReason {
    RedOutOfTurn,
    ColoredOutOfTurn,
    TwoColoredPocketed,
    CueLeftField,
}

impl FoulReason {
    pub fn text(self) -> &'static str {
        match self {
            FoulReason::RedOutOfTurn => "red ball hit out of turn",
            FoulReason::ColoredOutOfTurn => "colored ball hit out of turn",
            FoulReason::TwoColoredPocketed => "two subsequent colorful balls fell",
            FoulReason::CueLeftField => "cue ball left the field",
        }
    }
}

impl fmt::Display for FoulReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Outcome of one ball dropping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PocketEvent {
    pub kind: BallKind,
    /// Points added to the score; zero when a foul was active.
    pub awarded: u32,
    pub respotted: bool,
}

fn target_for(reds_on_table: bool) -> TargetBall {
    if reds_on_table {
        TargetBall::Red
    } else {
        TargetBall::Colored
    }
}

// ---------------------------------------------------------------------------
// Contacts
// ---------------------------------------------------------------------------

/// Judge the first ball the cue ball touches this turn. Later contacts are
/// ignored until the next turn.
pub fn evaluate_contacts<P: PhysicsAdapter>(
    state: &mut GameState,
    physics: &P,
    registry: &BallRegistry,
    cue: BodyHandle,
    config: &GameConfig,
) -> Option<FoulReason> {
    if state.turn.last_hit != HitKind::None {
        return None;
    }
    let kind = registry
        .iter()
        .find(|ball| physics.collides(cue, ball.body))
        .map(|ball| ball.kind)?;
    log::debug!("first contact: {:?}", kind);
    apply_hit(state, kind, registry.has_reds(), config.foul_penalty)
}

/// Apply the hit rules for the cue ball striking a ball of `kind`.
pub fn apply_hit(
    state: &mut GameState,
    kind: BallKind,
    reds_on_table: bool,
    penalty: i32,
) -> Option<FoulReason> {
    let turn = &mut state.turn;
    turn.reds_on_table_at_hit = reds_on_table;

    let foul = match kind {
        BallKind::Red if state.red_inside || turn.last_hit == HitKind::Colored => {
            Some(FoulReason::RedOutOfTurn)
        }
        BallKind::Colored(_) if !state.red_inside && reds_on_table => {
            Some(FoulReason::ColoredOutOfTurn)
        }
        _ => None,
    }
    .filter(|_| !turn.is_foul());

    turn.last_hit = HitKind::from(kind);
    state.red_inside = false;
    state.target = target_for(reds_on_table);

    if let Some(reason) = foul {
        apply_penalty(state, reason, penalty);
    }
    foul
}

/// Record a foul and deduct the fixed penalty.
pub fn apply_penalty(state: &mut GameState, reason: FoulReason, penalty: i32) {
    state.turn.foul = Some(reason);
    state.score -= penalty;
    log::info!("foul: {} (-{})", reason, penalty);
}

// ---------------------------------------------------------------------------
// Pocketing
// ---------------------------------------------------------------------------

/// Remove every fallen ball and score it, one at a time, reds first.
pub fn evaluate_pocketing<P: PhysicsAdapter>(
    state: &mut GameState,
    physics: &mut P,
    registry: &mut BallRegistry,
    config: &GameConfig,
) -> Vec<PocketEvent> {
    let fallen = registry.fallen(physics, config);
    let mut events = Vec::with_capacity(fallen.len());

    for ball in fallen {
        if registry.remove(physics, ball.body).is_none() {
            continue;
        }
        let mut respotted = false;
        match ball.kind {
            BallKind::Red => {
                state.red_inside = true;
                state.target = TargetBall::Colored;
            }
            BallKind::Colored(color) => {
                state.turn.consecutive_colored += 1;
                if state.turn.consecutive_colored >= 2 {
                    state.turn.foul = Some(FoulReason::TwoColoredPocketed);
                    log::info!("foul: {}", FoulReason::TwoColoredPocketed);
                }
                if registry.has_reds() {
                    registry.respot(physics, config, color);
                    respotted = true;
                }
                state.target = target_for(registry.has_reds());
                state.red_inside = false;
            }
        }

        let awarded = if state.turn.is_foul() { 0 } else { ball.value };
        state.score += awarded as i32;
        log::info!("pocketed {:?} for {} (score {})", ball.kind, awarded, state.score);
        events.push(PocketEvent {
            kind: ball.kind,
            awarded,
            respotted,
        });

        if registry.is_table_clear() && state.outcome == GameOutcome::InProgress {
            state.outcome = GameOutcome::Won;
            log::info!("table cleared, final score {}", state.score);
        }
    }
    events
}

/// Start a fresh turn: forget the previous shot and let the table settle.
pub fn new_turn<P: PhysicsAdapter>(state: &mut GameState, registry: &BallRegistry, physics: &mut P) {
    state.turn.reset();
    registry.set_all_sleeping(physics, true);
}
