use thiserror::Error;

use crate::rules::modifiers::Modifier;

/// Why a player command did not take effect. State is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("no ball arrangement has been selected")]
    NoArrangement,
    #[error("the arrangement is already fixed for this game")]
    AlreadyArranged,
    #[error("the cue ball must be placed inside the D")]
    OutsideD,
    #[error("the cue ball has not been placed")]
    CueNotPlaced,
    #[error("the cue ball is already on the table")]
    CueAlreadyPlaced,
    #[error("the cue ball is not anchored for aiming")]
    NotAiming,
    #[error("a cue release is already in progress")]
    DetachPending,
    #[error("the game is over")]
    GameOver,
    #[error("modifier {0:?} was already used this game")]
    ModifierUsed(Modifier),
    #[error("modifier {0:?} cannot be used right now")]
    ModifierUnavailable(Modifier),
}

/// Failure to load or validate a [`GameConfig`](crate::api::config::GameConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}
