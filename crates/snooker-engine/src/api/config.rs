use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::api::error::ConfigError;

/// Tunables for a game, provided once at construction.
///
/// Distances are in table units (the table field spans x 200..1000, y 100..500).
/// Velocities are in table units per tick, whatever the physics backend uses internally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Seconds per logical tick (default: 1/60).
    pub fixed_dt: f32,
    /// Ticks that make up one second on the countdown (default: 60).
    pub ticks_per_second: u32,

    /// Radius of every ball, cue ball included.
    pub ball_radius: f32,
    pub ball_restitution: f32,
    pub ball_friction: f32,
    pub cue_restitution: f32,
    pub cue_friction: f32,
    /// Cue mass relative to a standard ball of the same size.
    pub cue_mass_factor: f32,
    pub cushion_restitution: f32,
    /// Per-second linear damping applied by backends that model felt drag.
    pub felt_damping: f32,

    /// Fraction of the anchor displacement the aiming spring corrects per tick.
    pub anchor_stiffness: f32,
    pub anchor_damping: f32,
    /// Ticks between pointer release and the spring letting go of the cue ball.
    pub detach_delay_ticks: u32,
    /// Per-axis cap on the cue ball's velocity after release.
    pub max_axis_speed: f32,
    /// Per-axis speed below which the cue ball counts as resting.
    pub rest_epsilon: f32,
    /// How far from the anchor the cue ball can be pulled while aiming.
    pub max_pull: f32,

    /// Points deducted for a penalised foul.
    pub foul_penalty: i32,

    /// A ball with `y <= pocket_top` has dropped into a top pocket.
    pub pocket_top: f32,
    /// A ball with `y >= pocket_bottom` has dropped into a bottom pocket.
    pub pocket_bottom: f32,
    /// The cue ball is in play while `field_top <= y <= field_bottom`.
    pub field_top: f32,
    pub field_bottom: f32,

    /// Centre of the D's semicircle. Placement also requires `x < d_centre.x`.
    pub d_centre: Vec2,
    pub d_radius: f32,

    /// Length of the countdown in seconds.
    pub time_limit_secs: u32,
    /// Ticks the table keeps moving after a win before the world freezes.
    pub win_settle_ticks: u32,

    /// Seed for scattered layouts and the pocket-snap modifier.
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            ticks_per_second: 60,
            ball_radius: 200.0 / 36.0,
            ball_restitution: 0.4,
            ball_friction: 0.2,
            cue_restitution: 0.7,
            cue_friction: 0.4,
            cue_mass_factor: 2.0,
            cushion_restitution: 1.0,
            felt_damping: 0.6,
            anchor_stiffness: 0.01,
            anchor_damping: 0.0001,
            detach_delay_ticks: 6,
            max_axis_speed: 20.0,
            rest_epsilon: 0.05,
            max_pull: 120.0,
            foul_penalty: 4,
            pocket_top: 106.0,
            pocket_bottom: 494.0,
            field_top: 100.0,
            field_bottom: 490.0,
            d_centre: Vec2::new(350.0, 175.0 + 370.0 / 3.0),
            d_radius: 75.0,
            time_limit_secs: 600,
            win_settle_ticks: 90,
            seed: 42,
        }
    }
}

impl GameConfig {
    /// Parse a (possibly partial) JSON override on top of the defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the rule engine cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fixed_dt > 0.0) {
            return Err(invalid("fixed_dt", "must be positive"));
        }
        if self.ticks_per_second == 0 {
            return Err(invalid("ticks_per_second", "must be at least 1"));
        }
        if !(self.ball_radius > 0.0) {
            return Err(invalid("ball_radius", "must be positive"));
        }
        if self.pocket_top >= self.pocket_bottom {
            return Err(invalid("pocket_top", "must be above pocket_bottom"));
        }
        if self.field_top >= self.field_bottom {
            return Err(invalid("field_top", "must be above field_bottom"));
        }
        if !(self.max_axis_speed > 0.0) {
            return Err(invalid("max_axis_speed", "must be positive"));
        }
        if self.foul_penalty < 0 {
            return Err(invalid("foul_penalty", "must not be negative"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &'static str) -> ConfigError {
    ConfigError::Invalid { field, reason }
}
