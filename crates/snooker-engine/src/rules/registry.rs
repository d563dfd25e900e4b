use std::collections::BTreeMap;
use std::f32::consts::PI;

use glam::Vec2;

use crate::api::config::GameConfig;
use crate::api::types::{ArrangementMode, BallKind, BodyHandle, Color};
use crate::core::physics::{BodyProps, CollisionGroup, PhysicsAdapter};
use crate::core::rng::{NoiseField, Rng};
use crate::table;

/// Mass per unit area shared by every ball.
pub const BALL_DENSITY: f32 = 0.001;

/// Mass of a standard ball of the given radius.
pub fn ball_mass(radius: f32) -> f32 {
    PI * radius * radius * BALL_DENSITY
}

/// Unordered layout: every ball lands uniformly in this box.
const SCATTER_MIN: Vec2 = Vec2::new(249.0, 149.0);
const SCATTER_MAX: Vec2 = Vec2::new(949.0, 399.0);

/// Partial layout: reds are mapped from noise into this box.
const NOISE_MIN: Vec2 = Vec2::new(300.0, 150.0);
const NOISE_MAX: Vec2 = Vec2::new(900.0, 380.0);
const NOISE_STEP: f32 = 0.1;
const NOISE_Y_OFFSET: f32 = 1000.0;

const RED_COUNT: usize = 15;

/// A live ball on the table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ball {
    pub kind: BallKind,
    /// Points for pocketing it. Starts at the kind's base value.
    pub value: u32,
    pub body: BodyHandle,
}

/// Owner of every object ball.
///
/// Reds are fungible and kept in a list, colours are keyed so they can be
/// respotted by name. A ball is on the table exactly while it is a member of
/// one of the two collections.
#[derive(Debug, Default)]
pub struct BallRegistry {
    reds: Vec<Ball>,
    colored: BTreeMap<Color, Ball>,
}

impl BallRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Populate the table for `mode`. Any balls already present are removed first.
    pub fn arrange<P: PhysicsAdapter>(
        &mut self,
        physics: &mut P,
        config: &GameConfig,
        mode: ArrangementMode,
        rng: &mut Rng,
    ) {
        self.clear(physics);
        match mode {
            ArrangementMode::Ordered => {
                for pos in table::pyramid(config.ball_radius) {
                    self.spawn(physics, config, pos, BallKind::Red, 1);
                }
                self.spawn_colours_on_spots(physics, config);
            }
            ArrangementMode::Unordered => {
                let kinds = std::iter::repeat(BallKind::Red)
                    .take(RED_COUNT)
                    .chain(Color::ALL.iter().map(|&c| BallKind::Colored(c)));
                for kind in kinds {
                    let pos = Vec2::new(
                        rng.range(SCATTER_MIN.x, SCATTER_MAX.x),
                        rng.range(SCATTER_MIN.y, SCATTER_MAX.y),
                    );
                    let body = self.spawn(physics, config, pos, kind, kind.base_value());
                    // Awake, so the solver can push it clear of anything it landed on.
                    physics.set_sleeping(body, false);
                }
            }
            ArrangementMode::Partial => {
                let noise = NoiseField::new(rng);
                for i in 0..RED_COUNT {
                    let t = i as f32 * NOISE_STEP;
                    let pos = NOISE_MIN + (NOISE_MAX - NOISE_MIN)
                        * Vec2::new(noise.sample(t), noise.sample(t + NOISE_Y_OFFSET));
                    let body = self.spawn(physics, config, pos, BallKind::Red, 1);
                    physics.set_sleeping(body, false);
                }
                self.spawn_colours_on_spots(physics, config);
            }
        }
        log::info!(
            "arranged {} table: {} reds, {} colours",
            mode.as_str(),
            self.reds.len(),
            self.colored.len()
        );
    }

    fn spawn_colours_on_spots<P: PhysicsAdapter>(&mut self, physics: &mut P, config: &GameConfig) {
        for color in Color::ALL {
            let kind = BallKind::Colored(color);
            self.spawn(physics, config, table::spot(color), kind, kind.base_value());
        }
    }

    /// Create one ball, add its body to the world and register it.
    /// Spawning a colour that is already on the table replaces it.
    pub fn spawn<P: PhysicsAdapter>(
        &mut self,
        physics: &mut P,
        config: &GameConfig,
        pos: Vec2,
        kind: BallKind,
        value: u32,
    ) -> BodyHandle {
        let props = BodyProps::new(config.ball_restitution, config.ball_friction, CollisionGroup::Object)
            .with_mass(ball_mass(config.ball_radius));
        let body = physics.create_circle_body(pos, config.ball_radius, props);
        physics.add_to_world(body);

        let ball = Ball { kind, value, body };
        match kind {
            BallKind::Red => self.reds.push(ball),
            BallKind::Colored(color) => {
                if let Some(old) = self.colored.insert(color, ball) {
                    physics.remove_from_world(old.body);
                }
            }
        }
        body
    }

    /// Delete a ball's body and drop it from its collection.
    /// Unknown handles are ignored.
    pub fn remove<P: PhysicsAdapter>(&mut self, physics: &mut P, body: BodyHandle) -> Option<Ball> {
        let ball = if let Some(i) = self.reds.iter().position(|b| b.body == body) {
            self.reds.remove(i)
        } else {
            let color = self
                .colored
                .iter()
                .find(|(_, b)| b.body == body)
                .map(|(c, _)| *c)?;
            self.colored.remove(&color)?
        };
        physics.remove_from_world(ball.body);
        Some(ball)
    }

    /// Put a pocketed colour back on its spot at its base value.
    pub fn respot<P: PhysicsAdapter>(
        &mut self,
        physics: &mut P,
        config: &GameConfig,
        color: Color,
    ) -> BodyHandle {
        let kind = BallKind::Colored(color);
        let body = self.spawn(physics, config, table::spot(color), kind, kind.base_value());
        log::debug!("respotted {}", color.name());
        body
    }

    pub fn set_all_sleeping<P: PhysicsAdapter>(&self, physics: &mut P, sleeping: bool) {
        for ball in self.iter() {
            physics.set_sleeping(ball.body, sleeping);
        }
    }

    /// Balls whose position has crossed a pocket threshold, reds first then
    /// colours in declaration order.
    pub fn fallen<P: PhysicsAdapter>(&self, physics: &P, config: &GameConfig) -> Vec<Ball> {
        self.iter()
            .filter(|b| table::crossed_pocket_threshold(config, physics.position(b.body)))
            .copied()
            .collect()
    }

    /// Remove every ball.
    pub fn clear<P: PhysicsAdapter>(&mut self, physics: &mut P) {
        for ball in self.reds.drain(..) {
            physics.remove_from_world(ball.body);
        }
        for (_, ball) in std::mem::take(&mut self.colored) {
            physics.remove_from_world(ball.body);
        }
    }

    pub fn is_table_clear(&self) -> bool {
        self.reds.is_empty() && self.colored.is_empty()
    }

    pub fn has_reds(&self) -> bool {
        !self.reds.is_empty()
    }

    pub fn red_count(&self) -> usize {
        self.reds.len()
    }

    pub fn colored(&self, color: Color) -> Option<&Ball> {
        self.colored.get(&color)
    }

    pub fn colored_count(&self) -> usize {
        self.colored.len()
    }

    pub fn len(&self) -> usize {
        self.reds.len() + self.colored.len()
    }

    pub fn is_empty(&self) -> bool {
        self.is_table_clear()
    }

    /// Reds, then colours yellow to black.
    pub fn iter(&self) -> impl Iterator<Item = &Ball> {
        self.reds.iter().chain(self.colored.values())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Ball> {
        self.reds.iter_mut().chain(self.colored.values_mut())
    }
}
