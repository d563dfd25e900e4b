use std::collections::BTreeSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::api::error::CommandError;
use crate::api::types::{BallKind, BodyHandle};
use crate::core::physics::PhysicsAdapter;
use crate::core::rng::Rng;
use crate::rules::registry::BallRegistry;
use crate::table::POCKET_MOUTHS;

const JUMBO_FACTOR: f32 = 5.0;
const SHRINK_FACTOR: f32 = 2.0 / 3.0;
const TRIPLE_FACTOR: u32 = 3;
const SNAP_CHANCE_RED: f32 = 0.3;
const SNAP_CHANCE_COLOURED: f32 = 0.5;

/// One-shot power-ups. Each can be used once per game and lasts until the
/// cue ball comes to rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modifier {
    JumboCue,
    ShrinkBalls,
    TriplePoints,
    ToThePockets,
}

impl Modifier {
    pub const ALL: [Modifier; 4] = [
        Modifier::JumboCue,
        Modifier::ShrinkBalls,
        Modifier::TriplePoints,
        Modifier::ToThePockets,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Modifier::JumboCue => "JUMBO BALL",
            Modifier::ShrinkBalls => "SHRINK",
            Modifier::TriplePoints => "3X POINTS",
            Modifier::ToThePockets => "TO THE POCKETS",
        }
    }

    /// Button index as laid out in the UI.
    pub fn from_index(index: u32) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }
}

/// Which modifiers have been spent and which are in effect right now.
#[derive(Debug, Default)]
pub struct Modifiers {
    used: BTreeSet<Modifier>,
    active: BTreeSet<Modifier>,
    /// Bodies scaled down by `ShrinkBalls`. Respotted balls are new bodies and stay full size.
    shrunk: Vec<BodyHandle>,
    jumbo: Option<BodyHandle>,
}

impl Modifiers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `modifier` to the table. Needs a cue ball on the table.
    pub fn activate<P: PhysicsAdapter>(
        &mut self,
        modifier: Modifier,
        physics: &mut P,
        registry: &mut BallRegistry,
        cue: Option<BodyHandle>,
        rng: &mut Rng,
    ) -> Result<(), CommandError> {
        if self.used.contains(&modifier) {
            return Err(CommandError::ModifierUsed(modifier));
        }
        let cue = cue.ok_or(CommandError::ModifierUnavailable(modifier))?;

        match modifier {
            Modifier::JumboCue => {
                let mass = physics.mass(cue);
                physics.set_mass(cue, mass * JUMBO_FACTOR);
                self.jumbo = Some(cue);
            }
            Modifier::ShrinkBalls => {
                for ball in registry.iter() {
                    physics.scale(ball.body, SHRINK_FACTOR, SHRINK_FACTOR);
                    self.shrunk.push(ball.body);
                }
            }
            Modifier::TriplePoints => {
                for ball in registry.iter_mut() {
                    ball.value *= TRIPLE_FACTOR;
                }
            }
            Modifier::ToThePockets => {
                let mut mouths = POCKET_MOUTHS.iter();
                for ball in registry.iter() {
                    let chance = match ball.kind {
                        BallKind::Red => SNAP_CHANCE_RED,
                        BallKind::Colored(_) => SNAP_CHANCE_COLOURED,
                    };
                    if !rng.chance(chance) {
                        continue;
                    }
                    let Some(&mouth) = mouths.next() else {
                        break;
                    };
                    physics.set_position(ball.body, mouth);
                    physics.set_velocity(ball.body, Vec2::ZERO);
                }
            }
        }

        self.used.insert(modifier);
        self.active.insert(modifier);
        log::info!("modifier on: {}", modifier.title());
        Ok(())
    }

    /// Undo every active modifier. Used ones stay used.
    pub fn deactivate_all<P: PhysicsAdapter>(&mut self, physics: &mut P, registry: &mut BallRegistry) {
        for modifier in std::mem::take(&mut self.active) {
            match modifier {
                Modifier::JumboCue => {
                    if let Some(cue) = self.jumbo.take() {
                        let mass = physics.mass(cue);
                        physics.set_mass(cue, mass / JUMBO_FACTOR);
                    }
                }
                Modifier::ShrinkBalls => {
                    for body in self.shrunk.drain(..) {
                        physics.scale(body, 1.0 / SHRINK_FACTOR, 1.0 / SHRINK_FACTOR);
                    }
                }
                Modifier::TriplePoints => {
                    for ball in registry.iter_mut() {
                        ball.value = ball.kind.base_value();
                    }
                }
                Modifier::ToThePockets => {}
            }
            log::debug!("modifier off: {}", modifier.title());
        }
    }

    /// Forget everything, as on restart. Bodies are assumed gone.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_used(&self, modifier: Modifier) -> bool {
        self.used.contains(&modifier)
    }

    pub fn is_active(&self, modifier: Modifier) -> bool {
        self.active.contains(&modifier)
    }

    pub fn used(&self) -> Vec<Modifier> {
        self.used.iter().copied().collect()
    }

    pub fn active(&self) -> Vec<Modifier> {
        self.active.iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::config::GameConfig;
    use crate::api::types::{ArrangementMode, Color};
    use crate::core::physics::{BodyProps, CollisionGroup};
    use crate::testing::ScriptedPhysics;

    struct Fixture {
        physics: ScriptedPhysics,
        registry: BallRegistry,
        cue: BodyHandle,
        rng: Rng,
        modifiers: Modifiers,
    }

    fn fixture() -> Fixture {
        let mut physics = ScriptedPhysics::new();
        let config = GameConfig::default();
        let mut rng = Rng::new(42);
        let mut registry = BallRegistry::new();
        registry.arrange(&mut physics, &config, ArrangementMode::Ordered, &mut rng);
        let cue = physics.create_circle_body(
            Vec2::new(330.0, 300.0),
            config.ball_radius,
            BodyProps::new(0.7, 0.4, CollisionGroup::Cue).with_mass(2.0),
        );
        physics.add_to_world(cue);
        Fixture {
            physics,
            registry,
            cue,
            rng,
            modifiers: Modifiers::new(),
        }
    }

    impl Fixture {
        fn activate(&mut self, modifier: Modifier) -> Result<(), CommandError> {
            self.modifiers.activate(
                modifier,
                &mut self.physics,
                &mut self.registry,
                Some(self.cue),
                &mut self.rng,
            )
        }

        fn deactivate(&mut self) {
            self.modifiers.deactivate_all(&mut self.physics, &mut self.registry);
        }
    }

    #[test]
    fn jumbo_cue_round_trips_mass() {
        let mut f = fixture();
        f.activate(Modifier::JumboCue).unwrap();
        assert!((f.physics.mass(f.cue) - 10.0).abs() < 0.001);
        f.deactivate();
        assert!((f.physics.mass(f.cue) - 2.0).abs() < 0.001);
        assert!(!f.modifiers.is_active(Modifier::JumboCue));
        assert!(f.modifiers.is_used(Modifier::JumboCue));
    }

    #[test]
    fn each_modifier_is_single_use() {
        let mut f = fixture();
        f.activate(Modifier::TriplePoints).unwrap();
        f.deactivate();
        assert_eq!(
            f.activate(Modifier::TriplePoints),
            Err(CommandError::ModifierUsed(Modifier::TriplePoints))
        );
    }

    #[test]
    fn needs_a_cue_ball() {
        let mut f = fixture();
        let result = f.modifiers.activate(
            Modifier::ShrinkBalls,
            &mut f.physics,
            &mut f.registry,
            None,
            &mut f.rng,
        );
        assert_eq!(result, Err(CommandError::ModifierUnavailable(Modifier::ShrinkBalls)));
        assert!(!f.modifiers.is_used(Modifier::ShrinkBalls));
    }

    #[test]
    fn triple_points_then_restore_base_values() {
        let mut f = fixture();
        f.activate(Modifier::TriplePoints).unwrap();
        assert_eq!(f.registry.colored(Color::Black).unwrap().value, 21);
        assert!(f.registry.iter().filter(|b| b.kind.is_red()).all(|b| b.value == 3));
        f.deactivate();
        assert_eq!(f.registry.colored(Color::Black).unwrap().value, 7);
        assert!(f.registry.iter().all(|b| b.value == b.kind.base_value()));
    }

    #[test]
    fn shrink_and_grow_back() {
        let mut f = fixture();
        let r = f.physics.radius(f.registry.iter().next().unwrap().body);
        f.activate(Modifier::ShrinkBalls).unwrap();
        assert!(f
            .registry
            .iter()
            .all(|b| (f.physics.radius(b.body) - r * 2.0 / 3.0).abs() < 0.001));
        // Cue ball is untouched.
        assert!((f.physics.radius(f.cue) - r).abs() < 0.001);
        f.deactivate();
        assert!(f.registry.iter().all(|b| (f.physics.radius(b.body) - r).abs() < 0.001));
    }

    #[test]
    fn to_the_pockets_moves_at_most_six() {
        let mut f = fixture();
        f.activate(Modifier::ToThePockets).unwrap();
        let moved: Vec<Vec2> = f
            .registry
            .iter()
            .map(|b| f.physics.position(b.body))
            .filter(|p| POCKET_MOUTHS.contains(p))
            .collect();
        assert!(!moved.is_empty());
        assert!(moved.len() <= 6);
        for (i, a) in moved.iter().enumerate() {
            assert!(!moved[i + 1..].contains(a), "two balls share a mouth");
        }
    }

    #[test]
    fn reset_forgets_usage() {
        let mut f = fixture();
        f.activate(Modifier::JumboCue).unwrap();
        f.modifiers.reset();
        assert!(f.modifiers.used().is_empty());
        assert!(f.modifiers.active().is_empty());
        assert_eq!(Modifier::from_index(3), Some(Modifier::ToThePockets));
        assert_eq!(Modifier::from_index(4), None);
    }
}
