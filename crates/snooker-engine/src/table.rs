//! Fixed table geometry: cushions, colour spots, pocket mouths and the zone predicates.

use std::f32::consts::FRAC_PI_2;

use glam::Vec2;

use crate::api::config::GameConfig;
use crate::api::types::{BodyHandle, Color};
use crate::core::physics::{EdgeDesc, PhysicsAdapter};

/// Cushion thickness.
pub const CUSHION_HEIGHT: f32 = 10.0;

/// Centre, length and rotation of the six cushions:
/// top-left, top-right, left, bottom-left, bottom-right, right.
const CUSHIONS: [(Vec2, f32, f32); 6] = [
    (Vec2::new(402.0, 105.0), 342.6, 0.0),
    (Vec2::new(800.0, 105.0), 345.6, 0.0),
    (Vec2::new(205.0, 300.0), 364.6, FRAC_PI_2),
    (Vec2::new(403.0, 495.0), 364.6, 0.0),
    (Vec2::new(797.0, 495.0), 367.6, 0.0),
    (Vec2::new(995.0, 300.0), 343.6, FRAC_PI_2),
];

/// Where the pocket-snap modifier drops balls.
pub const POCKET_MOUTHS: [Vec2; 6] = [
    Vec2::new(220.0, 120.0),
    Vec2::new(600.0, 120.0),
    Vec2::new(980.0, 120.0),
    Vec2::new(220.0, 480.0),
    Vec2::new(600.0, 480.0),
    Vec2::new(980.0, 480.0),
];

/// y of the baulk-line spots (brown, blue, pink, black).
const SPOT_LINE: f32 = 310.0 - 800.0 / 72.0;

/// Fixed spot of each colour. Respotted colours return here.
pub fn spot(color: Color) -> Vec2 {
    match color {
        Color::Yellow => Vec2::new(360.0, 250.0 + 370.0 / 3.0),
        Color::Green => Vec2::new(360.0, 150.0 + 370.0 / 5.0),
        Color::Brown => Vec2::new(360.0, SPOT_LINE),
        Color::Blue => Vec2::new(600.0, SPOT_LINE),
        Color::Pink => Vec2::new(720.0, SPOT_LINE),
        Color::Black => Vec2::new(950.0, SPOT_LINE),
    }
}

/// Apex of the red pyramid and the gap between rows.
pub const PYRAMID_APEX: Vec2 = Vec2::new(725.0, 305.0);
pub const PYRAMID_ROW_GAP: f32 = 4.0;

/// Positions of the 15 reds: row `i` holds `i` balls and sits `i * (r + gap)`
/// to the right of the apex.
pub fn pyramid(radius: f32) -> Vec<Vec2> {
    let mut out = Vec::with_capacity(15);
    for row in 0..6 {
        for j in 0..row {
            out.push(Vec2::new(
                PYRAMID_APEX.x + row as f32 * (radius + PYRAMID_ROW_GAP),
                PYRAMID_APEX.y - row as f32 * radius + 2.0 * j as f32 * radius,
            ));
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Zone predicates
// ---------------------------------------------------------------------------

/// A ball this far up or down has dropped into a pocket.
pub fn crossed_pocket_threshold(config: &GameConfig, pos: Vec2) -> bool {
    pos.y <= config.pocket_top || pos.y >= config.pocket_bottom
}

/// Vertical band the cue ball must stay in while rolling.
pub fn within_field(config: &GameConfig, pos: Vec2) -> bool {
    pos.y >= config.field_top && pos.y <= config.field_bottom
}

/// The D: the half-disc behind the baulk line where the cue ball is placed.
pub fn inside_d(config: &GameConfig, pos: Vec2) -> bool {
    pos.distance(config.d_centre) < config.d_radius && pos.x < config.d_centre.x
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

/// One static cushion and its cosmetic contact flag.
#[derive(Debug, Clone, Copy)]
pub struct Cushion {
    pub body: BodyHandle,
    pub edge: EdgeDesc,
    pub lit: bool,
}

/// The six cushions. Built once and never removed.
#[derive(Debug, Clone)]
pub struct Table {
    cushions: Vec<Cushion>,
}

impl Table {
    pub fn build<P: PhysicsAdapter>(physics: &mut P, config: &GameConfig) -> Self {
        let cushions = CUSHIONS
            .iter()
            .map(|&(centre, length, angle)| {
                let edge = EdgeDesc {
                    centre,
                    half_extents: Vec2::new(length / 2.0, CUSHION_HEIGHT / 2.0),
                    angle,
                    restitution: config.cushion_restitution,
                };
                Cushion {
                    body: physics.create_static_edge(edge),
                    edge,
                    lit: false,
                }
            })
            .collect();
        Self { cushions }
    }

    /// Light every cushion the cue ball is touching, unlight the rest.
    pub fn update_highlights<P: PhysicsAdapter>(&mut self, physics: &P, cue: BodyHandle) {
        for cushion in &mut self.cushions {
            cushion.lit = physics.collides(cue, cushion.body);
        }
    }

    pub fn clear_highlights(&mut self) {
        for cushion in &mut self.cushions {
            cushion.lit = false;
        }
    }

    pub fn cushions(&self) -> &[Cushion] {
        &self.cushions
    }

    pub fn highlights(&self) -> Vec<bool> {
        self.cushions.iter().map(|c| c.lit).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::physics::{BodyProps, CollisionGroup};
    use crate::testing::ScriptedPhysics;

    #[test]
    fn pyramid_has_fifteen_reds_in_five_rows() {
        let reds = pyramid(200.0 / 36.0);
        assert_eq!(reds.len(), 15);
        let mut xs: Vec<i32> = reds.iter().map(|p| p.x.round() as i32).collect();
        xs.dedup();
        assert_eq!(xs.len(), 5);
    }

    #[test]
    fn pyramid_rows_are_symmetric() {
        let r = 200.0 / 36.0;
        let reds = pyramid(r);
        // Row of one ball sits level with the apex minus one radius.
        assert!((reds[0].y - (PYRAMID_APEX.y - r)).abs() < 0.001);
        let last_row = &reds[10..];
        let mean_y: f32 = last_row.iter().map(|p| p.y).sum::<f32>() / 5.0;
        assert!((mean_y - (PYRAMID_APEX.y - r)).abs() < 0.001);
    }

    #[test]
    fn spots_are_distinct_and_on_the_table() {
        let config = GameConfig::default();
        for (i, a) in Color::ALL.iter().enumerate() {
            let pa = spot(*a);
            assert!(within_field(&config, pa));
            assert!(!crossed_pocket_threshold(&config, pa));
            for b in &Color::ALL[i + 1..] {
                assert!(pa.distance(spot(*b)) > 1.0);
            }
        }
    }

    #[test]
    fn green_spot_matches_the_baulk_corner() {
        assert_eq!(spot(Color::Green), Vec2::new(360.0, 224.0));
    }

    #[test]
    fn d_zone_is_the_left_half_disc() {
        let config = GameConfig::default();
        let c = config.d_centre;
        assert!(inside_d(&config, c - Vec2::new(10.0, 0.0)));
        assert!(!inside_d(&config, c + Vec2::new(10.0, 0.0)));
        assert!(!inside_d(&config, c - Vec2::new(80.0, 0.0)));
        assert!(!inside_d(&config, c));
    }

    #[test]
    fn cue_against_right_cushion_lights_only_that_cushion() {
        let config = GameConfig::default();
        let mut physics = ScriptedPhysics::new();
        let mut table = Table::build(&mut physics, &config);
        let props = BodyProps::new(0.9, 0.0, CollisionGroup::Cue);
        let cue = physics.create_circle_body(Vec2::new(986.0, 300.0), config.ball_radius, props);
        physics.add_to_world(cue);

        table.update_highlights(&physics, cue);
        assert_eq!(table.highlights(), vec![false, false, false, false, false, true]);

        physics.set_position(cue, Vec2::new(600.0, 300.0));
        table.update_highlights(&physics, cue);
        assert_eq!(table.highlights(), vec![false; 6]);
    }

    #[test]
    fn pocket_band_edges_are_inclusive() {
        let config = GameConfig::default();
        assert!(crossed_pocket_threshold(&config, Vec2::new(500.0, 106.0)));
        assert!(crossed_pocket_threshold(&config, Vec2::new(500.0, 494.0)));
        assert!(!crossed_pocket_threshold(&config, Vec2::new(500.0, 300.0)));
    }
}
