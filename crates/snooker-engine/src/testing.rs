//! Deterministic [`PhysicsAdapter`] for rule tests.
//!
//! Bodies move at constant velocity with a fixed per-step damping, springs pull
//! linearly toward their anchor, and contacts are pure overlap tests with no
//! collision response. Tests place balls exactly where a rule needs them.

use std::collections::BTreeMap;

use glam::Vec2;

use crate::api::types::{BodyHandle, ConstraintHandle};
use crate::core::physics::{BodyProps, EdgeDesc, PhysicsAdapter, PointConstraintDesc};

const DAMPING_PER_STEP: f32 = 0.98;

#[derive(Debug, Clone)]
enum Shape {
    Circle { radius: f32 },
    Edge { half_extents: Vec2, angle: f32 },
}

#[derive(Debug, Clone)]
struct Body {
    pos: Vec2,
    vel: Vec2,
    mass: f32,
    shape: Shape,
    in_world: bool,
    sleeping: bool,
}

#[derive(Debug, Clone, Copy)]
struct Spring {
    anchor: Vec2,
    body: BodyHandle,
    stiffness: f32,
    damping: f32,
}

#[derive(Debug, Default)]
pub struct ScriptedPhysics {
    bodies: BTreeMap<BodyHandle, Body>,
    springs: BTreeMap<ConstraintHandle, Spring>,
    next_body: u32,
    next_constraint: u32,
}

impl ScriptedPhysics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move a body and stop it.
    pub fn teleport(&mut self, body: BodyHandle, pos: Vec2) {
        if let Some(b) = self.bodies.get_mut(&body) {
            b.pos = pos;
            b.vel = Vec2::ZERO;
        }
    }

    /// Bodies currently in the world (cushions included).
    pub fn body_count(&self) -> usize {
        self.bodies.values().filter(|b| b.in_world).count()
    }

    pub fn contains(&self, body: BodyHandle) -> bool {
        self.bodies.get(&body).map(|b| b.in_world).unwrap_or(false)
    }

    pub fn is_sleeping(&self, body: BodyHandle) -> bool {
        self.bodies.get(&body).map(|b| b.sleeping).unwrap_or(false)
    }

    pub fn constraint_count(&self) -> usize {
        self.springs.len()
    }

    fn insert(&mut self, body: Body) -> BodyHandle {
        let handle = BodyHandle(self.next_body);
        self.next_body += 1;
        self.bodies.insert(handle, body);
        handle
    }
}

fn circle_touches_edge(centre: Vec2, radius: f32, edge_pos: Vec2, half: Vec2, angle: f32) -> bool {
    let local = Vec2::from_angle(-angle).rotate(centre - edge_pos);
    local.x.abs() <= half.x + radius && local.y.abs() <= half.y + radius
}

impl PhysicsAdapter for ScriptedPhysics {
    fn create_circle_body(&mut self, position: Vec2, radius: f32, props: BodyProps) -> BodyHandle {
        self.insert(Body {
            pos: position,
            vel: Vec2::ZERO,
            mass: props.mass.unwrap_or(1.0),
            shape: Shape::Circle { radius },
            in_world: false,
            sleeping: props.sleeping,
        })
    }

    fn create_static_edge(&mut self, edge: EdgeDesc) -> BodyHandle {
        self.insert(Body {
            pos: edge.centre,
            vel: Vec2::ZERO,
            mass: 0.0,
            shape: Shape::Edge {
                half_extents: edge.half_extents,
                angle: edge.angle,
            },
            in_world: true,
            sleeping: false,
        })
    }

    fn add_to_world(&mut self, body: BodyHandle) {
        if let Some(b) = self.bodies.get_mut(&body) {
            b.in_world = true;
        }
    }

    fn remove_from_world(&mut self, body: BodyHandle) {
        self.bodies.remove(&body);
        self.springs.retain(|_, s| s.body != body);
    }

    fn step(&mut self) {
        for spring in self.springs.values() {
            if let Some(b) = self.bodies.get_mut(&spring.body) {
                b.vel += (spring.anchor - b.pos) * spring.stiffness - b.vel * spring.damping;
                b.sleeping = false;
            }
        }
        for body in self.bodies.values_mut() {
            if !body.in_world || body.sleeping {
                continue;
            }
            if let Shape::Circle { .. } = body.shape {
                body.pos += body.vel;
                body.vel *= DAMPING_PER_STEP;
            }
        }
    }

    fn position(&self, body: BodyHandle) -> Vec2 {
        self.bodies.get(&body).map(|b| b.pos).unwrap_or(Vec2::ZERO)
    }

    fn velocity(&self, body: BodyHandle) -> Vec2 {
        self.bodies.get(&body).map(|b| b.vel).unwrap_or(Vec2::ZERO)
    }

    fn mass(&self, body: BodyHandle) -> f32 {
        self.bodies.get(&body).map(|b| b.mass).unwrap_or(0.0)
    }

    fn radius(&self, body: BodyHandle) -> f32 {
        match self.bodies.get(&body).map(|b| &b.shape) {
            Some(Shape::Circle { radius }) => *radius,
            Some(Shape::Edge { half_extents, .. }) => half_extents.min_element(),
            None => 0.0,
        }
    }

    fn set_velocity(&mut self, body: BodyHandle, velocity: Vec2) {
        if let Some(b) = self.bodies.get_mut(&body) {
            b.vel = velocity;
        }
    }

    fn set_mass(&mut self, body: BodyHandle, mass: f32) {
        if let Some(b) = self.bodies.get_mut(&body) {
            b.mass = mass;
        }
    }

    fn set_position(&mut self, body: BodyHandle, position: Vec2) {
        if let Some(b) = self.bodies.get_mut(&body) {
            b.pos = position;
        }
    }

    fn scale(&mut self, body: BodyHandle, sx: f32, sy: f32) {
        if let Some(b) = self.bodies.get_mut(&body) {
            match &mut b.shape {
                Shape::Circle { radius } => *radius *= sx,
                Shape::Edge { half_extents, .. } => *half_extents *= Vec2::new(sx, sy),
            }
        }
    }

    fn set_sleeping(&mut self, body: BodyHandle, sleeping: bool) {
        if let Some(b) = self.bodies.get_mut(&body) {
            b.sleeping = sleeping;
        }
    }

    fn collides(&self, a: BodyHandle, b: BodyHandle) -> bool {
        let (Some(a), Some(b)) = (self.bodies.get(&a), self.bodies.get(&b)) else {
            return false;
        };
        if !a.in_world || !b.in_world {
            return false;
        }
        match (&a.shape, &b.shape) {
            (Shape::Circle { radius: ra }, Shape::Circle { radius: rb }) => {
                a.pos.distance(b.pos) <= ra + rb
            }
            (Shape::Circle { radius }, Shape::Edge { half_extents, angle }) => {
                circle_touches_edge(a.pos, *radius, b.pos, *half_extents, *angle)
            }
            (Shape::Edge { half_extents, angle }, Shape::Circle { radius }) => {
                circle_touches_edge(b.pos, *radius, a.pos, *half_extents, *angle)
            }
            (Shape::Edge { .. }, Shape::Edge { .. }) => false,
        }
    }

    fn create_point_constraint(&mut self, desc: PointConstraintDesc) -> ConstraintHandle {
        let handle = ConstraintHandle(self.next_constraint);
        self.next_constraint += 1;
        self.springs.insert(
            handle,
            Spring {
                anchor: desc.anchor,
                body: desc.body,
                stiffness: desc.stiffness,
                damping: desc.damping,
            },
        );
        handle
    }

    fn destroy_constraint(&mut self, constraint: ConstraintHandle) {
        self.springs.remove(&constraint);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::physics::CollisionGroup;

    fn props() -> BodyProps {
        BodyProps::new(0.4, 0.2, CollisionGroup::Object)
    }

    #[test]
    fn bodies_only_move_once_added() {
        let mut physics = ScriptedPhysics::new();
        let body = physics.create_circle_body(Vec2::ZERO, 5.0, props());
        physics.set_velocity(body, Vec2::new(1.0, 0.0));
        physics.step();
        assert_eq!(physics.position(body), Vec2::ZERO);
        physics.add_to_world(body);
        physics.step();
        assert_eq!(physics.position(body), Vec2::new(1.0, 0.0));
    }

    #[test]
    fn rotated_edge_contact() {
        let mut physics = ScriptedPhysics::new();
        let edge = physics.create_static_edge(EdgeDesc {
            centre: Vec2::new(205.0, 300.0),
            half_extents: Vec2::new(180.0, 5.0),
            angle: std::f32::consts::FRAC_PI_2,
            restitution: 1.0,
        });
        let ball = physics.create_circle_body(Vec2::new(214.0, 400.0), 5.0, props());
        physics.add_to_world(ball);
        assert!(physics.collides(ball, edge));
        physics.teleport(ball, Vec2::new(230.0, 400.0));
        assert!(!physics.collides(edge, ball));
    }
}
