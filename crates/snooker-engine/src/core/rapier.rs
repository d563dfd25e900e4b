use std::collections::HashMap;

use glam::Vec2;
use rapier2d::prelude::*;

use crate::api::types::{BodyHandle, ConstraintHandle};
use crate::core::physics::{
    BodyProps, CollisionGroup, EdgeDesc, PhysicsAdapter, PointConstraintDesc,
};

// ---------------------------------------------------------------------------
// Conversion helpers (private) — glam ↔ nalgebra
// ---------------------------------------------------------------------------

fn vec2_to_na(v: Vec2) -> nalgebra::Vector2<f32> {
    nalgebra::Vector2::new(v.x, v.y)
}

fn na_to_vec2(v: &nalgebra::Vector2<f32>) -> Vec2 {
    Vec2::new(v.x, v.y)
}

fn interaction_groups(group: CollisionGroup) -> InteractionGroups {
    let membership = match group {
        CollisionGroup::Cue => Group::GROUP_1,
        CollisionGroup::Object => Group::GROUP_2,
        CollisionGroup::Cushion => Group::GROUP_3,
    };
    InteractionGroups::new(membership, Group::ALL)
}

// ---------------------------------------------------------------------------
// Handle bookkeeping
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
struct BodyEntry {
    body: RigidBodyHandle,
    collider: ColliderHandle,
    radius: f32,
}

#[derive(Debug, Clone, Copy)]
struct ConstraintEntry {
    joint: ImpulseJointHandle,
    /// Fixed body the spring is pinned to.
    anchor: RigidBodyHandle,
}

// ---------------------------------------------------------------------------
// RapierWorld
// ---------------------------------------------------------------------------

/// [`PhysicsAdapter`] backed by Rapier2D.
///
/// Zero gravity (the table is seen from above). Felt drag is modelled as
/// linear damping on every circle body. Velocities cross the trait boundary in
/// units per tick and are converted to Rapier's units per second internally.
pub struct RapierWorld {
    gravity: nalgebra::Vector2<f32>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    entries: HashMap<BodyHandle, BodyEntry>,
    constraints: HashMap<ConstraintHandle, ConstraintEntry>,
    next_body: u32,
    next_constraint: u32,
    linear_damping: f32,
}

impl RapierWorld {
    /// Create an empty world stepping `dt` seconds per tick.
    pub fn new(dt: f32, linear_damping: f32) -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.dt = dt;
        Self {
            gravity: nalgebra::Vector2::zeros(),
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            entries: HashMap::new(),
            constraints: HashMap::new(),
            next_body: 0,
            next_constraint: 0,
            linear_damping,
        }
    }

    fn dt(&self) -> f32 {
        self.integration_parameters.dt
    }

    fn allocate_body(&mut self, entry: BodyEntry) -> BodyHandle {
        let handle = BodyHandle(self.next_body);
        self.next_body += 1;
        self.entries.insert(handle, entry);
        handle
    }

    fn rigid_body(&self, body: BodyHandle) -> Option<&RigidBody> {
        let entry = self.entries.get(&body)?;
        self.bodies.get(entry.body)
    }

    fn rigid_body_mut(&mut self, body: BodyHandle) -> Option<&mut RigidBody> {
        let entry = self.entries.get(&body)?;
        self.bodies.get_mut(entry.body)
    }

    /// Number of live bodies, including constraint anchors.
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Number of live constraints.
    pub fn constraint_count(&self) -> usize {
        self.impulse_joints.len()
    }

    pub fn is_sleeping(&self, body: BodyHandle) -> bool {
        self.rigid_body(body).map(|rb| rb.is_sleeping()).unwrap_or(false)
    }

    fn remove_rigid_body(&mut self, handle: RigidBodyHandle) {
        self.bodies.remove(
            handle,
            &mut self.island_manager,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
    }
}

impl PhysicsAdapter for RapierWorld {
    fn create_circle_body(&mut self, position: Vec2, radius: f32, props: BodyProps) -> BodyHandle {
        let id = self.next_body;
        let rb = RigidBodyBuilder::dynamic()
            .translation(vec2_to_na(position))
            .linear_damping(self.linear_damping)
            .angular_damping(self.linear_damping)
            .ccd_enabled(true)
            .sleeping(props.sleeping)
            .enabled(false)
            .user_data(id as u128)
            .build();
        let body = self.bodies.insert(rb);

        let mut builder = ColliderBuilder::ball(radius)
            .restitution(props.restitution)
            .friction(props.friction)
            .collision_groups(interaction_groups(props.group));
        if let Some(mass) = props.mass {
            builder = builder.mass(mass);
        }
        let collider = self
            .colliders
            .insert_with_parent(builder.build(), body, &mut self.bodies);

        self.allocate_body(BodyEntry {
            body,
            collider,
            radius,
        })
    }

    fn create_static_edge(&mut self, edge: EdgeDesc) -> BodyHandle {
        let id = self.next_body;
        let rb = RigidBodyBuilder::fixed()
            .translation(vec2_to_na(edge.centre))
            .rotation(edge.angle)
            .user_data(id as u128)
            .build();
        let body = self.bodies.insert(rb);
        let collider = ColliderBuilder::cuboid(edge.half_extents.x, edge.half_extents.y)
            .restitution(edge.restitution)
            .friction(0.0)
            .collision_groups(interaction_groups(CollisionGroup::Cushion))
            .build();
        let collider = self
            .colliders
            .insert_with_parent(collider, body, &mut self.bodies);

        self.allocate_body(BodyEntry {
            body,
            collider,
            radius: edge.half_extents.min_element(),
        })
    }

    fn add_to_world(&mut self, body: BodyHandle) {
        if let Some(rb) = self.rigid_body_mut(body) {
            rb.set_enabled(true);
        }
    }

    fn remove_from_world(&mut self, body: BodyHandle) {
        let Some(entry) = self.entries.remove(&body) else {
            return;
        };
        let attached: Vec<ConstraintHandle> = self
            .constraints
            .iter()
            .filter(|(_, c)| {
                self.impulse_joints
                    .get(c.joint)
                    .map(|joint| joint.body2 == entry.body)
                    .unwrap_or(false)
            })
            .map(|(handle, _)| *handle)
            .collect();
        for handle in attached {
            self.destroy_constraint(handle);
        }
        self.remove_rigid_body(entry.body);
    }

    fn step(&mut self) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }

    fn position(&self, body: BodyHandle) -> Vec2 {
        self.rigid_body(body)
            .map(|rb| na_to_vec2(rb.translation()))
            .unwrap_or(Vec2::ZERO)
    }

    fn velocity(&self, body: BodyHandle) -> Vec2 {
        let dt = self.dt();
        self.rigid_body(body)
            .map(|rb| na_to_vec2(rb.linvel()) * dt)
            .unwrap_or(Vec2::ZERO)
    }

    fn mass(&self, body: BodyHandle) -> f32 {
        self.rigid_body(body).map(|rb| rb.mass()).unwrap_or(0.0)
    }

    fn radius(&self, body: BodyHandle) -> f32 {
        self.entries.get(&body).map(|e| e.radius).unwrap_or(0.0)
    }

    fn set_velocity(&mut self, body: BodyHandle, velocity: Vec2) {
        let dt = self.dt();
        if let Some(rb) = self.rigid_body_mut(body) {
            rb.set_linvel(vec2_to_na(velocity / dt), true);
        }
    }

    fn set_mass(&mut self, body: BodyHandle, mass: f32) {
        let Some(entry) = self.entries.get(&body).copied() else {
            return;
        };
        if let Some(collider) = self.colliders.get_mut(entry.collider) {
            collider.set_mass(mass);
        }
        if let Some(rb) = self.bodies.get_mut(entry.body) {
            rb.recompute_mass_properties_from_colliders(&self.colliders);
        }
    }

    fn set_position(&mut self, body: BodyHandle, position: Vec2) {
        if let Some(rb) = self.rigid_body_mut(body) {
            rb.set_translation(vec2_to_na(position), true);
        }
    }

    fn scale(&mut self, body: BodyHandle, sx: f32, sy: f32) {
        let Some(entry) = self.entries.get_mut(&body) else {
            return;
        };
        let Some(collider) = self.colliders.get_mut(entry.collider) else {
            return;
        };
        if let Some(ball) = collider.shape().as_ball() {
            let radius = ball.radius * sx;
            collider.set_shape(SharedShape::ball(radius));
            entry.radius = radius;
        } else if let Some(cuboid) = collider.shape().as_cuboid() {
            let half = cuboid.half_extents;
            collider.set_shape(SharedShape::cuboid(half.x * sx, half.y * sy));
        }
    }

    fn set_sleeping(&mut self, body: BodyHandle, sleeping: bool) {
        if let Some(rb) = self.rigid_body_mut(body) {
            if sleeping {
                rb.sleep();
            } else {
                rb.wake_up(true);
            }
        }
    }

    fn collides(&self, a: BodyHandle, b: BodyHandle) -> bool {
        let (Some(a), Some(b)) = (self.entries.get(&a), self.entries.get(&b)) else {
            return false;
        };
        self.narrow_phase
            .contact_pair(a.collider, b.collider)
            .map(|pair| pair.has_any_active_contact)
            .unwrap_or(false)
    }

    fn create_point_constraint(&mut self, desc: PointConstraintDesc) -> ConstraintHandle {
        let handle = ConstraintHandle(self.next_constraint);
        self.next_constraint += 1;

        let Some(target) = self.entries.get(&desc.body).copied() else {
            log::warn!("constraint requested for unknown body {:?}", desc.body);
            return handle;
        };

        let anchor = self.bodies.insert(
            RigidBodyBuilder::fixed()
                .translation(vec2_to_na(desc.anchor))
                .build(),
        );

        // Per-tick correction fractions become a spring in SI-style units.
        let dt = self.dt();
        let mass = self.bodies.get(target.body).map(|rb| rb.mass()).unwrap_or(1.0);
        let stiffness = desc.stiffness * mass / (dt * dt);
        let damping = desc.damping * mass / dt;

        let joint = SpringJointBuilder::new(0.0, stiffness, damping)
            .local_anchor1(nalgebra::Point2::origin())
            .local_anchor2(nalgebra::Point2::origin())
            .build();
        let joint = self.impulse_joints.insert(anchor, target.body, joint, true);

        self.constraints
            .insert(handle, ConstraintEntry { joint, anchor });
        handle
    }

    fn destroy_constraint(&mut self, constraint: ConstraintHandle) {
        if let Some(entry) = self.constraints.remove(&constraint) {
            self.impulse_joints.remove(entry.joint, true);
            self.remove_rigid_body(entry.anchor);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn ball_props() -> BodyProps {
        BodyProps::new(0.4, 0.2, CollisionGroup::Object).with_mass(1.0)
    }

    fn spawn(world: &mut RapierWorld, pos: Vec2) -> BodyHandle {
        let body = world.create_circle_body(pos, 10.0, ball_props());
        world.add_to_world(body);
        body
    }

    #[test]
    fn create_and_remove_body() {
        let mut world = RapierWorld::new(1.0 / 60.0, 0.0);
        let body = spawn(&mut world, Vec2::new(10.0, 20.0));
        assert_eq!(world.body_count(), 1);
        world.remove_from_world(body);
        assert_eq!(world.body_count(), 0);
        // Removed handles read as zero.
        assert_eq!(world.position(body), Vec2::ZERO);
    }

    #[test]
    fn staged_body_does_not_move_until_added() {
        let mut world = RapierWorld::new(1.0 / 60.0, 0.0);
        let body = world.create_circle_body(Vec2::new(100.0, 100.0), 5.0, ball_props());
        world.set_velocity(body, Vec2::new(2.0, 0.0));
        for _ in 0..5 {
            world.step();
        }
        assert!((world.position(body).x - 100.0).abs() < 0.001);

        world.add_to_world(body);
        world.set_velocity(body, Vec2::new(2.0, 0.0));
        for _ in 0..5 {
            world.step();
        }
        assert!(world.position(body).x > 105.0);
    }

    #[test]
    fn velocity_is_per_tick() {
        let mut world = RapierWorld::new(1.0 / 60.0, 0.0);
        let body = spawn(&mut world, Vec2::ZERO);
        world.set_velocity(body, Vec2::new(3.0, -1.5));
        let vel = world.velocity(body);
        assert!((vel.x - 3.0).abs() < 0.001);
        assert!((vel.y + 1.5).abs() < 0.001);

        world.step();
        let pos = world.position(body);
        assert!((pos.x - 3.0).abs() < 0.05, "moved {:?}", pos);
    }

    #[test]
    fn converging_balls_collide() {
        let mut world = RapierWorld::new(1.0 / 60.0, 0.0);
        let a = spawn(&mut world, Vec2::new(0.0, 0.0));
        let b = spawn(&mut world, Vec2::new(40.0, 0.0));
        world.set_velocity(a, Vec2::new(2.0, 0.0));
        world.set_velocity(b, Vec2::new(-2.0, 0.0));

        let mut touched = false;
        for _ in 0..30 {
            world.step();
            touched |= world.collides(a, b);
        }
        assert!(touched, "balls should have touched");
    }

    #[test]
    fn static_edge_does_not_move() {
        let mut world = RapierWorld::new(1.0 / 60.0, 0.0);
        let edge = world.create_static_edge(EdgeDesc {
            centre: Vec2::new(0.0, 500.0),
            half_extents: Vec2::new(100.0, 5.0),
            angle: 0.0,
            restitution: 1.0,
        });
        let ball = spawn(&mut world, Vec2::new(0.0, 470.0));
        world.set_velocity(ball, Vec2::new(0.0, 3.0));
        for _ in 0..30 {
            world.step();
        }
        assert!((world.position(edge).y - 500.0).abs() < 0.001);
        assert!(world.position(ball).y < 500.0);
    }

    #[test]
    fn set_mass_is_visible_immediately() {
        let mut world = RapierWorld::new(1.0 / 60.0, 0.0);
        let body = spawn(&mut world, Vec2::ZERO);
        world.step();
        assert!((world.mass(body) - 1.0).abs() < 0.001);
        world.set_mass(body, 5.0);
        assert!((world.mass(body) - 5.0).abs() < 0.001);
    }

    #[test]
    fn scale_changes_radius() {
        let mut world = RapierWorld::new(1.0 / 60.0, 0.0);
        let body = spawn(&mut world, Vec2::ZERO);
        world.scale(body, 0.5, 0.5);
        assert!((world.radius(body) - 5.0).abs() < 0.001);
    }

    #[test]
    fn point_constraint_pulls_toward_anchor() {
        let mut world = RapierWorld::new(1.0 / 60.0, 0.0);
        let body = spawn(&mut world, Vec2::new(100.0, 0.0));
        let constraint = world.create_point_constraint(PointConstraintDesc {
            anchor: Vec2::ZERO,
            body,
            stiffness: 0.01,
            damping: 0.0001,
        });
        assert_eq!(world.constraint_count(), 1);

        for _ in 0..20 {
            world.step();
        }
        assert!(world.position(body).x < 100.0);
        assert!(world.velocity(body).x < 0.0);

        world.destroy_constraint(constraint);
        assert_eq!(world.constraint_count(), 0);
        // Only the ball remains; the anchor body is gone too.
        assert_eq!(world.body_count(), 1);
    }

    #[test]
    fn removing_body_drops_its_constraint() {
        let mut world = RapierWorld::new(1.0 / 60.0, 0.0);
        let body = spawn(&mut world, Vec2::new(10.0, 0.0));
        world.create_point_constraint(PointConstraintDesc {
            anchor: Vec2::ZERO,
            body,
            stiffness: 0.01,
            damping: 0.0,
        });
        world.remove_from_world(body);
        assert_eq!(world.constraint_count(), 0);
        assert_eq!(world.body_count(), 0);
    }

    #[test]
    fn sleep_toggle() {
        let mut world = RapierWorld::new(1.0 / 60.0, 0.0);
        let body = spawn(&mut world, Vec2::ZERO);
        world.set_sleeping(body, true);
        assert!(world.is_sleeping(body));
        world.set_sleeping(body, false);
        assert!(!world.is_sleeping(body));
    }
}
