use glam::Vec2;

use crate::api::types::{BodyHandle, ConstraintHandle};

// ---------------------------------------------------------------------------
// Body descriptions
// ---------------------------------------------------------------------------

/// Which family a body belongs to. Backends may map this onto collision filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionGroup {
    Cue,
    Object,
    Cushion,
}

/// Material and mass for a circle body.
#[derive(Debug, Clone, Copy)]
pub struct BodyProps {
    pub restitution: f32,
    pub friction: f32,
    /// Explicit mass. `None` lets the backend derive it from the shape.
    pub mass: Option<f32>,
    pub group: CollisionGroup,
    /// Start the body asleep.
    pub sleeping: bool,
}

impl BodyProps {
    pub fn new(restitution: f32, friction: f32, group: CollisionGroup) -> Self {
        Self {
            restitution,
            friction,
            mass: None,
            group,
            sleeping: false,
        }
    }

    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = Some(mass);
        self
    }

    pub fn with_sleeping(mut self, sleeping: bool) -> Self {
        self.sleeping = sleeping;
        self
    }
}

/// A static rectangular edge (a cushion), rotated about its centre.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeDesc {
    pub centre: Vec2,
    pub half_extents: Vec2,
    /// Rotation in radians.
    pub angle: f32,
    pub restitution: f32,
}

/// A spring pinning `body` to a fixed world point.
///
/// `stiffness` is the fraction of the displacement corrected per tick (0..1),
/// `damping` the fraction of relative velocity removed per tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointConstraintDesc {
    pub anchor: Vec2,
    pub body: BodyHandle,
    pub stiffness: f32,
    pub damping: f32,
}

// ---------------------------------------------------------------------------
// PhysicsAdapter
// ---------------------------------------------------------------------------

/// The rigid-body substrate the rule engine drives.
///
/// Positions are table units. Velocities are table units per tick, so the
/// rule thresholds (rest epsilon, speed clamp) mean the same thing on every
/// backend. Operations on a handle that has been removed are ignored, and
/// queries on one return zero values.
pub trait PhysicsAdapter {
    /// Build a circle body. It takes no part in the simulation until
    /// [`add_to_world`](Self::add_to_world) is called.
    fn create_circle_body(&mut self, position: Vec2, radius: f32, props: BodyProps) -> BodyHandle;

    /// Build a static edge and add it to the world.
    fn create_static_edge(&mut self, edge: EdgeDesc) -> BodyHandle;

    fn add_to_world(&mut self, body: BodyHandle);

    /// Delete the body and any constraint attached to it.
    fn remove_from_world(&mut self, body: BodyHandle);

    /// Advance the simulation by one tick.
    fn step(&mut self);

    fn position(&self, body: BodyHandle) -> Vec2;
    fn velocity(&self, body: BodyHandle) -> Vec2;
    fn mass(&self, body: BodyHandle) -> f32;
    fn radius(&self, body: BodyHandle) -> f32;

    fn set_velocity(&mut self, body: BodyHandle, velocity: Vec2);
    fn set_mass(&mut self, body: BodyHandle, mass: f32);
    fn set_position(&mut self, body: BodyHandle, position: Vec2);

    /// Scale a body's shape. Circles use `sx` for the radius.
    fn scale(&mut self, body: BodyHandle, sx: f32, sy: f32);

    fn set_sleeping(&mut self, body: BodyHandle, sleeping: bool);

    /// Whether the two bodies are currently touching.
    fn collides(&self, a: BodyHandle, b: BodyHandle) -> bool;

    fn create_point_constraint(&mut self, desc: PointConstraintDesc) -> ConstraintHandle;
    fn destroy_constraint(&mut self, constraint: ConstraintHandle);
}
