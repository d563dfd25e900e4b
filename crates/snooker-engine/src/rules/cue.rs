use glam::Vec2;
use serde::Serialize;

use crate::api::config::GameConfig;
use crate::api::error::CommandError;
use crate::api::types::{BodyHandle, ConstraintHandle};
use crate::core::physics::{BodyProps, CollisionGroup, PhysicsAdapter, PointConstraintDesc};
use crate::core::schedule::TaskId;
use crate::rules::registry::ball_mass;
use crate::table;

/// Slingshot state of the cue ball.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum CuePhase {
    /// No cue ball on the table.
    #[default]
    Unset,
    /// Pinned to the anchor by the aiming spring.
    Anchored,
    /// Released by the player; the spring lets go when the detach task fires.
    Detaching,
    /// Rolling freely.
    Released,
}

/// What a freely rolling cue ball is doing this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CueStatus {
    Moving,
    Resting,
    LeftField,
}

/// Owner of the cue ball body and its aiming constraint.
#[derive(Debug, Default)]
pub struct CueController {
    phase: CuePhase,
    body: Option<BodyHandle>,
    constraint: Option<ConstraintHandle>,
    anchor: Vec2,
    dragging: bool,
    detach: Option<TaskId>,
}

impl CueController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> CuePhase {
        self.phase
    }

    pub fn body(&self) -> Option<BodyHandle> {
        self.body
    }

    pub fn anchor(&self) -> Option<Vec2> {
        self.constraint.map(|_| self.anchor)
    }

    pub fn is_placed(&self) -> bool {
        self.body.is_some()
    }

    pub fn is_constrained(&self) -> bool {
        self.constraint.is_some()
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Put the cue ball down inside the D and pin it there.
    pub fn place<P: PhysicsAdapter>(
        &mut self,
        physics: &mut P,
        config: &GameConfig,
        pos: Vec2,
    ) -> Result<BodyHandle, CommandError> {
        if self.body.is_some() {
            return Err(CommandError::CueAlreadyPlaced);
        }
        if !table::inside_d(config, pos) {
            return Err(CommandError::OutsideD);
        }

        let props = BodyProps::new(config.cue_restitution, config.cue_friction, CollisionGroup::Cue)
            .with_mass(ball_mass(config.ball_radius) * config.cue_mass_factor);
        let body = physics.create_circle_body(pos, config.ball_radius, props);
        physics.add_to_world(body);
        self.body = Some(body);
        self.pin(physics, config, body, pos);
        log::info!("cue ball placed at ({:.1}, {:.1})", pos.x, pos.y);
        Ok(body)
    }

    fn pin<P: PhysicsAdapter>(&mut self, physics: &mut P, config: &GameConfig, body: BodyHandle, at: Vec2) {
        self.constraint = Some(physics.create_point_constraint(PointConstraintDesc {
            anchor: at,
            body,
            stiffness: config.anchor_stiffness,
            damping: config.anchor_damping,
        }));
        self.anchor = at;
        self.dragging = false;
        self.phase = CuePhase::Anchored;
    }

    /// Start pulling the cue ball back.
    pub fn begin_drag(&mut self) -> Result<(), CommandError> {
        match self.phase {
            CuePhase::Anchored => {
                self.dragging = true;
                Ok(())
            }
            CuePhase::Unset => Err(CommandError::CueNotPlaced),
            CuePhase::Detaching => Err(CommandError::DetachPending),
            CuePhase::Released => Err(CommandError::NotAiming),
        }
    }

    /// Hold the cue ball at the pointer, no further than `max_pull` from the anchor.
    pub fn drag<P: PhysicsAdapter>(
        &mut self,
        physics: &mut P,
        config: &GameConfig,
        pointer: Vec2,
    ) -> Result<(), CommandError> {
        let body = self.body.ok_or(CommandError::CueNotPlaced)?;
        if self.phase != CuePhase::Anchored || !self.dragging {
            return Err(CommandError::NotAiming);
        }
        let offset = (pointer - self.anchor).clamp_length_max(config.max_pull);
        physics.set_position(body, self.anchor + offset);
        physics.set_velocity(body, Vec2::ZERO);
        Ok(())
    }

    /// Let go of the cue ball. The caller schedules the detach and hands
    /// back its token through [`set_detach_task`](Self::set_detach_task).
    pub fn release(&mut self) -> Result<(), CommandError> {
        match self.phase {
            CuePhase::Anchored if self.dragging => {
                self.dragging = false;
                self.phase = CuePhase::Detaching;
                Ok(())
            }
            CuePhase::Anchored => Err(CommandError::NotAiming),
            CuePhase::Unset => Err(CommandError::CueNotPlaced),
            CuePhase::Detaching => Err(CommandError::DetachPending),
            CuePhase::Released => Err(CommandError::NotAiming),
        }
    }

    pub fn set_detach_task(&mut self, task: TaskId) {
        self.detach = Some(task);
    }

    /// Drop the spring and cap the launch speed on each axis.
    pub fn finish_detach<P: PhysicsAdapter>(&mut self, physics: &mut P, config: &GameConfig) {
        if self.phase != CuePhase::Detaching {
            return;
        }
        self.detach = None;
        if let Some(constraint) = self.constraint.take() {
            physics.destroy_constraint(constraint);
        }
        if let Some(body) = self.body {
            let limit = Vec2::splat(config.max_axis_speed);
            let velocity = physics.velocity(body).clamp(-limit, limit);
            physics.set_velocity(body, velocity);
            log::debug!("cue released at ({:.2}, {:.2})", velocity.x, velocity.y);
        }
        self.phase = CuePhase::Released;
    }

    /// Rest and field checks for a rolling cue ball. `None` unless released.
    pub fn status<P: PhysicsAdapter>(&self, physics: &P, config: &GameConfig) -> Option<CueStatus> {
        if self.phase != CuePhase::Released {
            return None;
        }
        let body = self.body?;
        if !table::within_field(config, physics.position(body)) {
            return Some(CueStatus::LeftField);
        }
        let v = physics.velocity(body).abs();
        if v.x < config.rest_epsilon && v.y < config.rest_epsilon {
            Some(CueStatus::Resting)
        } else {
            Some(CueStatus::Moving)
        }
    }

    /// Pin a resting cue ball where it stopped.
    pub fn re_anchor<P: PhysicsAdapter>(&mut self, physics: &mut P, config: &GameConfig) {
        let Some(body) = self.body else {
            return;
        };
        let at = physics.position(body);
        physics.set_velocity(body, Vec2::ZERO);
        if let Some(old) = self.constraint.take() {
            physics.destroy_constraint(old);
        }
        self.pin(physics, config, body, at);
    }

    /// Remove the cue ball and its constraint. Returns a pending detach
    /// task for the caller to cancel.
    pub fn discard<P: PhysicsAdapter>(&mut self, physics: &mut P) -> Option<TaskId> {
        if let Some(constraint) = self.constraint.take() {
            physics.destroy_constraint(constraint);
        }
        if let Some(body) = self.body.take() {
            physics.remove_from_world(body);
        }
        self.phase = CuePhase::Unset;
        self.dragging = false;
        self.detach.take()
    }

    /// Anchor and cue ball centre while the spring is attached.
    pub fn anchor_line<P: PhysicsAdapter>(&self, physics: &P) -> Option<(Vec2, Vec2)> {
        let body = self.body?;
        self.constraint?;
        Some((self.anchor, physics.position(body)))
    }
}
