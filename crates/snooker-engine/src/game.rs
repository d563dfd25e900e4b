//! The turn controller: one [`SnookerGame`] owns the table, the balls, the cue
//! ball and the rule state, and advances them one tick at a time.

use glam::Vec2;
use serde::Serialize;

use crate::api::config::GameConfig;
use crate::api::error::CommandError;
use crate::api::types::{ArrangementMode, GameOutcome};
use crate::core::physics::PhysicsAdapter;
use crate::core::rng::Rng;
use crate::core::schedule::Scheduler;
use crate::core::time::Countdown;
use crate::input::queue::InputEvent;
use crate::render::snapshot::Snapshot;
use crate::rules::cue::{CueController, CuePhase, CueStatus};
use crate::rules::modifiers::{Modifier, Modifiers};
use crate::rules::registry::BallRegistry;
use crate::rules::scoring::{self, FoulReason};
use crate::rules::state::GameState;
use crate::table::Table;

/// Actions that fire a fixed number of ticks after being scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deferred {
    /// Let go of the aiming spring.
    DetachCue,
    /// Stop advancing the world after a win.
    Freeze,
}

/// Coarse game phase for UI prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    ChoosingArrangement,
    PlacingCue,
    Aiming,
    Rolling,
    Over,
}

pub struct SnookerGame<P: PhysicsAdapter> {
    config: GameConfig,
    physics: P,
    table: Table,
    registry: BallRegistry,
    cue: CueController,
    state: GameState,
    modifiers: Modifiers,
    scheduler: Scheduler<Deferred>,
    countdown: Countdown,
    rng: Rng,
    frozen: bool,
}

#[cfg(feature = "physics")]
impl SnookerGame<crate::core::rapier::RapierWorld> {
    /// A game on a fresh Rapier world configured from `config`.
    pub fn with_rapier(config: GameConfig) -> Self {
        let physics = crate::core::rapier::RapierWorld::new(config.fixed_dt, config.felt_damping);
        Self::new(config, physics)
    }
}

impl<P: PhysicsAdapter> SnookerGame<P> {
    pub fn new(config: GameConfig, mut physics: P) -> Self {
        let table = Table::build(&mut physics, &config);
        let countdown = Countdown::new(config.time_limit_secs, config.ticks_per_second);
        let rng = Rng::new(config.seed);
        Self {
            config,
            physics,
            table,
            registry: BallRegistry::new(),
            cue: CueController::new(),
            state: GameState::default(),
            modifiers: Modifiers::new(),
            scheduler: Scheduler::new(),
            countdown,
            rng,
            frozen: false,
        }
    }

    // -- Accessors --

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn physics(&self) -> &P {
        &self.physics
    }

    pub fn physics_mut(&mut self) -> &mut P {
        &mut self.physics
    }

    pub fn registry(&self) -> &BallRegistry {
        &self.registry
    }

    pub fn cue(&self) -> &CueController {
        &self.cue
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn modifiers(&self) -> &Modifiers {
        &self.modifiers
    }

    pub fn remaining_secs(&self) -> u32 {
        self.countdown.remaining_secs()
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn phase(&self) -> GamePhase {
        if self.state.is_over() {
            return GamePhase::Over;
        }
        if self.state.mode.is_none() {
            return GamePhase::ChoosingArrangement;
        }
        match self.cue.phase() {
            CuePhase::Unset => GamePhase::PlacingCue,
            CuePhase::Anchored => GamePhase::Aiming,
            CuePhase::Detaching | CuePhase::Released => GamePhase::Rolling,
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(self)
    }

    // -- Commands --

    fn ensure_live(&self) -> Result<(), CommandError> {
        if self.state.is_over() {
            Err(CommandError::GameOver)
        } else {
            Ok(())
        }
    }

    /// Lay out the balls. Only once per game.
    pub fn select_arrangement(&mut self, mode: ArrangementMode) -> Result<(), CommandError> {
        self.ensure_live()?;
        if self.state.mode.is_some() {
            return Err(CommandError::AlreadyArranged);
        }
        self.registry
            .arrange(&mut self.physics, &self.config, mode, &mut self.rng);
        // Scattered layouts stay awake so overlapping balls can separate.
        if mode == ArrangementMode::Ordered {
            self.registry.set_all_sleeping(&mut self.physics, true);
        }
        self.state.mode = Some(mode);
        Ok(())
    }

    /// Put the cue ball down inside the D. Starts a new turn.
    pub fn place_cue_ball(&mut self, pos: Vec2) -> Result<(), CommandError> {
        self.ensure_live()?;
        if self.state.mode.is_none() {
            return Err(CommandError::NoArrangement);
        }
        self.cue.place(&mut self.physics, &self.config, pos)?;
        scoring::new_turn(&mut self.state, &self.registry, &mut self.physics);
        Ok(())
    }

    pub fn press_cue(&mut self) -> Result<(), CommandError> {
        self.ensure_live()?;
        self.cue.begin_drag()
    }

    pub fn drag_cue(&mut self, pointer: Vec2) -> Result<(), CommandError> {
        self.ensure_live()?;
        self.cue.drag(&mut self.physics, &self.config, pointer)
    }

    /// Shoot: the spring lets go after `detach_delay_ticks`.
    pub fn release_cue(&mut self) -> Result<(), CommandError> {
        self.ensure_live()?;
        self.cue.release()?;
        let task = self
            .scheduler
            .schedule(self.config.detach_delay_ticks, Deferred::DetachCue);
        self.cue.set_detach_task(task);
        self.registry.set_all_sleeping(&mut self.physics, false);
        Ok(())
    }

    pub fn activate_modifier(&mut self, modifier: Modifier) -> Result<(), CommandError> {
        self.ensure_live()?;
        self.modifiers.activate(
            modifier,
            &mut self.physics,
            &mut self.registry,
            self.cue.body(),
            &mut self.rng,
        )
    }

    /// Throw away the current game. The table stays, everything on it goes.
    pub fn restart(&mut self) {
        if let Some(task) = self.cue.discard(&mut self.physics) {
            self.scheduler.cancel(task);
        }
        self.scheduler.clear();
        self.registry.clear(&mut self.physics);
        self.modifiers.reset();
        self.table.clear_highlights();
        self.state = GameState::default();
        self.countdown.reset();
        self.frozen = false;
        log::info!("game restarted");
    }

    /// Map one input event onto a command. Rejected commands are no-ops.
    pub fn handle_input(&mut self, event: InputEvent) {
        let result = match event {
            InputEvent::PointerDown { .. } => self.press_cue(),
            InputEvent::PointerMove { x, y } => {
                if self.cue.is_dragging() {
                    self.drag_cue(Vec2::new(x, y))
                } else {
                    Ok(())
                }
            }
            InputEvent::PointerUp { x, y } => {
                if self.cue.is_placed() {
                    self.release_cue()
                } else {
                    self.place_cue_ball(Vec2::new(x, y))
                }
            }
            InputEvent::Key { ch: 'r' | 'R' } | InputEvent::Restart => {
                self.restart();
                Ok(())
            }
            InputEvent::Key { ch } => match ArrangementMode::from_key(ch) {
                Some(mode) => self.select_arrangement(mode),
                None => Ok(()),
            },
            InputEvent::SelectArrangement(mode) => self.select_arrangement(mode),
            InputEvent::PlaceCue { x, y } => self.place_cue_ball(Vec2::new(x, y)),
            InputEvent::Modifier(modifier) => self.activate_modifier(modifier),
        };
        if let Err(err) = result {
            log::debug!("ignored {:?}: {}", event, err);
        }
    }

    // -- Tick --

    /// Advance one logical tick.
    pub fn tick(&mut self) {
        if self.frozen {
            return;
        }
        for action in self.scheduler.advance() {
            match action {
                Deferred::DetachCue => self.cue.finish_detach(&mut self.physics, &self.config),
                Deferred::Freeze => {
                    self.frozen = true;
                    log::info!("table settled, world frozen");
                    return;
                }
            }
        }

        self.physics.step();

        if self.state.is_over() || self.state.mode.is_none() {
            return;
        }

        if self.cue.is_placed() && self.countdown.tick() {
            self.state.outcome = GameOutcome::TimedOut;
            self.frozen = true;
            log::info!("time is up, final score {}", self.state.score);
            return;
        }

        if let Some(cue) = self.cue.body() {
            self.table.update_highlights(&self.physics, cue);
            if matches!(self.cue.phase(), CuePhase::Detaching | CuePhase::Released) {
                scoring::evaluate_contacts(
                    &mut self.state,
                    &self.physics,
                    &self.registry,
                    cue,
                    &self.config,
                );
            }
        }

        scoring::evaluate_pocketing(
            &mut self.state,
            &mut self.physics,
            &mut self.registry,
            &self.config,
        );

        if self.state.outcome == GameOutcome::Won {
            self.scheduler
                .schedule(self.config.win_settle_ticks, Deferred::Freeze);
            return;
        }

        match self.cue.status(&self.physics, &self.config) {
            Some(CueStatus::LeftField) => self.cue_left_field(),
            Some(CueStatus::Resting) => self.end_shot(),
            Some(CueStatus::Moving) | None => {}
        }
    }

    fn cue_left_field(&mut self) {
        if let Some(cue) = self.cue.body() {
            let pos = self.physics.position(cue);
            log::warn!("cue ball left the field at ({:.1}, {:.1})", pos.x, pos.y);
        }
        scoring::apply_penalty(&mut self.state, FoulReason::CueLeftField, self.config.foul_penalty);
        if let Some(task) = self.cue.discard(&mut self.physics) {
            self.scheduler.cancel(task);
        }
        self.table.clear_highlights();
        self.modifiers
            .deactivate_all(&mut self.physics, &mut self.registry);
    }

    fn end_shot(&mut self) {
        self.cue.re_anchor(&mut self.physics, &self.config);
        scoring::new_turn(&mut self.state, &self.registry, &mut self.physics);
        self.modifiers
            .deactivate_all(&mut self.physics, &mut self.registry);
        log::debug!("cue ball at rest, score {}", self.state.score);
    }
}
