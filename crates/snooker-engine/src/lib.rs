pub mod api;
pub mod core;
pub mod game;
pub mod input;
pub mod render;
pub mod rules;
pub mod table;

#[cfg(test)]
pub(crate) mod testing;

// Re-export key types at crate root for convenience
pub use api::config::GameConfig;
pub use api::error::{CommandError, ConfigError};
pub use api::types::{
    ArrangementMode, BallKind, BallTag, BodyHandle, Color, ConstraintHandle, GameOutcome, HitKind,
    TargetBall,
};
pub use core::physics::{BodyProps, CollisionGroup, EdgeDesc, PhysicsAdapter, PointConstraintDesc};
pub use core::schedule::{Scheduler, TaskId};
pub use core::time::{Countdown, FixedTimestep};
pub use game::{Deferred, GamePhase, SnookerGame};
pub use input::queue::{InputEvent, InputQueue};
pub use render::instance::{BallInstance, InstanceBuffer};
pub use render::snapshot::{BallView, Snapshot};
pub use rules::cue::{CueController, CuePhase, CueStatus};
pub use rules::modifiers::{Modifier, Modifiers};
pub use rules::registry::{Ball, BallRegistry};
pub use rules::scoring::{FoulReason, PocketEvent};
pub use rules::state::{GameState, TurnState};

#[cfg(feature = "physics")]
pub use core::rapier::RapierWorld;
