pub mod physics;
#[cfg(feature = "physics")]
pub mod rapier;
pub mod rng;
pub mod schedule;
pub mod time;
