pub mod cue;
pub mod modifiers;
pub mod registry;
pub mod scoring;
pub mod state;
