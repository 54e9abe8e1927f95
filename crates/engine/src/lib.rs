//! # Coscientist Engine
//!
//! The hypothesis evolution cycle: [`CycleEngine`] walks the eight stages of
//! [`Stage::SEQUENCE`] against a population store, degrading individual
//! stages on collaborator failure instead of aborting, and reports every
//! stage in a [`CycleReport`].
//!
//! Stages compute into local buffers and commit at stage end; a degraded
//! stage leaves the store exactly as it found it.

mod cycle;
mod error;
mod overview;
mod parse;
mod prompts;
mod report;
mod stage;

pub use cycle::{CycleEngine, EvolutionPolicy};
pub use error::{EngineError, Result};
pub use overview::{OverviewEntry, ResearchOverview};
pub use report::{CycleReport, StagePayload, StageReport};
pub use stage::Stage;
