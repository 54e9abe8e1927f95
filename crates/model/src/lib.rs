//! # Coscientist Data Model
//!
//! Session state for hypothesis evolution: the [`Hypothesis`] record, the
//! [`ResearchGoal`] tunables, the in-memory [`PopulationStore`] with its
//! append-only tournament and meta-review histories, and the JSON
//! [`SessionArchive`] the whole session persists to.
//!
//! Integrity rules live here rather than in the engine:
//!
//! - ids come from a store-owned serial, so fresh ids cannot collide;
//! - a hypothesis can only name parents that already exist, which keeps
//!   lineage acyclic by construction;
//! - a decided match commits both rating updates and its record together.

mod archive;
mod error;
mod goal;
mod history;
mod hypothesis;
mod reference;
mod store;

pub use archive::{SessionArchive, SessionState};
pub use error::{ModelError, Result};
pub use goal::{ResearchGoal, DEFAULT_LLM_MODEL};
pub use history::{MatchRecord, MetaReviewRecord};
pub use hypothesis::{Hypothesis, HypothesisId, HypothesisOrigin, ReviewGrade};
pub use reference::{PaperSummary, ReferenceKind, ReferenceLink, ReferenceSource};
pub use store::PopulationStore;
