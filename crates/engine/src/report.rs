use crate::stage::Stage;
use coscientist_model::{Hypothesis, HypothesisId, MatchRecord};
use coscientist_proximity::{GraphView, Neighbor};
use coscientist_ranking::Standings;
use serde::Serialize;
use std::collections::BTreeMap;

/// What one stage produced, shaped per stage kind.
///
/// A degraded stage carries `Empty` so report consumers never branch on
/// missing keys, only on empty payloads.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StagePayload {
    Empty,
    Hypotheses {
        hypotheses: Vec<Hypothesis>,
    },
    Tournament {
        matches: Vec<MatchRecord>,
        standings: Standings,
    },
    Proximity {
        adjacency: BTreeMap<HypothesisId, Vec<Neighbor>>,
        view: GraphView,
    },
    MetaReview {
        critique: Vec<String>,
        suggested_next_steps: Vec<String>,
    },
}

/// Outcome of one stage: what it produced, how long it took, what failed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageReport {
    pub stage: Stage,
    pub duration_ms: u64,
    pub error: Option<String>,
    pub payload: StagePayload,
}

impl StageReport {
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Full record of one cycle: all eight stage reports, in execution order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleReport {
    pub iteration: u32,
    pub stages: Vec<StageReport>,
}

impl CycleReport {
    #[must_use]
    pub fn stage(&self, stage: Stage) -> Option<&StageReport> {
        self.stages.iter().find(|report| report.stage == stage)
    }

    /// Stages that degraded this cycle, in execution order.
    #[must_use]
    pub fn degraded_stages(&self) -> Vec<Stage> {
        self.stages
            .iter()
            .filter(|report| report.error.is_some())
            .map(|report| report.stage)
            .collect()
    }
}
