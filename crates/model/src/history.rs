use crate::hypothesis::HypothesisId;
use serde::{Deserialize, Serialize};

/// One decided tournament comparison, with both ratings before and after.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub first: HypothesisId,
    pub second: HypothesisId,
    pub winner: HypothesisId,
    pub first_rating_before: f64,
    pub second_rating_before: f64,
    pub first_rating_after: f64,
    pub second_rating_after: f64,
    pub iteration: u32,
}

/// Critique and follow-up directions produced at the end of a cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaReviewRecord {
    pub critique: Vec<String>,
    pub suggested_next_steps: Vec<String>,
    pub iteration: u32,
}
