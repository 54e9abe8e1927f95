use coscientist_model::{Hypothesis, HypothesisId, PopulationStore};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Sorts hypotheses best-first: rating descending, ties by id ascending.
///
/// Every consumer of "who is on top" goes through this one ordering, so
/// selection and pairing stay deterministic even with tied ratings.
#[must_use]
pub fn ranked<'a>(hypotheses: &[&'a Hypothesis]) -> Vec<&'a Hypothesis> {
    let mut sorted = hypotheses.to_vec();
    sorted.sort_by(|a, b| {
        b.elo_score
            .partial_cmp(&a.elo_score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.id.cmp(&b.id))
    });
    sorted
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandingsEntry {
    pub id: HypothesisId,
    pub title: String,
    pub elo_score: f64,
}

/// Ratings snapshot of the active population, best first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Standings {
    pub entries: Vec<StandingsEntry>,
}

impl Standings {
    #[must_use]
    pub fn of(store: &PopulationStore) -> Self {
        let active = store.active();
        let entries = ranked(&active)
            .into_iter()
            .map(|h| StandingsEntry {
                id: h.id.clone(),
                title: h.title.clone(),
                elo_score: h.elo_score,
            })
            .collect();
        Self { entries }
    }

    /// Ids of the best `k` hypotheses.
    #[must_use]
    pub fn top(&self, k: usize) -> Vec<HypothesisId> {
        self.entries.iter().take(k).map(|e| e.id.clone()).collect()
    }
}
