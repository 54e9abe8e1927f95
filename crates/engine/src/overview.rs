use coscientist_model::{HypothesisId, PopulationStore, ReviewGrade};
use coscientist_ranking::ranked;
use serde::Serialize;

/// Snapshot of where a research session stands, built for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResearchOverview {
    pub iteration: u32,
    pub top_hypotheses: Vec<OverviewEntry>,
    pub latest_critique: Vec<String>,
    pub suggested_next_steps: Vec<String>,
}

/// One active hypothesis in the overview, best rating first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewEntry {
    pub id: HypothesisId,
    pub title: String,
    pub elo_score: f64,
    pub novelty: Option<ReviewGrade>,
    pub feasibility: Option<ReviewGrade>,
}

impl ResearchOverview {
    /// Summarizes the store: the `top_n` active hypotheses by rating plus
    /// the latest meta-review, when one exists.
    #[must_use]
    pub fn of(store: &PopulationStore, top_n: usize) -> Self {
        let top_hypotheses = ranked(&store.active())
            .into_iter()
            .take(top_n)
            .map(|h| OverviewEntry {
                id: h.id.clone(),
                title: h.title.clone(),
                elo_score: h.elo_score,
                novelty: h.novelty,
                feasibility: h.feasibility,
            })
            .collect();
        let (latest_critique, suggested_next_steps) = store
            .latest_meta_review()
            .map(|review| {
                (
                    review.critique.clone(),
                    review.suggested_next_steps.clone(),
                )
            })
            .unwrap_or_default();
        Self {
            iteration: store.iteration(),
            top_hypotheses,
            latest_critique,
            suggested_next_steps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coscientist_model::{Hypothesis, MetaReviewRecord};
    use pretty_assertions::assert_eq;

    fn store_with_ratings(ratings: &[(&str, f64)]) -> PopulationStore {
        let mut store = PopulationStore::new();
        for (id, elo) in ratings {
            let mut h = Hypothesis::new((*id).into(), format!("Title {id}"), "Body");
            h.elo_score = *elo;
            store.insert_new(h).expect("fresh id");
        }
        store
    }

    #[test]
    fn overview_keeps_only_the_best_rated_entries() {
        let store = store_with_ratings(&[("H1", 1180.0), ("H2", 1250.0), ("H3", 1210.0)]);
        let overview = ResearchOverview::of(&store, 2);
        let ids: Vec<&str> = overview
            .top_hypotheses
            .iter()
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(ids, vec!["H2", "H3"]);
    }

    #[test]
    fn overview_carries_the_latest_meta_review() {
        let mut store = store_with_ratings(&[("H1", 1200.0)]);
        store.record_meta_review(MetaReviewRecord {
            critique: vec!["Too narrow".to_string()],
            suggested_next_steps: vec!["Broaden scope".to_string()],
            iteration: 1,
        });
        store.record_meta_review(MetaReviewRecord {
            critique: vec!["Better".to_string()],
            suggested_next_steps: vec![],
            iteration: 2,
        });
        let overview = ResearchOverview::of(&store, 5);
        assert_eq!(overview.latest_critique, vec!["Better".to_string()]);
        assert!(overview.suggested_next_steps.is_empty());
    }

    #[test]
    fn empty_store_yields_an_empty_overview() {
        let overview = ResearchOverview::of(&PopulationStore::new(), 5);
        assert_eq!(overview.iteration, 0);
        assert!(overview.top_hypotheses.is_empty());
        assert!(overview.latest_critique.is_empty());
    }
}
