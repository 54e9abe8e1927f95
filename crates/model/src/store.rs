use crate::error::{ModelError, Result};
use crate::history::{MatchRecord, MetaReviewRecord};
use crate::hypothesis::{Hypothesis, HypothesisId, HypothesisOrigin};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};

/// In-memory population of one session: hypotheses, tournament history,
/// meta-review history and the cycle iteration counter.
///
/// Hypotheses keep insertion order; histories are append-only. Ids come from
/// a store-owned serial, so a freshly allocated id can never collide with an
/// existing one. Parent links are checked at insert, which keeps lineage a
/// DAG: a hypothesis can only reference parents that already exist.
#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PopulationStore {
    hypotheses: Vec<Hypothesis>,
    #[serde(skip)]
    index: HashMap<HypothesisId, usize>,
    matches: Vec<MatchRecord>,
    meta_reviews: Vec<MetaReviewRecord>,
    iteration: u32,
    next_serial: u64,
}

impl PopulationStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Hands out the next session-unique id for `origin`.
    pub fn allocate_id(&mut self, origin: HypothesisOrigin) -> HypothesisId {
        self.next_serial += 1;
        HypothesisId::new(format!("{}{}", origin.prefix(), self.next_serial))
    }

    /// Inserts a hypothesis that must not exist yet.
    pub fn insert_new(&mut self, hypothesis: Hypothesis) -> Result<()> {
        if self.index.contains_key(&hypothesis.id) {
            return Err(ModelError::DuplicateId(hypothesis.id.to_string()));
        }
        self.check_parents(&hypothesis)?;
        log::debug!("Inserting hypothesis {}", hypothesis.id);
        self.index
            .insert(hypothesis.id.clone(), self.hypotheses.len());
        self.hypotheses.push(hypothesis);
        Ok(())
    }

    /// Inserts or replaces, keyed by id.
    pub fn upsert(&mut self, hypothesis: Hypothesis) -> Result<()> {
        self.check_parents(&hypothesis)?;
        match self.index.get(&hypothesis.id) {
            Some(&slot) => {
                self.hypotheses[slot] = hypothesis;
            }
            None => {
                self.index
                    .insert(hypothesis.id.clone(), self.hypotheses.len());
                self.hypotheses.push(hypothesis);
            }
        }
        Ok(())
    }

    fn check_parents(&self, hypothesis: &Hypothesis) -> Result<()> {
        for parent in &hypothesis.parent_ids {
            if !self.index.contains_key(parent) {
                return Err(ModelError::UnknownParent(parent.to_string()));
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn get(&self, id: &HypothesisId) -> Option<&Hypothesis> {
        self.index.get(id).map(|&slot| &self.hypotheses[slot])
    }

    pub fn get_mut(&mut self, id: &HypothesisId) -> Option<&mut Hypothesis> {
        let slot = *self.index.get(id)?;
        self.hypotheses.get_mut(slot)
    }

    #[must_use]
    pub fn contains(&self, id: &HypothesisId) -> bool {
        self.index.contains_key(id)
    }

    /// All hypotheses in insertion order.
    #[must_use]
    pub fn all(&self) -> &[Hypothesis] {
        &self.hypotheses
    }

    /// Active hypotheses in insertion order.
    #[must_use]
    pub fn active(&self) -> Vec<&Hypothesis> {
        self.hypotheses.iter().filter(|h| h.is_active).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.hypotheses.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hypotheses.is_empty()
    }

    /// Marks a hypothesis inactive. It stays in the store for lineage walks.
    pub fn deactivate(&mut self, id: &HypothesisId) -> Result<()> {
        let hypothesis = self
            .get_mut(id)
            .ok_or_else(|| ModelError::NotFound(id.to_string()))?;
        hypothesis.is_active = false;
        Ok(())
    }

    /// Applies a decided match: both ratings move and the record is appended,
    /// or nothing changes at all.
    pub fn commit_match(&mut self, record: MatchRecord) -> Result<()> {
        if !self.contains(&record.first) {
            return Err(ModelError::NotFound(record.first.to_string()));
        }
        if !self.contains(&record.second) {
            return Err(ModelError::NotFound(record.second.to_string()));
        }
        if let Some(first) = self.get_mut(&record.first) {
            first.elo_score = record.first_rating_after;
        }
        if let Some(second) = self.get_mut(&record.second) {
            second.elo_score = record.second_rating_after;
        }
        self.matches.push(record);
        Ok(())
    }

    pub fn record_meta_review(&mut self, record: MetaReviewRecord) {
        self.meta_reviews.push(record);
    }

    #[must_use]
    pub fn matches(&self) -> &[MatchRecord] {
        &self.matches
    }

    #[must_use]
    pub fn meta_reviews(&self) -> &[MetaReviewRecord] {
        &self.meta_reviews
    }

    #[must_use]
    pub fn latest_meta_review(&self) -> Option<&MetaReviewRecord> {
        self.meta_reviews.last()
    }

    #[must_use]
    pub const fn iteration(&self) -> u32 {
        self.iteration
    }

    /// Bumps the iteration counter; called once per completed cycle.
    pub fn advance_iteration(&mut self) -> u32 {
        self.iteration += 1;
        self.iteration
    }

    /// All ancestors of `id` in breadth-first order.
    pub fn lineage_of(&self, id: &HypothesisId) -> Result<Vec<HypothesisId>> {
        let start = self
            .get(id)
            .ok_or_else(|| ModelError::NotFound(id.to_string()))?;
        let mut seen: HashSet<HypothesisId> = HashSet::new();
        let mut queue: VecDeque<HypothesisId> = start.parent_ids.iter().cloned().collect();
        let mut ancestors = Vec::new();
        while let Some(next) = queue.pop_front() {
            if !seen.insert(next.clone()) {
                continue;
            }
            if let Some(parent) = self.get(&next) {
                queue.extend(parent.parent_ids.iter().cloned());
            }
            ancestors.push(next);
        }
        Ok(ancestors)
    }

    /// Rebuilds the id lookup after deserialization.
    pub(crate) fn rebuild_index(&mut self) {
        self.index = self
            .hypotheses
            .iter()
            .enumerate()
            .map(|(slot, h)| (h.id.clone(), slot))
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hypothesis(id: &str) -> Hypothesis {
        Hypothesis::new(id.into(), format!("Title {id}"), format!("Text {id}"))
    }

    #[test]
    fn insert_new_rejects_duplicate_ids() {
        let mut store = PopulationStore::new();
        store.insert_new(hypothesis("H1")).expect("first insert");
        let err = store.insert_new(hypothesis("H1")).expect_err("duplicate");
        assert!(matches!(err, ModelError::DuplicateId(_)));
    }

    #[test]
    fn insert_rejects_unknown_parents() {
        let mut store = PopulationStore::new();
        let orphan = Hypothesis::with_parents("E1".into(), "t", "x", vec!["H9".into()]);
        let err = store.insert_new(orphan).expect_err("missing parent");
        assert!(matches!(err, ModelError::UnknownParent(_)));
    }

    #[test]
    fn allocated_ids_never_repeat_across_origins() {
        let mut store = PopulationStore::new();
        let a = store.allocate_id(HypothesisOrigin::Generated);
        let b = store.allocate_id(HypothesisOrigin::Evolved);
        let c = store.allocate_id(HypothesisOrigin::Generated);
        assert_ne!(a, b);
        assert_ne!(b, c);
        assert_ne!(a, c);
        assert!(a.as_str().starts_with('H'));
        assert!(b.as_str().starts_with('E'));
    }

    #[test]
    fn active_filters_and_keeps_insertion_order() {
        let mut store = PopulationStore::new();
        store.insert_new(hypothesis("H1")).expect("insert");
        store.insert_new(hypothesis("H2")).expect("insert");
        store.insert_new(hypothesis("H3")).expect("insert");
        store.deactivate(&"H2".into()).expect("deactivate");

        let ids: Vec<&str> = store.active().iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, vec!["H1", "H3"]);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn commit_match_moves_both_ratings_and_appends_record() {
        let mut store = PopulationStore::new();
        store.insert_new(hypothesis("H1")).expect("insert");
        store.insert_new(hypothesis("H2")).expect("insert");

        store
            .commit_match(MatchRecord {
                first: "H1".into(),
                second: "H2".into(),
                winner: "H1".into(),
                first_rating_before: 1200.0,
                second_rating_before: 1200.0,
                first_rating_after: 1216.0,
                second_rating_after: 1184.0,
                iteration: 0,
            })
            .expect("commit");

        assert_eq!(store.get(&"H1".into()).map(|h| h.elo_score), Some(1216.0));
        assert_eq!(store.get(&"H2".into()).map(|h| h.elo_score), Some(1184.0));
        assert_eq!(store.matches().len(), 1);
    }

    #[test]
    fn commit_match_with_unknown_side_changes_nothing() {
        let mut store = PopulationStore::new();
        store.insert_new(hypothesis("H1")).expect("insert");

        let err = store
            .commit_match(MatchRecord {
                first: "H1".into(),
                second: "H9".into(),
                winner: "H1".into(),
                first_rating_before: 1200.0,
                second_rating_before: 1200.0,
                first_rating_after: 1216.0,
                second_rating_after: 1184.0,
                iteration: 0,
            })
            .expect_err("unknown side");
        assert!(matches!(err, ModelError::NotFound(_)));
        assert_eq!(store.get(&"H1".into()).map(|h| h.elo_score), Some(1200.0));
        assert!(store.matches().is_empty());
    }

    #[test]
    fn lineage_walk_covers_all_ancestors_once() {
        let mut store = PopulationStore::new();
        store.insert_new(hypothesis("H1")).expect("insert");
        store.insert_new(hypothesis("H2")).expect("insert");
        store
            .insert_new(Hypothesis::with_parents(
                "E3".into(),
                "child",
                "x",
                vec!["H1".into(), "H2".into()],
            ))
            .expect("insert child");
        store
            .insert_new(Hypothesis::with_parents(
                "E4".into(),
                "grandchild",
                "x",
                vec!["E3".into(), "H1".into()],
            ))
            .expect("insert grandchild");

        let lineage = store.lineage_of(&"E4".into()).expect("lineage");
        let names: Vec<&str> = lineage.iter().map(HypothesisId::as_str).collect();
        assert_eq!(names.len(), 3);
        assert!(names.contains(&"E3"));
        assert!(names.contains(&"H1"));
        assert!(names.contains(&"H2"));
    }

    #[test]
    fn iteration_advances_by_one() {
        let mut store = PopulationStore::new();
        assert_eq!(store.iteration(), 0);
        assert_eq!(store.advance_iteration(), 1);
        assert_eq!(store.advance_iteration(), 2);
    }
}
