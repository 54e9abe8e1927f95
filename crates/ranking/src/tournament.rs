use crate::elo::updated_ratings;
use crate::error::{RankingError, Result};
use crate::pairing::pair_up;
use coscientist_model::{HypothesisId, MatchRecord, PopulationStore};
use coscientist_providers::{Contender, PairwiseJudge, Verdict};
use std::collections::HashMap;

/// Summary of one completed ranking stage.
#[derive(Debug, Clone, Default)]
pub struct TournamentRun {
    pub records: Vec<MatchRecord>,
    pub pairs_judged: usize,
    pub no_decisions: usize,
}

/// Runs the matches for one ranking stage and commits the outcomes.
///
/// Judgments accumulate in a local buffer; the store is only touched after
/// every pair has been judged. A failed judge call therefore leaves all
/// ratings exactly as they were, and a no-decision changes nothing for its
/// pair.
pub struct Tournament<'a> {
    judge: &'a dyn PairwiseJudge,
    k_factor: f64,
}

impl<'a> Tournament<'a> {
    pub fn new(judge: &'a dyn PairwiseJudge, k_factor: f64) -> Self {
        Self { judge, k_factor }
    }

    pub async fn run(&self, goal: &str, store: &mut PopulationStore) -> Result<TournamentRun> {
        let pairs = pair_up(&store.active());
        if pairs.is_empty() {
            log::debug!("Fewer than two active hypotheses; nothing to rank");
            return Ok(TournamentRun::default());
        }

        // Records carry the cycle being played; the store counter only
        // advances once the whole cycle completes.
        let iteration = store.iteration() + 1;

        // 1. Judge every pair, tracking ratings locally so later pairs see
        //    earlier outcomes.
        let mut working: HashMap<HypothesisId, f64> = store
            .active()
            .iter()
            .map(|h| (h.id.clone(), h.elo_score))
            .collect();
        let mut records: Vec<MatchRecord> = Vec::new();
        let mut no_decisions = 0usize;

        for (first_id, second_id) in &pairs {
            let verdict = {
                let first = store
                    .get(first_id)
                    .ok_or_else(|| RankingError::UnknownContestant(first_id.to_string()))?;
                let second = store
                    .get(second_id)
                    .ok_or_else(|| RankingError::UnknownContestant(second_id.to_string()))?;
                self.judge
                    .judge(
                        goal,
                        Contender {
                            id: &first.id,
                            title: &first.title,
                            text: &first.text,
                        },
                        Contender {
                            id: &second.id,
                            title: &second.title,
                            text: &second.text,
                        },
                    )
                    .await?
            };

            match verdict {
                Verdict::NoDecision => {
                    log::debug!("No decision for {first_id} vs {second_id}");
                    no_decisions += 1;
                }
                Verdict::Winner(winner) => {
                    if winner != *first_id && winner != *second_id {
                        return Err(RankingError::UnknownContestant(winner.to_string()));
                    }
                    let rating_first = working[first_id];
                    let rating_second = working[second_id];
                    let first_won = winner == *first_id;
                    let (after_first, after_second) =
                        updated_ratings(rating_first, rating_second, first_won, self.k_factor);
                    working.insert(first_id.clone(), after_first);
                    working.insert(second_id.clone(), after_second);
                    records.push(MatchRecord {
                        first: first_id.clone(),
                        second: second_id.clone(),
                        winner,
                        first_rating_before: rating_first,
                        second_rating_before: rating_second,
                        first_rating_after: after_first,
                        second_rating_after: after_second,
                        iteration,
                    });
                }
            }
        }

        // 2. Commit the decided matches in order.
        for record in &records {
            store.commit_match(record.clone())?;
        }

        log::info!(
            "Ranked {} pairs: {} decided, {} undecided",
            pairs.len(),
            records.len(),
            no_decisions
        );

        Ok(TournamentRun {
            pairs_judged: pairs.len(),
            no_decisions,
            records,
        })
    }
}
