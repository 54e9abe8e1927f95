use crate::error::{EngineError, Result};
use crate::parse::{self, HypothesisDraft, MetaReviewNotes, ReflectionNotes};
use crate::prompts;
use crate::report::{CycleReport, StagePayload, StageReport};
use crate::stage::Stage;
use coscientist_literature::{LiteratureError, ReferenceLinker};
use coscientist_model::{
    Hypothesis, HypothesisId, HypothesisOrigin, MetaReviewRecord, ModelError, PopulationStore,
    ReferenceSource, ResearchGoal, ReviewGrade,
};
use coscientist_providers::{
    Embedder, LiteratureResolver, NullSink, PairwiseJudge, ProviderError, SessionSink,
    StaticResolver, TextGenerator,
};
use coscientist_proximity::{GraphView, ProximityBuilder, ProximityError};
use coscientist_ranking::{ranked, RankingError, Standings, Tournament};
use std::sync::Arc;
use std::time::Instant;

/// Population policy applied when offspring are committed.
#[derive(Debug, Clone, Copy, Default)]
pub struct EvolutionPolicy {
    /// Deactivate the parent pool in the same commit that inserts offspring.
    pub retire_parents: bool,
}

/// How a stage ended when it did not commit normally.
enum StageError {
    /// Collaborator trouble: empty payload, error in the report, cycle
    /// proceeds.
    Degraded(String),
    /// Population inconsistency or misconfiguration: the cycle aborts.
    Fatal(EngineError),
}

type StageResult = std::result::Result<StagePayload, StageError>;

impl From<ProviderError> for StageError {
    fn from(err: ProviderError) -> Self {
        Self::Degraded(err.to_string())
    }
}

impl From<ModelError> for StageError {
    fn from(err: ModelError) -> Self {
        Self::Fatal(err.into())
    }
}

impl From<RankingError> for StageError {
    fn from(err: RankingError) -> Self {
        match err {
            RankingError::Judge(judge_err) => Self::Degraded(judge_err.to_string()),
            other => Self::Fatal(EngineError::DataIntegrity(other.to_string())),
        }
    }
}

impl From<ProximityError> for StageError {
    fn from(err: ProximityError) -> Self {
        Self::Degraded(err.to_string())
    }
}

impl From<LiteratureError> for StageError {
    fn from(err: LiteratureError) -> Self {
        Self::Fatal(EngineError::DataIntegrity(err.to_string()))
    }
}

/// Runs hypothesis evolution cycles against a population store.
///
/// One cycle walks [`Stage::SEQUENCE`] start to finish. Every stage computes
/// into local buffers and commits to the store only at its end, then dirty
/// state is mirrored through the [`SessionSink`]. A collaborator failure
/// degrades its stage inside the report; the store is the source of truth
/// and a degraded stage leaves it untouched.
pub struct CycleEngine {
    generator: Arc<dyn TextGenerator>,
    judge: Arc<dyn PairwiseJudge>,
    embedder: Arc<dyn Embedder>,
    resolver: Arc<dyn LiteratureResolver>,
    sink: Arc<dyn SessionSink>,
    evolution: EvolutionPolicy,
}

impl CycleEngine {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        judge: Arc<dyn PairwiseJudge>,
        embedder: Arc<dyn Embedder>,
    ) -> Self {
        Self {
            generator,
            judge,
            embedder,
            resolver: Arc::new(StaticResolver::default()),
            sink: Arc::new(NullSink),
            evolution: EvolutionPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_resolver(mut self, resolver: Arc<dyn LiteratureResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn SessionSink>) -> Self {
        self.sink = sink;
        self
    }

    #[must_use]
    pub fn with_evolution_policy(mut self, policy: EvolutionPolicy) -> Self {
        self.evolution = policy;
        self
    }

    /// Runs one full cycle and advances the store's iteration counter.
    ///
    /// Returns an error only for misconfigured goals and population
    /// integrity violations; collaborator failures are reported per stage.
    pub async fn run_cycle(
        &self,
        goal: &ResearchGoal,
        store: &mut PopulationStore,
    ) -> Result<CycleReport> {
        goal.validate()
            .map_err(|err| EngineError::Configuration(err.to_string()))?;

        let iteration = store.iteration() + 1;
        log::info!("Starting cycle {iteration}: {}", goal.description);

        let mut stages = Vec::with_capacity(Stage::SEQUENCE.len());
        for stage in Stage::SEQUENCE {
            let started = Instant::now();
            let outcome = self.run_stage(stage, goal, store).await;
            let duration_ms = started.elapsed().as_millis() as u64;
            let report = match outcome {
                Ok(payload) => StageReport {
                    stage,
                    duration_ms,
                    error: None,
                    payload,
                },
                Err(StageError::Degraded(message)) => {
                    log::warn!("Stage {stage} degraded: {message}");
                    StageReport {
                        stage,
                        duration_ms,
                        error: Some(message),
                        payload: StagePayload::Empty,
                    }
                }
                Err(StageError::Fatal(err)) => return Err(err),
            };
            log::debug!("Stage {stage} finished in {duration_ms}ms");
            stages.push(report);
        }

        store.advance_iteration();
        log::info!(
            "Cycle {iteration} complete: {} hypotheses, {} active",
            store.len(),
            store.active().len()
        );
        Ok(CycleReport { iteration, stages })
    }

    async fn run_stage(
        &self,
        stage: Stage,
        goal: &ResearchGoal,
        store: &mut PopulationStore,
    ) -> StageResult {
        match stage {
            Stage::Generation => self.generation(goal, store).await,
            Stage::Reflection | Stage::ReflectionEvolved => self.reflection(goal, store).await,
            Stage::Ranking | Stage::RankingFinal => self.ranking(goal, store).await,
            Stage::Evolution => self.evolution(goal, store).await,
            Stage::Proximity => self.proximity(store).await,
            Stage::MetaReview => self.meta_review(goal, store).await,
        }
    }

    async fn generation(&self, goal: &ResearchGoal, store: &mut PopulationStore) -> StageResult {
        let prompt = prompts::generation(goal, store.latest_meta_review());
        let raw = self
            .generator
            .generate(&prompt, goal.generation_temperature)
            .await?;
        let drafts: Vec<HypothesisDraft> = parse::json_payload(&raw)?;

        let mut created: Vec<(HypothesisId, String)> = Vec::with_capacity(drafts.len());
        for draft in drafts {
            let id = store.allocate_id(HypothesisOrigin::Generated);
            let hypothesis = Hypothesis::new(id.clone(), draft.title, draft.text);
            let text = hypothesis.text.clone();
            store.insert_new(hypothesis)?;
            created.push((id, text));
        }

        let linker = ReferenceLinker::new(self.resolver.as_ref(), self.sink.as_ref());
        for (id, text) in &created {
            self.flush_hypothesis(store, id).await;
            linker
                .link(store, id, text, ReferenceSource::Generation)
                .await?;
        }

        Ok(StagePayload::Hypotheses {
            hypotheses: self.snapshots(store, created.iter().map(|(id, _)| id)),
        })
    }

    /// Reviews every active hypothesis that has not been reviewed yet, which
    /// after generation means the fresh batch and after evolution means the
    /// offspring.
    async fn reflection(&self, goal: &ResearchGoal, store: &mut PopulationStore) -> StageResult {
        let pending: Vec<HypothesisId> = store
            .active()
            .into_iter()
            .filter(|h| h.novelty.is_none() && h.feasibility.is_none())
            .map(|h| h.id.clone())
            .collect();
        if pending.is_empty() {
            log::debug!("No unreviewed hypotheses; nothing to reflect on");
            return Ok(StagePayload::Hypotheses {
                hypotheses: Vec::new(),
            });
        }

        // 1. Collect every review before touching the store.
        let mut notes: Vec<(HypothesisId, ReflectionNotes)> = Vec::with_capacity(pending.len());
        for id in &pending {
            let prompt = {
                let hypothesis = store
                    .get(id)
                    .ok_or_else(|| ModelError::NotFound(id.to_string()))?;
                prompts::reflection(goal, hypothesis)
            };
            let raw = self
                .generator
                .generate(&prompt, goal.reflection_temperature)
                .await?;
            notes.push((id.clone(), parse::json_payload(&raw)?));
        }

        // 2. Commit the reviews, then mirror and link.
        let linker = ReferenceLinker::new(self.resolver.as_ref(), self.sink.as_ref());
        for (id, note) in &notes {
            let link_text = {
                let hypothesis = store
                    .get_mut(id)
                    .ok_or_else(|| ModelError::NotFound(id.to_string()))?;
                if let Some(grade) = note.novelty_review.as_deref().and_then(ReviewGrade::parse) {
                    hypothesis.novelty = Some(grade);
                }
                if let Some(grade) = note
                    .feasibility_review
                    .as_deref()
                    .and_then(ReviewGrade::parse)
                {
                    hypothesis.feasibility = Some(grade);
                }
                if let Some(comment) = &note.comment {
                    hypothesis.add_review_comment(comment.clone());
                }
                let mut text = note.comment.clone().unwrap_or_default();
                for reference in &note.references {
                    text.push(' ');
                    text.push_str(reference);
                }
                text
            };
            self.flush_hypothesis(store, id).await;
            linker
                .link(store, id, &link_text, ReferenceSource::Reflection)
                .await?;
        }

        Ok(StagePayload::Hypotheses {
            hypotheses: self.snapshots(store, notes.iter().map(|(id, _)| id)),
        })
    }

    async fn ranking(&self, goal: &ResearchGoal, store: &mut PopulationStore) -> StageResult {
        let tournament = Tournament::new(self.judge.as_ref(), goal.elo_k_factor);
        let run = tournament.run(&goal.description, store).await?;

        // Mirror updated ratings first, then the match history.
        let mut contestants: Vec<HypothesisId> = Vec::new();
        for record in &run.records {
            for id in [&record.first, &record.second] {
                if !contestants.contains(id) {
                    contestants.push(id.clone());
                }
            }
        }
        for id in &contestants {
            self.flush_hypothesis(store, id).await;
        }
        for record in &run.records {
            if let Err(err) = self.sink.append_match(record).await {
                log::warn!(
                    "Mirroring match {} vs {} failed: {err}",
                    record.first,
                    record.second
                );
            }
        }

        Ok(StagePayload::Tournament {
            matches: run.records,
            standings: Standings::of(store),
        })
    }

    async fn evolution(&self, goal: &ResearchGoal, store: &mut PopulationStore) -> StageResult {
        let parents: Vec<HypothesisId> = {
            let actives = store.active();
            if actives.len() < 2 {
                return Err(StageError::Degraded(
                    "fewer than two active hypotheses to recombine".to_string(),
                ));
            }
            ranked(&actives)
                .into_iter()
                .take(goal.top_k_hypotheses)
                .map(|h| h.id.clone())
                .collect()
        };

        let prompt = {
            let pool: Vec<&Hypothesis> = parents.iter().filter_map(|id| store.get(id)).collect();
            prompts::evolution(goal, &pool)
        };
        let raw = self
            .generator
            .generate(&prompt, goal.generation_temperature)
            .await?;
        let drafts: Vec<HypothesisDraft> = parse::json_payload(&raw)?;

        let mut created: Vec<(HypothesisId, String)> = Vec::with_capacity(drafts.len());
        for draft in drafts {
            let id = store.allocate_id(HypothesisOrigin::Evolved);
            let hypothesis =
                Hypothesis::with_parents(id.clone(), draft.title, draft.text, parents.clone());
            let text = hypothesis.text.clone();
            store.insert_new(hypothesis)?;
            created.push((id, text));
        }

        // Only retire parents when offspring actually arrived.
        if self.evolution.retire_parents && !created.is_empty() {
            for parent in &parents {
                store.deactivate(parent)?;
                self.flush_hypothesis(store, parent).await;
            }
        }

        let linker = ReferenceLinker::new(self.resolver.as_ref(), self.sink.as_ref());
        for (id, text) in &created {
            self.flush_hypothesis(store, id).await;
            linker
                .link(store, id, text, ReferenceSource::Generation)
                .await?;
        }

        Ok(StagePayload::Hypotheses {
            hypotheses: self.snapshots(store, created.iter().map(|(id, _)| id)),
        })
    }

    async fn proximity(&self, store: &PopulationStore) -> StageResult {
        let actives = store.active();
        let graph = ProximityBuilder::new(self.embedder.as_ref())
            .build(&actives)
            .await?;
        Ok(StagePayload::Proximity {
            adjacency: graph.adjacency(),
            view: GraphView::rendered(&graph),
        })
    }

    async fn meta_review(&self, goal: &ResearchGoal, store: &mut PopulationStore) -> StageResult {
        let iteration = store.iteration() + 1;
        let prompt = prompts::meta_review(goal, store);
        let raw = self
            .generator
            .generate(&prompt, goal.reflection_temperature)
            .await?;
        let notes: MetaReviewNotes = parse::json_payload(&raw)?;

        let record = MetaReviewRecord {
            critique: notes.critique.clone(),
            suggested_next_steps: notes.suggested_next_steps.clone(),
            iteration,
        };
        store.record_meta_review(record.clone());
        if let Err(err) = self.sink.append_meta_review(&record).await {
            log::warn!("Mirroring meta-review for cycle {iteration} failed: {err}");
        }

        Ok(StagePayload::MetaReview {
            critique: notes.critique,
            suggested_next_steps: notes.suggested_next_steps,
        })
    }

    async fn flush_hypothesis(&self, store: &PopulationStore, id: &HypothesisId) {
        if let Some(hypothesis) = store.get(id) {
            if let Err(err) = self.sink.upsert_hypothesis(hypothesis).await {
                log::warn!("Mirroring hypothesis {id} failed: {err}");
            }
        }
    }

    fn snapshots<'a>(
        &self,
        store: &PopulationStore,
        ids: impl Iterator<Item = &'a HypothesisId>,
    ) -> Vec<Hypothesis> {
        ids.filter_map(|id| store.get(id).cloned()).collect()
    }
}
