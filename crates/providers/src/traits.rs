use crate::error::{ProviderError, Result};
use async_trait::async_trait;
use coscientist_model::{HypothesisId, PaperSummary};

/// Text-producing collaborator, usually an LLM behind some transport.
///
/// Implementations own their retry behavior; callers treat a returned error
/// as final.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, temperature: f64) -> Result<String>;
}

/// What a judge sees of one contestant.
#[derive(Debug, Clone, Copy)]
pub struct Contender<'a> {
    pub id: &'a HypothesisId,
    pub title: &'a str,
    pub text: &'a str,
}

/// Outcome of one pairwise comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Winner(HypothesisId),
    NoDecision,
}

/// Collaborator that picks the better of two hypotheses for a goal.
#[async_trait]
pub trait PairwiseJudge: Send + Sync {
    async fn judge(
        &self,
        goal: &str,
        first: Contender<'_>,
        second: Contender<'_>,
    ) -> Result<Verdict>;
}

/// Maps text into a fixed-dimension vector, deterministically per input.
#[async_trait]
pub trait Embedder: Send + Sync {
    fn dimension(&self) -> usize;

    async fn embed_batch(&self, texts: Vec<&str>) -> Result<Vec<Vec<f32>>>;

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut embeddings = self.embed_batch(vec![text]).await?;
        embeddings
            .pop()
            .ok_or_else(|| ProviderError::Malformed("empty embedding result".to_string()))
    }
}

/// Looks up paper metadata for an arXiv identifier.
#[async_trait]
pub trait LiteratureResolver: Send + Sync {
    async fn resolve(&self, identifier: &str) -> Result<Option<PaperSummary>>;
}
