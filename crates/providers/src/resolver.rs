use crate::error::Result;
use crate::traits::LiteratureResolver;
use async_trait::async_trait;
use coscientist_model::PaperSummary;
use std::collections::HashMap;

/// Resolver backed by an in-memory catalog, keyed by arXiv identifier.
#[derive(Debug, Default, Clone)]
pub struct StaticResolver {
    papers: HashMap<String, PaperSummary>,
}

impl StaticResolver {
    pub fn new<I>(papers: I) -> Self
    where
        I: IntoIterator<Item = PaperSummary>,
    {
        Self {
            papers: papers
                .into_iter()
                .map(|paper| (paper.identifier.clone(), paper))
                .collect(),
        }
    }

    pub fn insert(&mut self, paper: PaperSummary) {
        self.papers.insert(paper.identifier.clone(), paper);
    }
}

#[async_trait]
impl LiteratureResolver for StaticResolver {
    async fn resolve(&self, identifier: &str) -> Result<Option<PaperSummary>> {
        Ok(self.papers.get(identifier).cloned())
    }
}
