use crate::error::Result;
use crate::extract::{ArxivId, ReferenceExtractor};
use coscientist_model::{
    HypothesisId, ModelError, PopulationStore, ReferenceLink, ReferenceSource,
};
use coscientist_providers::{LiteratureResolver, SessionSink};

/// Attaches the papers a collaborator mentioned to the hypothesis that
/// mentioned them.
///
/// The population store is the source of truth; the sink mirror and the
/// metadata lookup are best-effort and never fail a linking pass.
pub struct ReferenceLinker<'a> {
    resolver: &'a dyn LiteratureResolver,
    sink: &'a dyn SessionSink,
}

impl<'a> ReferenceLinker<'a> {
    pub fn new(resolver: &'a dyn LiteratureResolver, sink: &'a dyn SessionSink) -> Self {
        Self { resolver, sink }
    }

    /// Extracts arXiv identifiers from `text` and links the new ones to
    /// `hypothesis`. Returns the identifiers that were not already linked.
    pub async fn link(
        &self,
        store: &mut PopulationStore,
        hypothesis: &HypothesisId,
        text: &str,
        source: ReferenceSource,
    ) -> Result<Vec<ArxivId>> {
        let ids = ReferenceExtractor::extract(text);
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let target = store
            .get_mut(hypothesis)
            .ok_or_else(|| ModelError::NotFound(hypothesis.to_string()))?;
        let mut added = Vec::new();
        for id in ids {
            if target.add_reference(id.as_str()) {
                added.push(id);
            }
        }

        let kind = source.kind();
        for id in &added {
            match self.resolver.resolve(id.as_str()).await {
                Ok(Some(paper)) => {
                    log::info!("Linked arXiv:{id} ({}) to {hypothesis} as {kind}", paper.title);
                }
                Ok(None) => {
                    log::debug!("Linked arXiv:{id} to {hypothesis} as {kind}, no metadata");
                }
                Err(err) => {
                    log::warn!("Metadata lookup for arXiv:{id} failed: {err}");
                }
            }
            let link = ReferenceLink {
                hypothesis: hypothesis.clone(),
                arxiv_id: id.as_str().to_string(),
                kind,
            };
            if let Err(err) = self.sink.link_reference(&link).await {
                log::warn!("Mirroring reference arXiv:{id} for {hypothesis} failed: {err}");
            }
        }
        Ok(added)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coscientist_model::{Hypothesis, PaperSummary, ReferenceKind};
    use coscientist_providers::{NullSink, RecordingSink, SinkEvent, StaticResolver};
    use pretty_assertions::assert_eq;

    fn store_with_one_hypothesis() -> PopulationStore {
        let mut store = PopulationStore::new();
        store
            .insert_new(Hypothesis::new("H1".into(), "Title", "Body"))
            .expect("insert");
        store
    }

    #[tokio::test]
    async fn links_extracted_identifiers_to_the_hypothesis() {
        let mut store = store_with_one_hypothesis();
        let resolver = StaticResolver::new([PaperSummary {
            identifier: "2301.12345".to_string(),
            title: "Attention Is Not Enough".to_string(),
            summary: "A study.".to_string(),
        }]);
        let sink = RecordingSink::new();
        let linker = ReferenceLinker::new(&resolver, &sink);

        let added = linker
            .link(
                &mut store,
                &"H1".into(),
                "Inspired by arXiv:2301.12345 and 1409.0473.",
                ReferenceSource::Generation,
            )
            .await
            .expect("link");

        assert_eq!(added.len(), 2);
        let hypothesis = store.get(&"H1".into()).expect("hypothesis");
        assert!(hypothesis.references.contains("2301.12345"));
        assert!(hypothesis.references.contains("1409.0473"));
        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[0],
            SinkEvent::Reference(ReferenceLink {
                hypothesis: "H1".into(),
                arxiv_id: "2301.12345".to_string(),
                kind: ReferenceKind::Inspiration,
            })
        );
    }

    #[tokio::test]
    async fn relinking_the_same_paper_is_a_no_op() {
        let mut store = store_with_one_hypothesis();
        let resolver = StaticResolver::new([]);
        let sink = RecordingSink::new();
        let linker = ReferenceLinker::new(&resolver, &sink);

        let first = linker
            .link(
                &mut store,
                &"H1".into(),
                "See arXiv:2301.12345.",
                ReferenceSource::Reflection,
            )
            .await
            .expect("link");
        let second = linker
            .link(
                &mut store,
                &"H1".into(),
                "Again, 2301.12345v3 applies.",
                ReferenceSource::Reflection,
            )
            .await
            .expect("relink");

        assert_eq!(first.len(), 1);
        assert!(second.is_empty());
        assert_eq!(store.get(&"H1".into()).expect("hypothesis").references.len(), 1);
        assert_eq!(sink.events().len(), 1);
    }

    #[tokio::test]
    async fn reflection_sources_become_citations() {
        let mut store = store_with_one_hypothesis();
        let resolver = StaticResolver::new([]);
        let sink = RecordingSink::new();
        let linker = ReferenceLinker::new(&resolver, &sink);

        linker
            .link(
                &mut store,
                &"H1".into(),
                "Cites 2107.03374.",
                ReferenceSource::Reflection,
            )
            .await
            .expect("link");

        match &sink.events()[0] {
            SinkEvent::Reference(link) => assert_eq!(link.kind, ReferenceKind::Citation),
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[tokio::test]
    async fn unknown_hypothesis_is_an_error() {
        let mut store = PopulationStore::new();
        let resolver = StaticResolver::new([]);
        let sink = NullSink;
        let linker = ReferenceLinker::new(&resolver, &sink);

        let result = linker
            .link(
                &mut store,
                &"H9".into(),
                "See arXiv:2301.12345.",
                ReferenceSource::Generation,
            )
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn text_without_identifiers_touches_nothing() {
        let mut store = store_with_one_hypothesis();
        let resolver = StaticResolver::new([]);
        let sink = RecordingSink::new();
        let linker = ReferenceLinker::new(&resolver, &sink);

        let added = linker
            .link(
                &mut store,
                &"H1".into(),
                "No papers here.",
                ReferenceSource::Generation,
            )
            .await
            .expect("link");

        assert!(added.is_empty());
        assert!(store.get(&"H1".into()).expect("hypothesis").references.is_empty());
        assert!(sink.events().is_empty());
    }
}
