use crate::error::Result;
use crate::types::{ProximityGraph, SimilarityEdge, SimilarityNode};
use coscientist_model::Hypothesis;
use coscientist_providers::Embedder;
use std::collections::HashMap;

/// Builds the proximity graph for one population snapshot.
///
/// Each distinct usable text is embedded exactly once per build. Hypotheses
/// with blank text never reach the embedder; every pair they appear in gets
/// similarity 0.0.
pub struct ProximityBuilder<'a> {
    embedder: &'a dyn Embedder,
}

impl<'a> ProximityBuilder<'a> {
    pub fn new(embedder: &'a dyn Embedder) -> Self {
        Self { embedder }
    }

    pub async fn build(&self, hypotheses: &[&Hypothesis]) -> Result<ProximityGraph> {
        let mut graph = ProximityGraph::new();

        // 1. Nodes for every hypothesis.
        let mut indices = Vec::with_capacity(hypotheses.len());
        for hypothesis in hypotheses {
            indices.push(graph.add_node(SimilarityNode {
                id: hypothesis.id.clone(),
                title: hypothesis.title.clone(),
            }));
        }

        // 2. Embed each distinct usable text once.
        let mut memo: HashMap<&str, usize> = HashMap::new();
        let mut distinct: Vec<&str> = Vec::new();
        for hypothesis in hypotheses {
            if hypothesis.text.trim().is_empty() {
                continue;
            }
            let text = hypothesis.text.as_str();
            if !memo.contains_key(text) {
                memo.insert(text, distinct.len());
                distinct.push(text);
            }
        }
        log::debug!(
            "Embedding {} distinct texts for {} hypotheses",
            distinct.len(),
            hypotheses.len()
        );
        let vectors = if distinct.is_empty() {
            Vec::new()
        } else {
            self.embedder.embed_batch(distinct).await?
        };

        // 3. One edge per unordered pair.
        for (i, first) in hypotheses.iter().enumerate() {
            let first_slot = memo.get(first.text.as_str()).copied();
            for (j, second) in hypotheses.iter().enumerate().skip(i + 1) {
                let second_slot = memo.get(second.text.as_str()).copied();
                let similarity = match (first_slot, second_slot) {
                    (Some(a), Some(b)) => {
                        cosine_similarity(&vectors[a], &vectors[b]).clamp(0.0, 1.0)
                    }
                    _ => 0.0,
                };
                graph.add_edge(indices[i], indices[j], SimilarityEdge { similarity });
            }
        }

        log::info!(
            "Built proximity graph: {} nodes, {} edges",
            graph.node_count(),
            graph.edge_count()
        );
        Ok(graph)
    }
}

/// Cosine similarity of two raw vectors; 0.0 for degenerate input.
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use coscientist_providers::HashEmbedder;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct CountingEmbedder {
        inner: HashEmbedder,
        batches: AtomicUsize,
        texts_embedded: Mutex<Vec<String>>,
    }

    impl CountingEmbedder {
        fn new() -> Self {
            Self {
                inner: HashEmbedder::new(64),
                batches: AtomicUsize::new(0),
                texts_embedded: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Embedder for CountingEmbedder {
        fn dimension(&self) -> usize {
            self.inner.dimension()
        }

        async fn embed_batch(&self, texts: Vec<&str>) -> coscientist_providers::Result<Vec<Vec<f32>>> {
            self.batches.fetch_add(1, Ordering::SeqCst);
            self.texts_embedded
                .lock()
                .expect("lock texts")
                .extend(texts.iter().map(ToString::to_string));
            self.inner.embed_batch(texts).await
        }
    }

    fn hypothesis(id: &str, text: &str) -> Hypothesis {
        Hypothesis::new(id.into(), format!("Title {id}"), text)
    }

    #[tokio::test]
    async fn similarities_are_symmetric_and_bounded() {
        let embedder = HashEmbedder::new(64);
        let a = hypothesis("H1", "Coral bleaching is driven by heat stress.");
        let b = hypothesis("H2", "Bleaching events follow marine heatwaves.");
        let c = hypothesis("H3", "Sea level rise erodes mangrove habitats.");

        let graph = ProximityBuilder::new(&embedder)
            .build(&[&a, &b, &c])
            .await
            .expect("build");

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 3);
        for (x, y) in [("H1", "H2"), ("H1", "H3"), ("H2", "H3")] {
            let forward = graph.similarity(&x.into(), &y.into()).expect("edge");
            let backward = graph.similarity(&y.into(), &x.into()).expect("edge");
            assert_eq!(forward, backward);
            assert!((0.0..=1.0).contains(&forward), "similarity {forward} out of range");
        }
    }

    #[tokio::test]
    async fn no_self_edges_exist() {
        let embedder = HashEmbedder::new(64);
        let a = hypothesis("H1", "some text");
        let b = hypothesis("H2", "other text");

        let graph = ProximityBuilder::new(&embedder)
            .build(&[&a, &b])
            .await
            .expect("build");

        assert!(graph.similarity(&"H1".into(), &"H1".into()).is_none());
        let neighbors = graph.neighbors(&"H1".into());
        assert!(neighbors.iter().all(|n| n.id.as_str() != "H1"));
    }

    #[tokio::test]
    async fn identical_texts_have_full_similarity() {
        let embedder = HashEmbedder::new(64);
        let a = hypothesis("H1", "exactly the same wording");
        let b = hypothesis("H2", "exactly the same wording");

        let graph = ProximityBuilder::new(&embedder)
            .build(&[&a, &b])
            .await
            .expect("build");

        let similarity = graph.similarity(&"H1".into(), &"H2".into()).expect("edge");
        assert!((similarity - 1.0).abs() < 1e-5);
    }

    #[tokio::test]
    async fn blank_texts_never_reach_the_embedder() {
        let embedder = CountingEmbedder::new();
        let a = hypothesis("H1", "real text");
        let b = hypothesis("H2", "");
        let c = hypothesis("H3", "   ");

        let graph = ProximityBuilder::new(&embedder)
            .build(&[&a, &b, &c])
            .await
            .expect("build");

        let embedded = embedder.texts_embedded.lock().expect("lock texts").clone();
        assert_eq!(embedded, vec!["real text"]);
        assert_eq!(graph.similarity(&"H1".into(), &"H2".into()), Some(0.0));
        assert_eq!(graph.similarity(&"H2".into(), &"H3".into()), Some(0.0));
    }

    #[tokio::test]
    async fn all_blank_population_makes_no_embedder_calls() {
        let embedder = CountingEmbedder::new();
        let a = hypothesis("H1", "");
        let b = hypothesis("H2", "   ");

        let graph = ProximityBuilder::new(&embedder)
            .build(&[&a, &b])
            .await
            .expect("build");

        assert_eq!(embedder.batches.load(Ordering::SeqCst), 0);
        assert_eq!(graph.similarity(&"H1".into(), &"H2".into()), Some(0.0));
    }

    #[tokio::test]
    async fn duplicate_texts_are_embedded_once_in_one_batch() {
        let embedder = CountingEmbedder::new();
        let a = hypothesis("H1", "shared wording");
        let b = hypothesis("H2", "shared wording");
        let c = hypothesis("H3", "unique wording");

        ProximityBuilder::new(&embedder)
            .build(&[&a, &b, &c])
            .await
            .expect("build");

        assert_eq!(embedder.batches.load(Ordering::SeqCst), 1);
        let embedded = embedder.texts_embedded.lock().expect("lock texts").clone();
        assert_eq!(embedded, vec!["shared wording", "unique wording"]);
    }

    #[test]
    fn cosine_of_orthogonal_vectors_is_zero() {
        let sim = cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]);
        assert!((sim - 0.0).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 0.0]), 0.0);
    }
}
