use coscientist_model::HypothesisId;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

/// Node payload: which hypothesis this is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarityNode {
    pub id: HypothesisId,
    pub title: String,
}

/// Edge payload: cosine similarity clamped to [0, 1].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SimilarityEdge {
    pub similarity: f32,
}

/// One neighbor of a hypothesis in the proximity graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    pub id: HypothesisId,
    pub similarity: f32,
}

/// Pairwise similarity structure over the active population.
///
/// Undirected, no self-edges, one edge per unordered pair regardless of how
/// small the similarity is. Filtering for display happens in the view layer.
pub struct ProximityGraph {
    pub graph: UnGraph<SimilarityNode, SimilarityEdge>,
    id_index: HashMap<HypothesisId, NodeIndex>,
}

impl ProximityGraph {
    pub(crate) fn new() -> Self {
        Self {
            graph: UnGraph::new_undirected(),
            id_index: HashMap::new(),
        }
    }

    pub(crate) fn add_node(&mut self, node: SimilarityNode) -> NodeIndex {
        let id = node.id.clone();
        let idx = self.graph.add_node(node);
        self.id_index.insert(id, idx);
        idx
    }

    pub(crate) fn add_edge(&mut self, a: NodeIndex, b: NodeIndex, edge: SimilarityEdge) {
        self.graph.add_edge(a, b, edge);
    }

    #[must_use]
    pub fn find_node(&self, id: &HypothesisId) -> Option<NodeIndex> {
        self.id_index.get(id).copied()
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Similarity between two distinct hypotheses, if both are present.
    #[must_use]
    pub fn similarity(&self, a: &HypothesisId, b: &HypothesisId) -> Option<f32> {
        let from = self.find_node(a)?;
        let to = self.find_node(b)?;
        let edge = self.graph.find_edge(from, to)?;
        self.graph.edge_weight(edge).map(|w| w.similarity)
    }

    /// Neighbors of `id` with their similarities, most similar first.
    #[must_use]
    pub fn neighbors(&self, id: &HypothesisId) -> Vec<Neighbor> {
        let Some(idx) = self.find_node(id) else {
            return Vec::new();
        };
        let mut neighbors: Vec<Neighbor> = self
            .graph
            .edges(idx)
            .map(|edge| {
                let other = if edge.source() == idx {
                    edge.target()
                } else {
                    edge.source()
                };
                Neighbor {
                    id: self.graph[other].id.clone(),
                    similarity: edge.weight().similarity,
                }
            })
            .collect();
        neighbors.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });
        neighbors
    }

    /// Full adjacency with every edge kept, keyed by hypothesis id.
    #[must_use]
    pub fn adjacency(&self) -> BTreeMap<HypothesisId, Vec<Neighbor>> {
        self.graph
            .node_indices()
            .map(|idx| {
                let node = &self.graph[idx];
                (node.id.clone(), self.neighbors(&node.id))
            })
            .collect()
    }
}
