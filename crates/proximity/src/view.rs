use crate::types::ProximityGraph;
use coscientist_model::HypothesisId;
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};

/// Edges at or below this similarity are hidden when rendering.
pub const RENDER_THRESHOLD: f32 = 0.2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewNode {
    pub id: HypothesisId,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewEdge {
    pub from: HypothesisId,
    pub to: HypothesisId,
    pub similarity: f32,
}

/// Render-ready projection of a [`ProximityGraph`].
///
/// The underlying graph keeps every pairwise edge; the view drops the ones at
/// or below the display threshold so dense populations stay legible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphView {
    pub nodes: Vec<ViewNode>,
    pub edges: Vec<ViewEdge>,
    pub threshold: f32,
}

impl GraphView {
    #[must_use]
    pub fn from_graph(graph: &ProximityGraph, threshold: f32) -> Self {
        let nodes = graph
            .graph
            .node_weights()
            .map(|node| ViewNode {
                id: node.id.clone(),
                label: node.title.clone(),
            })
            .collect();

        let mut edges: Vec<ViewEdge> = graph
            .graph
            .edge_references()
            .filter(|edge| edge.weight().similarity > threshold)
            .map(|edge| ViewEdge {
                from: graph.graph[edge.source()].id.clone(),
                to: graph.graph[edge.target()].id.clone(),
                similarity: edge.weight().similarity,
            })
            .collect();
        edges.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| (a.from.clone(), a.to.clone()).cmp(&(b.from.clone(), b.to.clone())))
        });

        Self {
            nodes,
            edges,
            threshold,
        }
    }

    /// View at the default display threshold.
    #[must_use]
    pub fn rendered(graph: &ProximityGraph) -> Self {
        Self::from_graph(graph, RENDER_THRESHOLD)
    }
}
