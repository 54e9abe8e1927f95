//! # Proximity Analysis
//!
//! Embedding-based similarity graph over the active hypothesis population.
//!
//! [`ProximityBuilder`] embeds each distinct hypothesis text once per build
//! and scores every unordered pair with clamped cosine similarity, yielding a
//! complete [`ProximityGraph`]. [`GraphView`] projects that graph for display,
//! hiding edges at or below [`RENDER_THRESHOLD`] while the full adjacency
//! stays queryable.

mod builder;
mod error;
mod types;
mod view;

pub use builder::{cosine_similarity, ProximityBuilder};
pub use error::{ProximityError, Result};
pub use types::{Neighbor, ProximityGraph, SimilarityEdge, SimilarityNode};
pub use view::{GraphView, ViewEdge, ViewNode, RENDER_THRESHOLD};
