use crate::hypothesis::HypothesisId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which stage surfaced an arXiv identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceSource {
    Generation,
    Reflection,
}

impl ReferenceSource {
    /// Role the reference plays for its hypothesis.
    #[must_use]
    pub const fn kind(self) -> ReferenceKind {
        match self {
            Self::Generation => ReferenceKind::Inspiration,
            Self::Reflection => ReferenceKind::Citation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    Inspiration,
    Citation,
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Inspiration => "inspiration",
            Self::Citation => "citation",
        };
        f.write_str(label)
    }
}

/// A hypothesis-to-paper link ready for persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceLink {
    pub hypothesis: HypothesisId,
    pub arxiv_id: String,
    pub kind: ReferenceKind,
}

/// Metadata for one paper the session knows about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperSummary {
    pub identifier: String,
    pub title: String,
    pub summary: String,
}
