use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Identifier of a hypothesis within one session, e.g. `H3` or `E7`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HypothesisId(String);

impl HypothesisId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HypothesisId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for HypothesisId {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

/// How a hypothesis entered the population; decides its id prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HypothesisOrigin {
    Generated,
    Evolved,
}

impl HypothesisOrigin {
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Generated => "H",
            Self::Evolved => "E",
        }
    }
}

/// Qualitative grade a reviewer assigns to one axis of a hypothesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReviewGrade {
    High,
    Medium,
    Low,
}

impl ReviewGrade {
    /// Parses a grade from free-form reviewer text, case-insensitively.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }
}

impl fmt::Display for ReviewGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        };
        f.write_str(label)
    }
}

/// A candidate research hypothesis and everything the session knows about it.
///
/// Review fields stay `None` until the reflection stage fills them.
/// `references` has set semantics with stable iteration order so repeated
/// linking of the same paper is a no-op.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hypothesis {
    pub id: HypothesisId,
    pub title: String,
    pub text: String,
    pub novelty: Option<ReviewGrade>,
    pub feasibility: Option<ReviewGrade>,
    pub elo_score: f64,
    pub review_comments: Vec<String>,
    pub references: BTreeSet<String>,
    pub is_active: bool,
    pub parent_ids: Vec<HypothesisId>,
}

impl Hypothesis {
    /// Rating every hypothesis starts from.
    pub const INITIAL_ELO: f64 = 1200.0;

    pub fn new(id: HypothesisId, title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            text: text.into(),
            novelty: None,
            feasibility: None,
            elo_score: Self::INITIAL_ELO,
            review_comments: Vec::new(),
            references: BTreeSet::new(),
            is_active: true,
            parent_ids: Vec::new(),
        }
    }

    /// An evolved hypothesis recombined from `parents`.
    pub fn with_parents(
        id: HypothesisId,
        title: impl Into<String>,
        text: impl Into<String>,
        parents: Vec<HypothesisId>,
    ) -> Self {
        let mut hypothesis = Self::new(id, title, text);
        hypothesis.parent_ids = parents;
        hypothesis
    }

    pub fn add_review_comment(&mut self, comment: impl Into<String>) {
        self.review_comments.push(comment.into());
    }

    /// Attaches an arXiv identifier; returns false when it was already linked.
    pub fn add_reference(&mut self, arxiv_id: impl Into<String>) -> bool {
        self.references.insert(arxiv_id.into())
    }
}
