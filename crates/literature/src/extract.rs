use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// `arXiv:2301.12345v2` with optional whitespace after the prefix.
static PREFIXED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)arxiv:\s*(\d{4}\.\d{4,5})(?:v\d+)?\b").expect("valid pattern"));

/// `2301.12345v2` standing on its own.
static BARE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{4}\.\d{4,5})(?:v\d+)?\b").expect("valid pattern"));

/// Pre-2007 identifiers such as `hep-th/9901001` or `math.GT/0309136`.
static LEGACY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b[a-z-]+(?:\.[a-z]{2})?/\d{7}(?:v\d+)?\b").expect("valid pattern")
});

/// Normalized new-style arXiv identifier, version suffix removed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArxivId(String);

impl ArxivId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArxivId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<ArxivId> for String {
    fn from(id: ArxivId) -> Self {
        id.0
    }
}

/// Pulls normalized arXiv identifiers out of free-form collaborator text.
pub struct ReferenceExtractor;

impl ReferenceExtractor {
    /// Extracts every new-style identifier mentioned in `text`.
    ///
    /// Legacy `category/NNNNNNN` identifiers are recognized and dropped.
    /// Prefixed mentions are collected before bare ones; duplicates keep
    /// their first-seen position.
    #[must_use]
    pub fn extract(text: &str) -> Vec<ArxivId> {
        let cleaned = LEGACY.replace_all(text, " ");

        let mut seen: HashSet<String> = HashSet::new();
        let mut ids = Vec::new();
        for pattern in [&PREFIXED, &BARE] {
            for captures in pattern.captures_iter(&cleaned) {
                let id = &captures[1];
                if seen.insert(id.to_string()) {
                    ids.push(ArxivId(id.to_string()));
                }
            }
        }
        ids
    }
}
