use serde::{Deserialize, Serialize};
use std::fmt;

/// The eight stages of one evolution cycle, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Generation,
    Reflection,
    Ranking,
    Evolution,
    ReflectionEvolved,
    RankingFinal,
    Proximity,
    MetaReview,
}

impl Stage {
    /// Execution order. The engine iterates this and nothing else, so stages
    /// can never be skipped or reordered.
    pub const SEQUENCE: [Stage; 8] = [
        Stage::Generation,
        Stage::Reflection,
        Stage::Ranking,
        Stage::Evolution,
        Stage::ReflectionEvolved,
        Stage::RankingFinal,
        Stage::Proximity,
        Stage::MetaReview,
    ];

    /// Stable report key for this stage.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Generation => "generation",
            Self::Reflection => "reflection",
            Self::Ranking => "ranking",
            Self::Evolution => "evolution",
            Self::ReflectionEvolved => "reflection_evolved",
            Self::RankingFinal => "ranking_final",
            Self::Proximity => "proximity",
            Self::MetaReview => "meta_review",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_starts_with_generation_and_ends_with_meta_review() {
        assert_eq!(Stage::SEQUENCE.len(), 8);
        assert_eq!(Stage::SEQUENCE[0], Stage::Generation);
        assert_eq!(Stage::SEQUENCE[7], Stage::MetaReview);
    }

    #[test]
    fn keys_are_unique() {
        let mut keys: Vec<&str> = Stage::SEQUENCE.iter().map(|s| s.key()).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), 8);
    }
}
