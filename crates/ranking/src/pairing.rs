use crate::standings::ranked;
use coscientist_model::{Hypothesis, HypothesisId};

/// Round-robin is quadratic in the population; past this size one
/// rating-adjacent ladder pass keeps a stage linear.
pub const ROUND_ROBIN_LIMIT: usize = 12;

/// Deterministic match-ups for one tournament stage.
///
/// With [`ROUND_ROBIN_LIMIT`] or fewer contestants every unordered pair
/// plays once. Above that, contestants are ranked and each plays its rating
/// neighbor, so close ratings are still contested.
#[must_use]
pub fn pair_up(active: &[&Hypothesis]) -> Vec<(HypothesisId, HypothesisId)> {
    if active.len() < 2 {
        return Vec::new();
    }

    let sorted = ranked(active);
    if sorted.len() <= ROUND_ROBIN_LIMIT {
        let mut pairs = Vec::with_capacity(sorted.len() * (sorted.len() - 1) / 2);
        for (i, first) in sorted.iter().enumerate() {
            for second in &sorted[i + 1..] {
                pairs.push((first.id.clone(), second.id.clone()));
            }
        }
        pairs
    } else {
        sorted
            .windows(2)
            .map(|pair| (pair[0].id.clone(), pair[1].id.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn rated(id: &str, elo: f64) -> Hypothesis {
        let mut h = Hypothesis::new(id.into(), "t", "x");
        h.elo_score = elo;
        h
    }

    #[test]
    fn small_population_plays_full_round_robin() {
        let hs: Vec<Hypothesis> = (1..=4).map(|i| rated(&format!("H{i}"), 1200.0)).collect();
        let refs: Vec<&Hypothesis> = hs.iter().collect();

        let pairs = pair_up(&refs);
        assert_eq!(pairs.len(), 6);

        let unordered: HashSet<(String, String)> = pairs
            .iter()
            .map(|(a, b)| {
                let (x, y) = if a < b { (a, b) } else { (b, a) };
                (x.to_string(), y.to_string())
            })
            .collect();
        assert_eq!(unordered.len(), 6, "every unordered pair plays exactly once");
    }

    #[test]
    fn large_population_plays_rating_adjacent_ladder() {
        let hs: Vec<Hypothesis> = (0..20)
            .map(|i| rated(&format!("H{i:02}"), 1200.0 + f64::from(i) * 10.0))
            .collect();
        let refs: Vec<&Hypothesis> = hs.iter().collect();

        let pairs = pair_up(&refs);
        assert_eq!(pairs.len(), 19);
        assert_eq!(pairs[0].0.as_str(), "H19");
        assert_eq!(pairs[0].1.as_str(), "H18");
        assert_eq!(pairs[18].1.as_str(), "H00");
    }

    #[test]
    fn pairing_is_stable_across_calls() {
        let hs: Vec<Hypothesis> = (1..=5).map(|i| rated(&format!("H{i}"), 1200.0)).collect();
        let refs: Vec<&Hypothesis> = hs.iter().collect();
        assert_eq!(pair_up(&refs), pair_up(&refs));
    }

    #[test]
    fn fewer_than_two_contestants_yields_no_pairs() {
        assert!(pair_up(&[]).is_empty());
        let only = rated("H1", 1200.0);
        assert!(pair_up(&[&only]).is_empty());
    }
}
