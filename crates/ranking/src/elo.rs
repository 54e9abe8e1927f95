/// Probability that a player rated `rating_a` beats one rated `rating_b`.
#[must_use]
pub fn expected_score(rating_a: f64, rating_b: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf((rating_b - rating_a) / 400.0))
}

/// Both ratings after a decided game.
///
/// The winner moves up and the loser down, each by the K-scaled surprise of
/// the result. At equal old ratings the two moves have equal magnitude.
#[must_use]
pub fn updated_ratings(first: f64, second: f64, first_won: bool, k_factor: f64) -> (f64, f64) {
    let expected_first = expected_score(first, second);
    let expected_second = expected_score(second, first);
    let (actual_first, actual_second) = if first_won { (1.0, 0.0) } else { (0.0, 1.0) };
    (
        first + k_factor * (actual_first - expected_first),
        second + k_factor * (actual_second - expected_second),
    )
}
