//! Elo rating calculation.
//!
//! This module provides the pairwise rating update applied after every
//! decided comparison. The magnitude of the adjustment scales with the
//! deviation between expected and actual outcome, bounded by the K-factor.

/// Calculate the expected score for a player against an opponent.
///
/// Always in the open interval (0, 1). The expected scores of the two sides
/// of a match sum to exactly 1, which is what keeps the update symmetric.
pub fn expected_score(rating: i32, opponent_rating: i32) -> f64 {
    1.0 / (1.0 + 10_f64.powf((opponent_rating - rating) as f64 / 400.0))
}

/// Calculate the new ratings for the winner and loser of a decided match.
///
/// Each side moves by `K * (actual - expected)`, where actual is 1 for the
/// winner and 0 for the loser. Results are rounded half away from zero
/// (`f64::round`) to the nearest integer rating unit.
pub fn rate_match(winner_rating: i32, loser_rating: i32, k: f64) -> (i32, i32) {
    let expected_winner = expected_score(winner_rating, loser_rating);
    let expected_loser = expected_score(loser_rating, winner_rating);

    let new_winner = (winner_rating as f64 + k * (1.0 - expected_winner)).round() as i32;
    let new_loser = (loser_rating as f64 + k * (0.0 - expected_loser)).round() as i32;

    (new_winner, new_loser)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const K: f64 = 32.0;

    #[test]
    fn test_expected_score_equal_ratings() {
        let expected = expected_score(1200, 1200);
        assert!((expected - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_expected_score_higher_rated() {
        let expected = expected_score(1400, 1200);
        assert!(expected > 0.7);
        assert!(expected < 0.8);
    }

    #[test]
    fn test_expected_score_lower_rated() {
        let expected = expected_score(1000, 1200);
        assert!(expected < 0.3);
        assert!(expected > 0.2);
    }

    #[test]
    fn test_equal_ratings_split_sixteen() {
        // 1200 vs 1200 at K=32: expected score is exactly 0.5 on each side.
        let (winner, loser) = rate_match(1200, 1200, K);
        assert_eq!(winner, 1216);
        assert_eq!(loser, 1184);
    }

    #[test]
    fn test_underdog_bonus_on_rematch() {
        // After 1200/1200 -> 1216/1184, the 1184 side winning the rematch
        // gains more than 16 points.
        let (winner, _) = rate_match(1184, 1216, K);
        assert!(winner - 1184 > 16);
    }

    #[test]
    fn test_favorite_gains_less_than_baseline() {
        let (winner, _) = rate_match(1216, 1184, K);
        assert!(winner - 1216 < 16);
    }

    proptest! {
        #[test]
        fn expected_scores_sum_to_one(a in 0i32..4000, b in 0i32..4000) {
            let sum = expected_score(a, b) + expected_score(b, a);
            prop_assert!((sum - 1.0).abs() < 1e-9);
        }

        #[test]
        fn deltas_bounded_by_k(a in 0i32..4000, b in 0i32..4000) {
            let (new_winner, new_loser) = rate_match(a, b, K);
            let winner_delta = new_winner - a;
            let loser_delta = new_loser - b;
            prop_assert!(winner_delta >= 0 && winner_delta <= K as i32);
            prop_assert!(loser_delta <= 0 && loser_delta >= -(K as i32));
        }

        #[test]
        fn winner_never_loses_ground(a in 0i32..4000, b in 0i32..4000) {
            let (new_winner, new_loser) = rate_match(a, b, K);
            prop_assert!(new_winner >= a);
            prop_assert!(new_loser <= b);
        }
    }
}
