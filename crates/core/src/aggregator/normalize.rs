use rust_decimal::{Decimal, RoundingStrategy};

use super::pairing::PairCounts;
use crate::domain::compatibility::PairKey;

pub const SCORE_DECIMAL_PLACES: u32 = 4;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoredPair {
    pub key: PairKey,
    pub count: u64,
    pub score: Decimal,
}

/// Scores every pair against the largest count. An empty map normalizes against 1.
pub fn normalize(counts: &PairCounts) -> Vec<ScoredPair> {
    let max_count = counts.max_count().unwrap_or(1);

    counts
        .iter()
        .map(|(key, count)| ScoredPair {
            key: key.clone(),
            count,
            score: normalized_score(count, max_count),
        })
        .collect()
}

/// `count / max_count`, rounded half-to-even and fixed at four decimal places.
pub fn normalized_score(count: u64, max_count: u64) -> Decimal {
    let ratio = Decimal::from(count) / Decimal::from(max_count.max(1));
    let mut score =
        ratio.round_dp_with_strategy(SCORE_DECIMAL_PLACES, RoundingStrategy::MidpointNearestEven);
    score.rescale(SCORE_DECIMAL_PLACES);
    score
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rust_decimal::Decimal;

    use super::{normalize, normalized_score};
    use crate::aggregator::grouping::group_values;
    use crate::aggregator::pairing::{count_pairs, PairCounts};
    use crate::domain::compatibility::GroupingPolicy;
    use crate::domain::product::ProductRecord;

    fn dec(value: &str) -> Decimal {
        Decimal::from_str(value).expect("decimal literal")
    }

    #[test]
    fn maximum_normalizes_to_one_with_four_places() {
        let score = normalized_score(7, 7);

        assert_eq!(score, Decimal::ONE);
        assert_eq!(score.to_string(), "1.0000");
    }

    #[test]
    fn repeating_fractions_round_to_four_places() {
        assert_eq!(normalized_score(1, 3).to_string(), "0.3333");
        assert_eq!(normalized_score(2, 3).to_string(), "0.6667");
    }

    #[test]
    fn exact_midpoints_round_to_even() {
        // 1/32 = 0.03125 and 3/32 = 0.09375
        assert_eq!(normalized_score(1, 32), dec("0.0312"));
        assert_eq!(normalized_score(3, 32), dec("0.0938"));
    }

    #[test]
    fn zero_max_is_treated_as_one() {
        assert_eq!(normalized_score(0, 0).to_string(), "0.0000");
    }

    #[test]
    fn empty_counts_normalize_to_nothing() {
        assert!(normalize(&PairCounts::default()).is_empty());
    }

    #[test]
    fn scores_stay_within_unit_interval() {
        let records: Vec<ProductRecord> = [
            ("men", "black"),
            ("men", "white"),
            ("men", "blue"),
            ("women", "black"),
            ("women", "white"),
            ("boys", "black"),
            ("boys", "white"),
            ("girls", "blue"),
            ("girls", "pink"),
        ]
        .iter()
        .map(|(gender, colour)| {
            ProductRecord::new().with_field("gender", *gender).with_field("baseColour", *colour)
        })
        .collect();
        let groups = group_values(&records, "gender", "baseColour", GroupingPolicy::CollectAll);
        let counts = count_pairs(&groups);

        let scored = normalize(&counts);

        assert_eq!(scored.len(), counts.len());
        assert!(scored
            .iter()
            .all(|pair| pair.score >= Decimal::ZERO && pair.score <= Decimal::ONE));
        assert!(scored.iter().any(|pair| pair.score == Decimal::ONE));
        let black_white = scored
            .iter()
            .find(|pair| pair.key.from == "black" && pair.key.to == "white")
            .expect("black->white scored");
        assert_eq!(black_white.count, 3);
        assert_eq!(black_white.score.to_string(), "1.0000");
        let blue_pink = scored
            .iter()
            .find(|pair| pair.key.from == "blue" && pair.key.to == "pink")
            .expect("blue->pink scored");
        assert_eq!(blue_pink.score.to_string(), "0.3333");
    }
}
