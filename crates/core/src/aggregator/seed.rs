use rust_decimal::Decimal;

use super::SCORE_DECIMAL_PLACES;
use crate::domain::compatibility::{CompatibilityStat, Dimension, PairKey};

/// Hand-curated starter pairs written before any catalog-derived build exists.
pub struct SeedRuleSet {
    pub dimension: Dimension,
    pub score: Decimal,
    pub rules: &'static [(&'static str, &'static [&'static str])],
}

const ARTICLE_RULES: &[(&str, &[&str])] = &[
    ("shirts", &["jeans", "trousers", "casual shoes"]),
    ("tshirts", &["jeans", "shorts", "casual shoes"]),
    ("kurtas", &["trousers", "sandals"]),
    ("tops", &["jeans", "heels"]),
];

const COLOR_RULES: &[(&str, &[&str])] = &[
    ("black", &["white", "grey", "blue"]),
    ("blue", &["white", "black", "grey"]),
    ("white", &["black", "blue", "brown"]),
    ("brown", &["beige", "white"]),
    ("red", &["black", "white"]),
];

pub fn starter_rule_sets() -> Vec<SeedRuleSet> {
    vec![
        SeedRuleSet {
            dimension: Dimension::Article,
            score: Decimal::new(7, 1),
            rules: ARTICLE_RULES,
        },
        SeedRuleSet { dimension: Dimension::Color, score: Decimal::new(6, 1), rules: COLOR_RULES },
    ]
}

/// Seeded stats carry a zero count; only a catalog build observes co-occurrence.
pub fn starter_stats() -> Vec<CompatibilityStat> {
    starter_rule_sets()
        .into_iter()
        .flat_map(|set| {
            let mut score = set.score;
            score.rescale(SCORE_DECIMAL_PLACES);
            set.rules.iter().flat_map(move |(from, targets)| {
                targets.iter().map(move |to| CompatibilityStat {
                    stat_type: set.dimension,
                    stat_key: PairKey::new(*from, *to).to_string(),
                    score,
                    count: 0,
                })
            })
        })
        .collect()
}
