//! Pairwise compatibility aggregation.
//!
//! Records are grouped by a grouping field, projected to one attribute per dimension,
//! paired within each group, counted across groups and normalized against the most
//! frequent pair. Every stage is a pure transform over already-loaded records.

pub mod grouping;
pub mod normalize;
pub mod pairing;
pub mod seed;

use serde::{Deserialize, Serialize};

use crate::domain::compatibility::{CompatibilityStat, Dimension, GroupingPolicy};
use crate::domain::product::{ProductRecord, GENDER_FIELD};

pub use grouping::{group_values, Groups};
pub use normalize::{normalize, normalized_score, ScoredPair, SCORE_DECIMAL_PLACES};
pub use pairing::{count_pairs, PairCounts};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationRequest {
    pub dimension: Dimension,
    pub grouping_field: String,
    pub policy: GroupingPolicy,
}

impl AggregationRequest {
    pub fn for_dimension(dimension: Dimension) -> Self {
        Self {
            dimension,
            grouping_field: GENDER_FIELD.to_string(),
            policy: dimension.default_policy(),
        }
    }

    pub fn with_grouping_field(mut self, grouping_field: impl Into<String>) -> Self {
        self.grouping_field = grouping_field.into();
        self
    }

    pub fn with_policy(mut self, policy: GroupingPolicy) -> Self {
        self.policy = policy;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Aggregation {
    pub dimension: Dimension,
    pub groups: usize,
    pub excluded_records: usize,
    pub pair_counts: PairCounts,
    pub stats: Vec<CompatibilityStat>,
}

pub fn aggregate(records: &[ProductRecord], request: &AggregationRequest) -> Aggregation {
    let groups = group_values(
        records,
        &request.grouping_field,
        request.dimension.target_field(),
        request.policy,
    );
    let pair_counts = count_pairs(&groups);
    let stats = emit(request.dimension, &pair_counts);

    Aggregation {
        dimension: request.dimension,
        groups: groups.len(),
        excluded_records: groups.excluded_records(),
        pair_counts,
        stats,
    }
}

/// One stat per directed pair, in ascending pair-key order.
pub fn emit(dimension: Dimension, counts: &PairCounts) -> Vec<CompatibilityStat> {
    normalize(counts)
        .into_iter()
        .map(|pair| CompatibilityStat {
            stat_type: dimension,
            stat_key: pair.key.to_string(),
            score: pair.score,
            count: pair.count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{aggregate, AggregationRequest};
    use crate::domain::compatibility::{CompatibilityStat, Dimension, GroupingPolicy};
    use crate::domain::product::ProductRecord;

    fn record(gender: &str, field: &str, value: &str) -> ProductRecord {
        ProductRecord::new().with_field("gender", gender).with_field(field, value)
    }

    fn rendered(stats: &[CompatibilityStat]) -> Vec<(String, u64, String)> {
        stats
            .iter()
            .map(|stat| (stat.stat_key.clone(), stat.count, stat.score.to_string()))
            .collect()
    }

    #[test]
    fn shirt_and_jeans_in_one_group_score_one() {
        let records = vec![
            record("men", "articleType", "shirt"),
            record("men", "articleType", "jeans"),
            record("men", "articleType", "jeans"),
        ];

        let request = AggregationRequest::for_dimension(Dimension::Article);
        let aggregation = aggregate(&records, &request);

        assert_eq!(
            rendered(&aggregation.stats),
            vec![
                ("jeans->shirt".to_string(), 1, "1.0000".to_string()),
                ("shirt->jeans".to_string(), 1, "1.0000".to_string()),
            ]
        );
        assert!(aggregation.stats.iter().all(|stat| stat.stat_type == Dimension::Article));
    }

    #[test]
    fn shared_pair_across_groups_counts_per_group() {
        let records = vec![
            record("men", "baseColour", "a"),
            record("men", "baseColour", "b"),
            record("women", "baseColour", "a"),
            record("women", "baseColour", "b"),
        ];

        let aggregation = aggregate(&records, &AggregationRequest::for_dimension(Dimension::Color));

        assert_eq!(
            rendered(&aggregation.stats),
            vec![
                ("a->b".to_string(), 2, "1.0000".to_string()),
                ("b->a".to_string(), 2, "1.0000".to_string()),
            ]
        );
        assert_eq!(aggregation.groups, 2);
    }

    #[test]
    fn usage_skips_single_value_groups() {
        let records = vec![
            record("men", "usage", "casual"),
            record("men", "usage", "casual"),
            record("women", "usage", "casual"),
            record("women", "usage", "formal"),
        ];

        let aggregation = aggregate(&records, &AggregationRequest::for_dimension(Dimension::Usage));

        assert_eq!(aggregation.groups, 1);
        assert_eq!(
            rendered(&aggregation.stats),
            vec![
                ("casual->formal".to_string(), 1, "1.0000".to_string()),
                ("formal->casual".to_string(), 1, "1.0000".to_string()),
            ]
        );
    }

    #[test]
    fn no_qualifying_records_yields_empty_output() {
        let records = vec![
            ProductRecord::new().with_field("gender", "men"),
            ProductRecord::new().with_field("usage", "casual"),
        ];

        let aggregation = aggregate(&records, &AggregationRequest::for_dimension(Dimension::Usage));

        assert!(aggregation.stats.is_empty());
        assert_eq!(aggregation.excluded_records, 2);
    }

    #[test]
    fn values_with_arrow_never_collide_on_stat_key() {
        let records = vec![
            record("men", "baseColour", "a->b"),
            record("men", "baseColour", "c"),
            record("men", "baseColour", "d"),
            record("women", "baseColour", "a"),
            record("women", "baseColour", "b->c"),
        ];

        let aggregation = aggregate(&records, &AggregationRequest::for_dimension(Dimension::Color));

        assert_eq!(
            rendered(&aggregation.stats),
            vec![
                ("c->d".to_string(), 1, "1.0000".to_string()),
                ("d->c".to_string(), 1, "1.0000".to_string()),
            ]
        );
        assert_eq!(aggregation.excluded_records, 2);
        let mut keys: Vec<_> = aggregation.stats.iter().map(|stat| &stat.stat_key).collect();
        keys.dedup();
        assert_eq!(keys.len(), aggregation.stats.len());
    }

    #[test]
    fn repeated_runs_produce_identical_stats() {
        let records = vec![
            record("men", "baseColour", "Black"),
            record("men", "baseColour", "White"),
            record("women", "baseColour", "Pink"),
            record("women", "baseColour", "White"),
            record("women", "baseColour", "Black"),
        ];
        let request = AggregationRequest::for_dimension(Dimension::Color);

        let first = aggregate(&records, &request);
        let second = aggregate(&records, &request);

        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first.stats).expect("serialize"),
            serde_json::to_string(&second.stats).expect("serialize")
        );
    }

    #[test]
    fn input_order_does_not_change_output() {
        let mut records = vec![
            record("men", "articleType", "Shirts"),
            record("women", "articleType", "Tops"),
            record("men", "articleType", "Jeans"),
            record("women", "articleType", "Jeans"),
            record("boys", "articleType", "Shirts"),
            record("boys", "articleType", "Jeans"),
        ];
        let request = AggregationRequest::for_dimension(Dimension::Article);
        let forward = aggregate(&records, &request);
        records.reverse();
        let backward = aggregate(&records, &request);

        assert_eq!(forward.stats, backward.stats);
        let top = forward.stats.iter().find(|stat| stat.stat_key == "Jeans->Shirts");
        assert_eq!(top.map(|stat| (stat.count, stat.score)), Some((2, Decimal::ONE)));
    }

    #[test]
    fn grouping_field_and_policy_are_call_time_parameters() {
        let records = vec![
            ProductRecord::new().with_field("season", "Summer").with_field("usage", "Casual"),
            ProductRecord::new().with_field("season", "Summer").with_field("usage", "Casual"),
            ProductRecord::new().with_field("season", "Winter").with_field("usage", "Formal"),
        ];
        let request = AggregationRequest::for_dimension(Dimension::Usage)
            .with_grouping_field("season")
            .with_policy(GroupingPolicy::CollectAll);

        let aggregation = aggregate(&records, &request);

        assert_eq!(aggregation.groups, 2);
        assert!(aggregation.stats.is_empty());
    }
}
