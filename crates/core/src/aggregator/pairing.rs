use std::collections::{BTreeMap, BTreeSet};

use super::grouping::Groups;
use crate::domain::compatibility::PairKey;

/// Symmetric directed pair counts: `count(a->b) == count(b->a)` for every pair.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PairCounts {
    counts: BTreeMap<PairKey, u64>,
}

impl PairCounts {
    pub fn get(&self, key: &PairKey) -> u64 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Iterates in ascending pair-key order.
    pub fn iter(&self) -> impl Iterator<Item = (&PairKey, u64)> {
        self.counts.iter().map(|(key, count)| (key, *count))
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn max_count(&self) -> Option<u64> {
        self.counts.values().copied().max()
    }

    fn with_group(mut self, values: &[String]) -> Self {
        let distinct: Vec<&str> =
            values.iter().map(String::as_str).collect::<BTreeSet<_>>().into_iter().collect();

        for (index, a) in distinct.iter().enumerate() {
            for b in &distinct[index + 1..] {
                *self.counts.entry(PairKey::new(*a, *b)).or_insert(0) += 1;
                *self.counts.entry(PairKey::new(*b, *a)).or_insert(0) += 1;
            }
        }

        self
    }
}

/// Counts, across all groups, how many groups each unordered pair of distinct values
/// shares. Values are enumerated in byte-lexicographic order.
pub fn count_pairs(groups: &Groups) -> PairCounts {
    groups.iter().fold(PairCounts::default(), |counts, (_, values)| counts.with_group(values))
}
