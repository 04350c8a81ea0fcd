use std::collections::{BTreeMap, BTreeSet};

use crate::domain::compatibility::{GroupingPolicy, PairKey};
use crate::domain::product::ProductRecord;

/// Attribute values observed under each grouping-key value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Groups {
    groups: BTreeMap<String, Vec<String>>,
    excluded_records: usize,
}

impl Groups {
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.groups.get(key).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.groups.iter().map(|(key, values)| (key.as_str(), values.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Records skipped because the grouping or target field was missing or empty, or the
    /// target value contains the pair-key separator.
    pub fn excluded_records(&self) -> usize {
        self.excluded_records
    }
}

pub fn group_values<'a, I>(
    records: I,
    grouping_field: &str,
    target_field: &str,
    policy: GroupingPolicy,
) -> Groups
where
    I: IntoIterator<Item = &'a ProductRecord>,
{
    let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut seen: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    let mut excluded_records = 0;

    for record in records {
        let (Some(key), Some(value)) = (record.get(grouping_field), record.get(target_field))
        else {
            excluded_records += 1;
            continue;
        };
        if value.contains(PairKey::SEPARATOR) {
            excluded_records += 1;
            continue;
        }

        let values = groups.entry(key.to_string()).or_default();
        match policy {
            GroupingPolicy::CollectAll => values.push(value.to_string()),
            GroupingPolicy::UniqueWithMinimum { .. } => {
                if seen.entry(key.to_string()).or_default().insert(value.to_string()) {
                    values.push(value.to_string());
                }
            }
        }
    }

    if let GroupingPolicy::UniqueWithMinimum { min_distinct } = policy {
        groups.retain(|_, values| values.len() >= min_distinct);
    }

    Groups { groups, excluded_records }
}
