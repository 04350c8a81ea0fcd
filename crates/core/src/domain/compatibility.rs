use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::product::{ARTICLE_TYPE_FIELD, BASE_COLOUR_FIELD, USAGE_FIELD};
use crate::errors::DomainError;

/// Attribute dimension whose pairwise compatibility is scored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Dimension {
    Article,
    Color,
    Usage,
}

impl Dimension {
    pub const ALL: [Dimension; 3] = [Dimension::Article, Dimension::Color, Dimension::Usage];

    /// Tag stored as `stat_type` next to every emitted stat.
    pub fn stat_type(self) -> &'static str {
        match self {
            Self::Article => "ARTICLE",
            Self::Color => "COLOR",
            Self::Usage => "USAGE",
        }
    }

    /// Catalog field projected for this dimension.
    pub fn target_field(self) -> &'static str {
        match self {
            Self::Article => ARTICLE_TYPE_FIELD,
            Self::Color => BASE_COLOUR_FIELD,
            Self::Usage => USAGE_FIELD,
        }
    }

    pub fn default_policy(self) -> GroupingPolicy {
        match self {
            Self::Article | Self::Color => GroupingPolicy::CollectAll,
            Self::Usage => GroupingPolicy::UniqueWithMinimum { min_distinct: 2 },
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.stat_type())
    }
}

impl std::str::FromStr for Dimension {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "article" | "article_type" | "articletype" => Ok(Self::Article),
            "color" | "colour" | "base_colour" | "basecolour" => Ok(Self::Color),
            "usage" => Ok(Self::Usage),
            _ => Err(DomainError::UnsupportedDimension(value.trim().to_string())),
        }
    }
}

/// How projected values are collected per group before pairing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum GroupingPolicy {
    /// Keep every qualifying value; duplicates collapse at pairing time.
    CollectAll,
    /// Deduplicate on insert and drop groups with fewer than `min_distinct` values.
    UniqueWithMinimum { min_distinct: usize },
}

/// Directed pair of distinct attribute values, rendered `from->to`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PairKey {
    pub from: String,
    pub to: String,
}

impl PairKey {
    /// Joins the two values in a stat key. Values containing it cannot form a key.
    pub const SEPARATOR: &'static str = "->";

    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self { from: from.into(), to: to.into() }
    }

    pub fn reversed(&self) -> Self {
        Self { from: self.to.clone(), to: self.from.clone() }
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.from, Self::SEPARATOR, self.to)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatibilityStat {
    pub stat_type: Dimension,
    pub stat_key: String,
    pub score: Decimal,
    pub count: u64,
}
