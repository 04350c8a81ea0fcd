pub mod aggregator;
pub mod config;
pub mod domain;
pub mod errors;

pub use aggregator::{aggregate, emit, Aggregation, AggregationRequest, PairCounts};
pub use domain::compatibility::{CompatibilityStat, Dimension, GroupingPolicy, PairKey};
pub use domain::product::{ProductId, ProductRecord};
pub use errors::{ApplicationError, DomainError};
