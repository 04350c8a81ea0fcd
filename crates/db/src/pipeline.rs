//! Batch runs over the catalog: drain every page, aggregate one or more dimensions and
//! upsert each stat through the stats repository.

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use vestia_core::aggregator::{aggregate, AggregationRequest};
use vestia_core::config::SinkErrorPolicy;
use vestia_core::domain::compatibility::{CompatibilityStat, Dimension};
use vestia_core::domain::product::{ProductRecord, GENDER_FIELD};

use crate::repositories::{CatalogSource, CompatibilityStatsRepository, RepositoryError};

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("catalog scan failed after {pages_read} page(s): {source}")]
    SourceFetch {
        pages_read: usize,
        #[source]
        source: RepositoryError,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildOptions {
    pub grouping_field: String,
    pub page_size: u32,
    pub on_sink_error: SinkErrorPolicy,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            grouping_field: GENDER_FIELD.to_string(),
            page_size: 500,
            on_sink_error: SinkErrorPolicy::Continue,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SinkFailure {
    pub stat_key: String,
    pub message: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct WriteSummary {
    pub attempted: usize,
    pub written: usize,
    pub failures: Vec<SinkFailure>,
    /// Set when the abort policy stopped the loop before every stat was attempted.
    pub aborted: bool,
}

impl WriteSummary {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && !self.aborted
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    pub dimension: Dimension,
    pub records_scanned: usize,
    pub groups: usize,
    pub excluded_records: usize,
    pub stats_computed: usize,
    pub writes: WriteSummary,
}

/// Reads every catalog page into memory. Any page failure aborts the whole scan.
pub async fn drain_catalog<S>(source: &S, page_size: u32) -> Result<Vec<ProductRecord>, BuildError>
where
    S: CatalogSource + ?Sized,
{
    let mut records = Vec::new();
    let mut cursor = None;
    let mut pages_read = 0;

    loop {
        let page = source
            .scan_page(cursor.as_ref(), page_size)
            .await
            .map_err(|source| BuildError::SourceFetch { pages_read, source })?;
        pages_read += 1;
        records.extend(page.items);

        match page.next_cursor {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    info!(
        event_name = "catalog.scan.completed",
        pages_read,
        records = records.len(),
        "catalog drained"
    );
    Ok(records)
}

/// Upserts stats one at a time. Each failure is isolated unless the policy says abort.
pub async fn write_stats<R>(
    sink: &R,
    stats: &[CompatibilityStat],
    policy: SinkErrorPolicy,
) -> WriteSummary
where
    R: CompatibilityStatsRepository + ?Sized,
{
    let mut summary = WriteSummary::default();

    for stat in stats {
        summary.attempted += 1;
        match sink.upsert(stat).await {
            Ok(()) => summary.written += 1,
            Err(error) => {
                warn!(
                    event_name = "compatibility.sink.upsert_failed",
                    stat_type = stat.stat_type.stat_type(),
                    stat_key = %stat.stat_key,
                    error = %error,
                    "stat upsert rejected"
                );
                summary.failures.push(SinkFailure {
                    stat_key: stat.stat_key.clone(),
                    message: error.to_string(),
                });
                if policy == SinkErrorPolicy::Abort {
                    summary.aborted = summary.attempted < stats.len();
                    break;
                }
            }
        }
    }

    summary
}

pub async fn build_dimension<R>(
    records: &[ProductRecord],
    dimension: Dimension,
    options: &BuildOptions,
    sink: &R,
) -> BuildReport
where
    R: CompatibilityStatsRepository + ?Sized,
{
    info!(
        event_name = "compatibility.build.started",
        stat_type = dimension.stat_type(),
        records = records.len(),
        grouping_field = %options.grouping_field,
        "building compatibility stats"
    );

    let request =
        AggregationRequest::for_dimension(dimension).with_grouping_field(&options.grouping_field);
    let aggregation = aggregate(records, &request);
    let writes = write_stats(sink, &aggregation.stats, options.on_sink_error).await;

    info!(
        event_name = "compatibility.build.completed",
        stat_type = dimension.stat_type(),
        groups = aggregation.groups,
        stats = aggregation.stats.len(),
        written = writes.written,
        failed = writes.failures.len(),
        "compatibility stats written"
    );

    BuildReport {
        dimension,
        records_scanned: records.len(),
        groups: aggregation.groups,
        excluded_records: aggregation.excluded_records,
        stats_computed: aggregation.stats.len(),
        writes,
    }
}

/// Drains the catalog once and builds each requested dimension against that snapshot.
/// Under the abort policy, a dimension that hits a write failure stops the remaining ones.
pub async fn build<S, R>(
    source: &S,
    sink: &R,
    dimensions: &[Dimension],
    options: &BuildOptions,
) -> Result<Vec<BuildReport>, BuildError>
where
    S: CatalogSource + ?Sized,
    R: CompatibilityStatsRepository + ?Sized,
{
    let records = drain_catalog(source, options.page_size).await?;
    let mut reports = Vec::with_capacity(dimensions.len());

    for dimension in dimensions {
        let report = build_dimension(&records, *dimension, options, sink).await;
        let stop = options.on_sink_error == SinkErrorPolicy::Abort && !report.writes.is_clean();
        reports.push(report);
        if stop {
            break;
        }
    }

    Ok(reports)
}
