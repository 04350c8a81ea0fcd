//! Loads the styles dataset into the product catalog, either as the raw `styles.csv`
//! export or as JSON lines.

use std::io::{BufRead, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{info, warn};

use vestia_core::domain::product::{
    ProductRecord, ARTICLE_TYPE_FIELD, BASE_COLOUR_FIELD, GENDER_FIELD, PRODUCT_ID_FIELD,
    USAGE_FIELD,
};

use crate::repositories::CatalogRepository;

const PROGRESS_EVERY: u64 = 1000;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("could not read ingest input at line {line}: {source}")]
    Read {
        line: u64,
        #[source]
        source: std::io::Error,
    },
    #[error("could not read CSV input at line {line}: {source}")]
    Csv {
        line: u64,
        #[source]
        source: csv::Error,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RowError {
    #[error("row could not be parsed: {0}")]
    Parse(String),
    #[error("row is not a JSON object")]
    NotAnObject,
    #[error("row has no `id`")]
    MissingId,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IngestFormat {
    Csv,
    JsonLines,
}

impl IngestFormat {
    /// `.csv` files are read as CSV with a header row; anything else as JSON lines.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Self::Csv,
            _ => Self::JsonLines,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub inserted: u64,
    pub failed: u64,
    pub skipped_blank: u64,
}

/// One row of the styles dataset. Columns the catalog does not keep (`year`) are ignored.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StyleRow {
    pub id: Option<String>,
    pub gender: Option<String>,
    pub master_category: Option<String>,
    pub sub_category: Option<String>,
    pub article_type: Option<String>,
    pub base_colour: Option<String>,
    pub season: Option<String>,
    pub usage: Option<String>,
    pub product_display_name: Option<String>,
}

impl StyleRow {
    pub fn into_record(self, image_prefix: &str) -> Result<ProductRecord, RowError> {
        let id = self.id.filter(|id| !id.trim().is_empty()).ok_or(RowError::MissingId)?;

        let mut record = ProductRecord::new()
            .with_field(PRODUCT_ID_FIELD, id.clone())
            .with_field("imageS3Prefix", format!("{}/{id}/", image_prefix.trim_end_matches('/')));
        let fields = [
            (GENDER_FIELD, self.gender),
            ("masterCategory", self.master_category),
            ("subCategory", self.sub_category),
            (ARTICLE_TYPE_FIELD, self.article_type),
            (BASE_COLOUR_FIELD, self.base_colour),
            ("season", self.season),
            (USAGE_FIELD, self.usage),
            ("displayName", self.product_display_name),
        ];
        for (field, value) in fields {
            if let Some(value) = value {
                record.insert(field, value);
            }
        }

        Ok(record)
    }
}

pub fn transform_row(
    row: &Map<String, Value>,
    image_prefix: &str,
) -> Result<ProductRecord, RowError> {
    let text = |column: &str| row.get(column).and_then(scalar_text);
    let style = StyleRow {
        id: text("id"),
        gender: text("gender"),
        master_category: text("masterCategory"),
        sub_category: text("subCategory"),
        article_type: text("articleType"),
        base_colour: text("baseColour"),
        season: text("season"),
        usage: text("usage"),
        product_display_name: text("productDisplayName"),
    };
    style.into_record(image_prefix)
}

pub fn parse_row(line: &str, image_prefix: &str) -> Result<ProductRecord, RowError> {
    let value: Value = serde_json::from_str(line).map_err(|e| RowError::Parse(e.to_string()))?;
    let row = value.as_object().ok_or(RowError::NotAnObject)?;
    transform_row(row, image_prefix)
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Saves each JSON line on its own. A bad row or a rejected save is logged and counted,
/// and the pass continues. Only an unreadable input stops the run.
pub async fn ingest_json_lines<R, C>(
    reader: R,
    catalog: &C,
    image_prefix: &str,
) -> Result<IngestReport, IngestError>
where
    R: BufRead,
    C: CatalogRepository + ?Sized,
{
    let mut report = IngestReport::default();

    for (index, line) in reader.lines().enumerate() {
        let line_number = index as u64 + 1;
        let line = line.map_err(|source| IngestError::Read { line: line_number, source })?;
        if line.trim().is_empty() {
            report.skipped_blank += 1;
            continue;
        }

        store_row(catalog, &mut report, line_number, parse_row(&line, image_prefix)).await;
    }

    log_completed(&report);
    Ok(report)
}

/// Reads a headed CSV export. Rows with the wrong number of fields or bad encoding are
/// counted as failed; an I/O error stops the run.
pub async fn ingest_csv<R, C>(
    reader: R,
    catalog: &C,
    image_prefix: &str,
) -> Result<IngestReport, IngestError>
where
    R: Read,
    C: CatalogRepository + ?Sized,
{
    let mut csv_reader = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);
    let mut report = IngestReport::default();

    for (index, row) in csv_reader.deserialize::<StyleRow>().enumerate() {
        let line_number = index as u64 + 2;
        let row = match row {
            Ok(row) => row.into_record(image_prefix),
            Err(source) if source.is_io_error() => {
                return Err(IngestError::Csv { line: line_number, source });
            }
            Err(error) => Err(RowError::Parse(error.to_string())),
        };

        store_row(catalog, &mut report, line_number, row).await;
    }

    log_completed(&report);
    Ok(report)
}

async fn store_row<C>(
    catalog: &C,
    report: &mut IngestReport,
    line: u64,
    row: Result<ProductRecord, RowError>,
) where
    C: CatalogRepository + ?Sized,
{
    let record = match row {
        Ok(record) => record,
        Err(error) => {
            warn!(
                event_name = "catalog.ingest.row_rejected",
                line,
                error = %error,
                "skipping catalog row"
            );
            report.failed += 1;
            return;
        }
    };

    if let Err(error) = catalog.save(record).await {
        warn!(
            event_name = "catalog.ingest.save_failed",
            line,
            error = %error,
            "catalog row could not be saved"
        );
        report.failed += 1;
        return;
    }

    report.inserted += 1;
    if report.inserted % PROGRESS_EVERY == 0 {
        info!(
            event_name = "catalog.ingest.progress",
            inserted = report.inserted,
            "inserted products"
        );
    }
}

fn log_completed(report: &IngestReport) {
    info!(
        event_name = "catalog.ingest.completed",
        inserted = report.inserted,
        failed = report.failed,
        "catalog ingestion complete"
    );
}
