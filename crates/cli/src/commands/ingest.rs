use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use vestia_core::ApplicationError;
use vestia_db::repositories::SqlCatalogRepository;
use vestia_db::{ingest_csv, ingest_json_lines, IngestFormat, IngestReport};

use crate::commands::{open_database, prepare, to_details, CommandResult};

pub fn run(path: &Path) -> CommandResult {
    let context = match prepare() {
        Ok(context) => context,
        Err(error) => return CommandResult::from_error("ingest", &error),
    };

    let file = match File::open(path) {
        Ok(file) => file,
        Err(error) => {
            let error = ApplicationError::IngestInput(format!("{}: {error}", path.display()));
            return CommandResult::from_error("ingest", &error);
        }
    };

    let result = context.runtime.block_on(async {
        let pool = open_database(&context.config).await?;
        let catalog = SqlCatalogRepository::new(pool.clone());
        let image_prefix = &context.config.catalog.image_prefix;
        let report = match IngestFormat::from_path(path) {
            IngestFormat::Csv => ingest_csv(BufReader::new(file), &catalog, image_prefix).await,
            IngestFormat::JsonLines => {
                ingest_json_lines(BufReader::new(file), &catalog, image_prefix).await
            }
        }
        .map_err(|error| ApplicationError::IngestInput(error.to_string()));
        pool.close().await;
        report
    });

    match result {
        Ok(report) => CommandResult::success_with_details(
            "ingest",
            summary_message(&report),
            to_details(&report),
        ),
        Err(error) => CommandResult::from_error("ingest", &error),
    }
}

fn summary_message(report: &IngestReport) -> String {
    format!("ingested {} products ({} rows rejected)", report.inserted, report.failed)
}
