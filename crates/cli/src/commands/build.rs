use vestia_core::domain::compatibility::Dimension;
use vestia_core::{ApplicationError, DomainError};
use vestia_db::repositories::{SqlCatalogRepository, SqlCompatibilityStatsRepository};
use vestia_db::{build, BuildOptions, BuildReport};

use crate::commands::{open_database, prepare, to_details, CommandResult};

pub fn run(selection: &str) -> CommandResult {
    let dimensions = match parse_selection(selection) {
        Ok(dimensions) => dimensions,
        Err(error) => return CommandResult::from_error("build", &ApplicationError::from(error)),
    };

    let context = match prepare() {
        Ok(context) => context,
        Err(error) => return CommandResult::from_error("build", &error),
    };

    let options = BuildOptions {
        grouping_field: context.config.compatibility.grouping_field.clone(),
        page_size: context.config.catalog.page_size,
        on_sink_error: context.config.compatibility.on_sink_error,
    };

    let result = context.runtime.block_on(async {
        let pool = open_database(&context.config).await?;
        let catalog = SqlCatalogRepository::new(pool.clone());
        let stats = SqlCompatibilityStatsRepository::new(pool.clone());
        let reports = build(&catalog, &stats, &dimensions, &options)
            .await
            .map_err(|error| ApplicationError::SourceFetch(error.to_string()));
        pool.close().await;
        reports
    });

    let reports = match result {
        Ok(reports) => reports,
        Err(error) => return CommandResult::from_error("build", &error),
    };

    let attempted: usize = reports.iter().map(|report| report.writes.attempted).sum();
    let failed: usize = reports.iter().map(|report| report.writes.failures.len()).sum();
    if failed > 0 {
        let error = ApplicationError::PartialWrite { failed, attempted };
        return CommandResult::failure_with_details(
            "build",
            error.error_class(),
            error.to_string(),
            error.exit_code(),
            to_details(&reports),
        );
    }

    CommandResult::success_with_details("build", summary_message(&reports), to_details(&reports))
}

/// `all` expands to every dimension; anything else must name exactly one.
pub fn parse_selection(selection: &str) -> Result<Vec<Dimension>, DomainError> {
    if selection.trim().eq_ignore_ascii_case("all") {
        return Ok(Dimension::ALL.to_vec());
    }
    Ok(vec![selection.parse()?])
}

fn summary_message(reports: &[BuildReport]) -> String {
    let parts: Vec<String> = reports
        .iter()
        .map(|report| format!("{}={}", report.dimension.stat_type(), report.writes.written))
        .collect();
    format!("wrote compatibility stats ({})", parts.join(", "))
}

#[cfg(test)]
mod tests {
    use vestia_core::domain::compatibility::Dimension;
    use vestia_core::DomainError;

    use super::parse_selection;

    #[test]
    fn all_expands_to_every_dimension() {
        assert_eq!(parse_selection("ALL"), Ok(Dimension::ALL.to_vec()));
    }

    #[test]
    fn single_dimension_and_unknown_values() {
        assert_eq!(parse_selection("colour"), Ok(vec![Dimension::Color]));
        assert_eq!(
            parse_selection("season"),
            Err(DomainError::UnsupportedDimension("season".to_string()))
        );
    }
}
