use vestia_core::aggregator::seed::starter_stats;
use vestia_core::ApplicationError;
use vestia_db::repositories::SqlCompatibilityStatsRepository;
use vestia_db::write_stats;

use crate::commands::{open_database, prepare, to_details, CommandResult};

/// Upserts the hand-written starter rules so recommendations work before any build.
pub fn run() -> CommandResult {
    let context = match prepare() {
        Ok(context) => context,
        Err(error) => return CommandResult::from_error("seed", &error),
    };

    let stats = starter_stats();
    let policy = context.config.compatibility.on_sink_error;
    let result = context.runtime.block_on(async {
        let pool = open_database(&context.config).await?;
        let sink = SqlCompatibilityStatsRepository::new(pool.clone());
        let summary = write_stats(&sink, &stats, policy).await;
        pool.close().await;
        Ok::<_, ApplicationError>(summary)
    });

    let summary = match result {
        Ok(summary) => summary,
        Err(error) => return CommandResult::from_error("seed", &error),
    };

    if !summary.is_clean() {
        let error = ApplicationError::PartialWrite {
            failed: summary.failures.len(),
            attempted: summary.attempted,
        };
        return CommandResult::failure_with_details(
            "seed",
            error.error_class(),
            error.to_string(),
            error.exit_code(),
            to_details(&summary),
        );
    }

    CommandResult::success_with_details(
        "seed",
        format!("seeded {} starter compatibility stats", summary.written),
        to_details(&summary),
    )
}
