use vestia_core::domain::compatibility::Dimension;
use vestia_core::ApplicationError;
use vestia_db::repositories::{CompatibilityStatsRepository, SqlCompatibilityStatsRepository};

use crate::commands::{open_database, prepare, to_details, CommandResult};

/// Lists stored stats for one dimension, highest score first.
pub fn run(dimension: &str, limit: u32) -> CommandResult {
    let dimension = match dimension.parse::<Dimension>() {
        Ok(dimension) => dimension,
        Err(error) => return CommandResult::from_error("stats", &ApplicationError::from(error)),
    };

    let context = match prepare() {
        Ok(context) => context,
        Err(error) => return CommandResult::from_error("stats", &error),
    };

    let result = context.runtime.block_on(async {
        let pool = open_database(&context.config).await?;
        let repo = SqlCompatibilityStatsRepository::new(pool.clone());
        let listed = repo
            .list_by_type(dimension, limit)
            .await
            .map_err(|error| ApplicationError::Persistence(error.to_string()));
        pool.close().await;
        listed
    });

    match result {
        Ok(stats) => CommandResult::success_with_details(
            "stats",
            format!("{} {} stats", stats.len(), dimension.stat_type()),
            to_details(&stats),
        ),
        Err(error) => CommandResult::from_error("stats", &error),
    }
}
