use std::str::FromStr;

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::Row;

use vestia_core::domain::compatibility::{CompatibilityStat, Dimension};

use super::{CompatibilityStatsRepository, RepositoryError};
use crate::DbPool;

pub struct SqlCompatibilityStatsRepository {
    pool: DbPool,
}

impl SqlCompatibilityStatsRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_stat(row: &sqlx::sqlite::SqliteRow) -> Result<CompatibilityStat, RepositoryError> {
    let stat_type: String =
        row.try_get("stat_type").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let stat_key: String =
        row.try_get("stat_key").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let score: String = row.try_get("score").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let count: i64 = row.try_get("count").map_err(|e| RepositoryError::Decode(e.to_string()))?;

    let stat_type =
        stat_type.parse::<Dimension>().map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let score = Decimal::from_str(&score)
        .map_err(|e| RepositoryError::Decode(format!("score `{score}`: {e}")))?;
    let count = u64::try_from(count)
        .map_err(|_| RepositoryError::Decode(format!("negative count {count} for `{stat_key}`")))?;

    Ok(CompatibilityStat { stat_type, stat_key, score, count })
}

#[async_trait::async_trait]
impl CompatibilityStatsRepository for SqlCompatibilityStatsRepository {
    async fn upsert(&self, stat: &CompatibilityStat) -> Result<(), RepositoryError> {
        let count = i64::try_from(stat.count)
            .map_err(|_| RepositoryError::Encode(format!("count {} overflows", stat.count)))?;

        sqlx::query(
            "INSERT INTO compatibility_stats (stat_type, stat_key, score, count, updated_at)
             VALUES (?, ?, ?, ?, ?)
             ON CONFLICT(stat_type, stat_key) DO UPDATE SET
                 score = excluded.score,
                 count = excluded.count,
                 updated_at = excluded.updated_at",
        )
        .bind(stat.stat_type.stat_type())
        .bind(&stat.stat_key)
        .bind(stat.score.to_string())
        .bind(count)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_by_type(
        &self,
        dimension: Dimension,
        limit: u32,
    ) -> Result<Vec<CompatibilityStat>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT stat_type, stat_key, score, count
             FROM compatibility_stats
             WHERE stat_type = ?
             ORDER BY CAST(score AS REAL) DESC, stat_key ASC
             LIMIT ?",
        )
        .bind(dimension.stat_type())
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_stat).collect::<Result<Vec<_>, _>>()
    }
}
