use chrono::Utc;
use sqlx::Row;

use vestia_core::domain::product::ProductRecord;

use super::{CatalogPage, CatalogRepository, CatalogSource, RepositoryError, ScanCursor};
use crate::DbPool;

pub struct SqlCatalogRepository {
    pool: DbPool,
}

impl SqlCatalogRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_record(
    row: &sqlx::sqlite::SqliteRow,
) -> Result<(String, ProductRecord), RepositoryError> {
    let product_id: String =
        row.try_get("product_id").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let record_json: String =
        row.try_get("record_json").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let record = serde_json::from_str::<ProductRecord>(&record_json)
        .map_err(|e| RepositoryError::Decode(format!("product `{product_id}`: {e}")))?;

    Ok((product_id, record))
}

#[async_trait::async_trait]
impl CatalogSource for SqlCatalogRepository {
    async fn scan_page(
        &self,
        cursor: Option<&ScanCursor>,
        limit: u32,
    ) -> Result<CatalogPage, RepositoryError> {
        let limit = limit.max(1);
        let rows = match cursor {
            Some(ScanCursor(after)) => {
                sqlx::query(
                    "SELECT product_id, record_json
                     FROM product_catalog
                     WHERE product_id > ?
                     ORDER BY product_id
                     LIMIT ?",
                )
                .bind(after.as_str())
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(
                    "SELECT product_id, record_json
                     FROM product_catalog
                     ORDER BY product_id
                     LIMIT ?",
                )
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
        };

        let decoded = rows.iter().map(row_to_record).collect::<Result<Vec<_>, _>>()?;
        let next_cursor = if decoded.len() == limit as usize {
            decoded.last().map(|(product_id, _)| ScanCursor(product_id.clone()))
        } else {
            None
        };

        Ok(CatalogPage {
            items: decoded.into_iter().map(|(_, record)| record).collect(),
            next_cursor,
        })
    }
}

#[async_trait::async_trait]
impl CatalogRepository for SqlCatalogRepository {
    async fn save(&self, record: ProductRecord) -> Result<(), RepositoryError> {
        let product_id = record
            .product_id()
            .ok_or_else(|| RepositoryError::Encode("product record has no productId".to_string()))?;
        let record_json =
            serde_json::to_string(&record).map_err(|e| RepositoryError::Encode(e.to_string()))?;

        sqlx::query(
            "INSERT INTO product_catalog (product_id, record_json, updated_at)
             VALUES (?, ?, ?)
             ON CONFLICT(product_id) DO UPDATE SET
                 record_json = excluded.record_json,
                 updated_at = excluded.updated_at",
        )
        .bind(&product_id.0)
        .bind(&record_json)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM product_catalog")
            .fetch_one(&self.pool)
            .await?;
        let count: i64 = row.try_get("count").map_err(|e| RepositoryError::Decode(e.to_string()))?;

        Ok(count.max(0) as u64)
    }
}
