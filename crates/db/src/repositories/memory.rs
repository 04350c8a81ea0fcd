use std::collections::BTreeMap;

use tokio::sync::RwLock;

use vestia_core::domain::compatibility::{CompatibilityStat, Dimension};
use vestia_core::domain::product::{ProductId, ProductRecord};

use super::{
    CatalogPage, CatalogRepository, CatalogSource, CompatibilityStatsRepository, RepositoryError,
    ScanCursor,
};

#[derive(Default)]
pub struct InMemoryCatalogRepository {
    products: RwLock<BTreeMap<ProductId, ProductRecord>>,
}

impl InMemoryCatalogRepository {
    pub fn with_records(records: impl IntoIterator<Item = ProductRecord>) -> Self {
        let products = records
            .into_iter()
            .filter_map(|record| record.product_id().map(|id| (id, record)))
            .collect();
        Self { products: RwLock::new(products) }
    }
}

#[async_trait::async_trait]
impl CatalogSource for InMemoryCatalogRepository {
    async fn scan_page(
        &self,
        cursor: Option<&ScanCursor>,
        limit: u32,
    ) -> Result<CatalogPage, RepositoryError> {
        let limit = limit.max(1) as usize;
        let after = cursor.map(|ScanCursor(after)| after.as_str());
        let products = self.products.read().await;
        let page: Vec<(&ProductId, &ProductRecord)> = products
            .iter()
            .filter(|(id, _)| after.map_or(true, |after| id.0.as_str() > after))
            .take(limit)
            .collect();

        let next_cursor = if page.len() == limit {
            page.last().map(|(id, _)| ScanCursor(id.0.clone()))
        } else {
            None
        };

        Ok(CatalogPage {
            items: page.into_iter().map(|(_, record)| record.clone()).collect(),
            next_cursor,
        })
    }
}

#[async_trait::async_trait]
impl CatalogRepository for InMemoryCatalogRepository {
    async fn save(&self, record: ProductRecord) -> Result<(), RepositoryError> {
        let id = record
            .product_id()
            .ok_or_else(|| RepositoryError::Encode("product record has no productId".to_string()))?;
        let mut products = self.products.write().await;
        products.insert(id, record);
        Ok(())
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        let products = self.products.read().await;
        Ok(products.len() as u64)
    }
}

#[derive(Default)]
pub struct InMemoryCompatibilityStatsRepository {
    stats: RwLock<BTreeMap<(Dimension, String), CompatibilityStat>>,
}

impl InMemoryCompatibilityStatsRepository {
    /// Every stored stat in `(stat_type, stat_key)` order.
    pub async fn snapshot(&self) -> Vec<CompatibilityStat> {
        let stats = self.stats.read().await;
        stats.values().cloned().collect()
    }
}

#[async_trait::async_trait]
impl CompatibilityStatsRepository for InMemoryCompatibilityStatsRepository {
    async fn upsert(&self, stat: &CompatibilityStat) -> Result<(), RepositoryError> {
        let mut stats = self.stats.write().await;
        stats.insert((stat.stat_type, stat.stat_key.clone()), stat.clone());
        Ok(())
    }

    async fn list_by_type(
        &self,
        dimension: Dimension,
        limit: u32,
    ) -> Result<Vec<CompatibilityStat>, RepositoryError> {
        let stats = self.stats.read().await;
        let mut listed: Vec<CompatibilityStat> =
            stats.values().filter(|stat| stat.stat_type == dimension).cloned().collect();
        listed.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.stat_key.cmp(&b.stat_key)));
        listed.truncate(limit as usize);
        Ok(listed)
    }
}
