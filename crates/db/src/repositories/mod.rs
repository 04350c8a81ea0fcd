use async_trait::async_trait;
use thiserror::Error;

use vestia_core::domain::compatibility::{CompatibilityStat, Dimension};
use vestia_core::domain::product::ProductRecord;

pub mod catalog;
pub mod compatibility;
pub mod memory;

pub use catalog::SqlCatalogRepository;
pub use compatibility::SqlCompatibilityStatsRepository;
pub use memory::{InMemoryCatalogRepository, InMemoryCompatibilityStatsRepository};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("encode error: {0}")]
    Encode(String),
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

/// Opaque continuation token returned by a catalog scan page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanCursor(pub String);

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CatalogPage {
    pub items: Vec<ProductRecord>,
    /// `None` once the scan has reached the end of the catalog.
    pub next_cursor: Option<ScanCursor>,
}

#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn scan_page(
        &self,
        cursor: Option<&ScanCursor>,
        limit: u32,
    ) -> Result<CatalogPage, RepositoryError>;
}

#[async_trait]
pub trait CatalogRepository: CatalogSource {
    async fn save(&self, record: ProductRecord) -> Result<(), RepositoryError>;
    async fn count(&self) -> Result<u64, RepositoryError>;
}

#[async_trait]
pub trait CompatibilityStatsRepository: Send + Sync {
    /// Inserts or replaces the stat keyed by `(stat_type, stat_key)`.
    async fn upsert(&self, stat: &CompatibilityStat) -> Result<(), RepositoryError>;

    /// Highest scores first, ties broken by key.
    async fn list_by_type(
        &self,
        dimension: Dimension,
        limit: u32,
    ) -> Result<Vec<CompatibilityStat>, RepositoryError>;
}
