use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("unsupported dimension `{0}` (expected article|color|usage)")]
    UnsupportedDimension(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("configuration failure: {0}")]
    Configuration(String),
    #[error("runtime failure: {0}")]
    Runtime(String),
    #[error("database connectivity failure: {0}")]
    Connectivity(String),
    #[error("migration failure: {0}")]
    Migration(String),
    #[error("persistence failure: {0}")]
    Persistence(String),
    #[error("catalog fetch failure: {0}")]
    SourceFetch(String),
    #[error("ingest input failure: {0}")]
    IngestInput(String),
    #[error("{failed} of {attempted} stat writes failed")]
    PartialWrite { failed: usize, attempted: usize },
}

impl ApplicationError {
    /// Stable class name reported in structured command output.
    pub fn error_class(&self) -> &'static str {
        match self {
            Self::Domain(_) => "domain_validation",
            Self::Configuration(_) => "config_validation",
            Self::Runtime(_) => "runtime_init",
            Self::Connectivity(_) => "db_connectivity",
            Self::Migration(_) => "migration",
            Self::Persistence(_) => "persistence",
            Self::SourceFetch(_) => "source_fetch",
            Self::IngestInput(_) => "ingest_input",
            Self::PartialWrite { .. } => "sink_partial",
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Domain(_) | Self::Configuration(_) | Self::IngestInput(_) => 2,
            Self::Runtime(_) => 3,
            Self::Connectivity(_) => 4,
            Self::Migration(_) | Self::Persistence(_) => 5,
            Self::SourceFetch(_) => 6,
            Self::PartialWrite { .. } => 7,
        }
    }
}
