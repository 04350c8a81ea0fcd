pub mod connection;
pub mod ingest;
pub mod migrations;
pub mod pipeline;
pub mod repositories;

pub use connection::{connect_with_settings, DbPool};
pub use ingest::{ingest_csv, ingest_json_lines, IngestError, IngestFormat, IngestReport};
pub use pipeline::{build, drain_catalog, write_stats, BuildError, BuildOptions, BuildReport};
