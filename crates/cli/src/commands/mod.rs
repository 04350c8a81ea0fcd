pub mod build;
pub mod config;
pub mod doctor;
pub mod ingest;
pub mod migrate;
pub mod seed;
pub mod stats;

use serde::Serialize;
use serde_json::Value;
use vestia_core::config::{AppConfig, LoadOptions};
use vestia_core::ApplicationError;
use vestia_db::{connect_with_settings, migrations, DbPool};

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>) -> Self {
        Self::success_with_details(command, message, None)
    }

    pub fn success_with_details(
        command: &str,
        message: impl Into<String>,
        details: Option<Value>,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
            details,
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn failure_with_details(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
        details: Option<Value>,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
            details,
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    pub fn from_error(command: &str, error: &ApplicationError) -> Self {
        Self::failure_with_details(
            command,
            error.error_class(),
            error.to_string(),
            error.exit_code(),
            None,
        )
    }
}

/// Loaded configuration plus the single-threaded runtime a command blocks on.
pub(crate) struct CommandContext {
    pub config: AppConfig,
    pub runtime: tokio::runtime::Runtime,
}

pub(crate) fn prepare() -> Result<CommandContext, ApplicationError> {
    let config = AppConfig::load(LoadOptions::default())
        .map_err(|error| ApplicationError::Configuration(error.to_string()))?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| {
            ApplicationError::Runtime(format!("failed to initialize async runtime: {error}"))
        })?;

    Ok(CommandContext { config, runtime })
}

/// Connects with the configured pool settings and applies pending migrations.
pub(crate) async fn open_database(config: &AppConfig) -> Result<DbPool, ApplicationError> {
    let pool = connect_with_settings(
        &config.database.url,
        config.database.max_connections,
        config.database.timeout_secs,
    )
    .await
    .map_err(|error| ApplicationError::Connectivity(error.to_string()))?;

    migrations::run_pending(&pool)
        .await
        .map_err(|error| ApplicationError::Migration(error.to_string()))?;

    Ok(pool)
}

pub(crate) fn to_details(value: &impl Serialize) -> Option<Value> {
    serde_json::to_value(value).ok()
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}
