use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::product::GENDER_FIELD;

pub const DEFAULT_CONFIG_FILES: [&str; 2] = ["vestia.toml", "config/vestia.toml"];

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub catalog: CatalogConfig,
    pub compatibility: CompatibilityConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct CatalogConfig {
    pub page_size: u32,
    pub image_prefix: String,
}

#[derive(Clone, Debug)]
pub struct CompatibilityConfig {
    pub grouping_field: String,
    pub on_sink_error: SinkErrorPolicy,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

/// What a build does when a single stat upsert is rejected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkErrorPolicy {
    /// Log the failure, record it in the run summary and keep writing.
    #[default]
    Continue,
    /// Stop at the first rejected write. Earlier writes are kept.
    Abort,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub database_url: Option<String>,
    pub log_level: Option<String>,
    pub catalog_page_size: Option<u32>,
    pub grouping_field: Option<String>,
    pub on_sink_error: Option<SinkErrorPolicy>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "sqlite://vestia.db".to_string(),
                max_connections: 5,
                timeout_secs: 30,
            },
            catalog: CatalogConfig {
                page_size: 500,
                image_prefix: "s3://vestia-fashion-dataset/raw/fashion-products/images".to_string(),
            },
            compatibility: CompatibilityConfig {
                grouping_field: GENDER_FIELD.to_string(),
                on_sink_error: SinkErrorPolicy::Continue,
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl LogFormat {
    /// Same spelling the config file and env vars accept.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Compact => "compact",
            Self::Pretty => "pretty",
            Self::Json => "json",
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl SinkErrorPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Continue => "continue",
            Self::Abort => "abort",
        }
    }
}

impl std::str::FromStr for SinkErrorPolicy {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "continue" => Ok(Self::Continue),
            "abort" => Ok(Self::Abort),
            other => Err(ConfigError::Validation(format!(
                "unsupported sink error policy `{other}` (expected continue|abort)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected =
                options.config_path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILES[0]));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(database) = patch.database {
            if let Some(url) = database.url {
                self.database.url = url;
            }
            if let Some(max_connections) = database.max_connections {
                self.database.max_connections = max_connections;
            }
            if let Some(timeout_secs) = database.timeout_secs {
                self.database.timeout_secs = timeout_secs;
            }
        }

        if let Some(catalog) = patch.catalog {
            if let Some(page_size) = catalog.page_size {
                self.catalog.page_size = page_size;
            }
            if let Some(image_prefix) = catalog.image_prefix {
                self.catalog.image_prefix = image_prefix;
            }
        }

        if let Some(compatibility) = patch.compatibility {
            if let Some(grouping_field) = compatibility.grouping_field {
                self.compatibility.grouping_field = grouping_field;
            }
            if let Some(on_sink_error) = compatibility.on_sink_error {
                self.compatibility.on_sink_error = on_sink_error;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("VESTIA_DATABASE_URL") {
            self.database.url = value;
        }
        if let Some(value) = read_env("VESTIA_DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = parse_u32("VESTIA_DATABASE_MAX_CONNECTIONS", &value)?;
        }
        if let Some(value) = read_env("VESTIA_DATABASE_TIMEOUT_SECS") {
            self.database.timeout_secs = parse_u64("VESTIA_DATABASE_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env("VESTIA_CATALOG_PAGE_SIZE") {
            self.catalog.page_size = parse_u32("VESTIA_CATALOG_PAGE_SIZE", &value)?;
        }
        if let Some(value) = read_env("VESTIA_CATALOG_IMAGE_PREFIX") {
            self.catalog.image_prefix = value;
        }

        if let Some(value) = read_env("VESTIA_COMPATIBILITY_GROUPING_FIELD") {
            self.compatibility.grouping_field = value;
        }
        if let Some(value) = read_env("VESTIA_COMPATIBILITY_ON_SINK_ERROR") {
            self.compatibility.on_sink_error = value.parse()?;
        }

        let log_level = read_env("VESTIA_LOGGING_LEVEL").or_else(|| read_env("VESTIA_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("VESTIA_LOGGING_FORMAT").or_else(|| read_env("VESTIA_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(database_url) = overrides.database_url {
            self.database.url = database_url;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(page_size) = overrides.catalog_page_size {
            self.catalog.page_size = page_size;
        }
        if let Some(grouping_field) = overrides.grouping_field {
            self.compatibility.grouping_field = grouping_field;
        }
        if let Some(on_sink_error) = overrides.on_sink_error {
            self.compatibility.on_sink_error = on_sink_error;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_database(&self.database)?;
        validate_catalog(&self.catalog)?;
        validate_compatibility(&self.compatibility)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

pub fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    DEFAULT_CONFIG_FILES.iter().map(PathBuf::from).find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_database(database: &DatabaseConfig) -> Result<(), ConfigError> {
    let url = database.url.trim();
    let sqlite_url =
        url.starts_with("sqlite://") || url.starts_with("sqlite::") || url == ":memory:";
    if !sqlite_url {
        return Err(ConfigError::Validation(
            "database.url must be a sqlite URL (`sqlite://...`, `sqlite::...`, or `:memory:`)"
                .to_string(),
        ));
    }

    if database.max_connections == 0 {
        return Err(ConfigError::Validation(
            "database.max_connections must be greater than zero".to_string(),
        ));
    }

    if database.timeout_secs == 0 || database.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "database.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    Ok(())
}

fn validate_catalog(catalog: &CatalogConfig) -> Result<(), ConfigError> {
    if catalog.page_size == 0 || catalog.page_size > 10_000 {
        return Err(ConfigError::Validation(
            "catalog.page_size must be in range 1..=10000".to_string(),
        ));
    }

    if catalog.image_prefix.trim().is_empty() {
        return Err(ConfigError::Validation("catalog.image_prefix must not be empty".to_string()));
    }

    Ok(())
}

fn validate_compatibility(compatibility: &CompatibilityConfig) -> Result<(), ConfigError> {
    if compatibility.grouping_field.trim().is_empty() {
        return Err(ConfigError::Validation(
            "compatibility.grouping_field must name a catalog field".to_string(),
        ));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u32(key: &str, value: &str) -> Result<u32, ConfigError> {
    value.parse::<u32>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    database: Option<DatabasePatch>,
    catalog: Option<CatalogPatch>,
    compatibility: Option<CompatibilityPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct DatabasePatch {
    url: Option<String>,
    max_connections: Option<u32>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct CatalogPatch {
    page_size: Option<u32>,
    image_prefix: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct CompatibilityPatch {
    grouping_field: Option<String>,
    on_sink_error: Option<SinkErrorPolicy>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::fs;
    use std::io;
    use std::sync::{Mutex, OnceLock};

    use tempfile::TempDir;

    use super::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat, SinkErrorPolicy};

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    fn env_lock() -> &'static Mutex<()> {
        ENV_LOCK.get_or_init(|| Mutex::new(()))
    }

    fn clear_vars(vars: &[&str]) {
        for var in vars {
            env::remove_var(var);
        }
    }

    fn ensure(condition: bool, message: &'static str) -> Result<(), String> {
        if condition {
            Ok(())
        } else {
            Err(message.to_string())
        }
    }

    #[test]
    fn defaults_validate_without_any_file_or_env() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        let config = AppConfig::load(LoadOptions::default())
            .map_err(|err| format!("config load failed: {err}"))?;

        ensure(config.database.url == "sqlite://vestia.db", "default database url")?;
        ensure(config.catalog.page_size == 500, "default page size should be 500")?;
        ensure(config.compatibility.grouping_field == "gender", "default grouping is gender")?;
        ensure(
            config.compatibility.on_sink_error == SinkErrorPolicy::Continue,
            "sink failures should be isolated by default",
        )?;
        ensure(matches!(config.logging.format, LogFormat::Compact), "default format is compact")
    }

    #[test]
    fn file_load_supports_env_interpolation() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("TEST_VESTIA_DB_PATH", "/tmp/vestia-interpolated.db");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("vestia.toml");
            fs::write(
                &path,
                r#"
[database]
url = "sqlite://${TEST_VESTIA_DB_PATH}"
"#,
            )
            .map_err(|err| err.to_string())?;

            let config =
                AppConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() })
                    .map_err(|err| format!("config load failed: {err}"))?;

            ensure(
                config.database.url == "sqlite:///tmp/vestia-interpolated.db",
                "database url should be interpolated from environment",
            )
        })();

        clear_vars(&["TEST_VESTIA_DB_PATH"]);
        result
    }

    #[test]
    fn missing_interpolation_variable_is_reported() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars(&["TEST_VESTIA_UNSET_VAR"]);

        let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
        let path = dir.path().join("vestia.toml");
        fs::write(&path, "[catalog]\nimage_prefix = \"${TEST_VESTIA_UNSET_VAR}\"\n")
            .map_err(|err| err.to_string())?;

        let outcome =
            AppConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() });

        ensure(
            matches!(
                outcome,
                Err(ConfigError::MissingEnvInterpolation { ref var })
                    if var == "TEST_VESTIA_UNSET_VAR"
            ),
            "missing interpolation variable should be named in the error",
        )
    }

    #[test]
    fn logging_env_aliases_are_supported() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("VESTIA_LOG_LEVEL", "warn");
        env::set_var("VESTIA_LOG_FORMAT", "pretty");

        let result = (|| -> Result<(), String> {
            let config = AppConfig::load(LoadOptions::default())
                .map_err(|err| format!("config load failed: {err}"))?;

            ensure(config.logging.level == "warn", "warning log level should be set from env var")?;
            ensure(
                matches!(config.logging.format, LogFormat::Pretty),
                "pretty logging format should be set from env var",
            )?;
            Ok(())
        })();

        clear_vars(&["VESTIA_LOG_LEVEL", "VESTIA_LOG_FORMAT"]);
        result
    }

    #[test]
    fn precedence_defaults_file_env_overrides() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("VESTIA_DATABASE_URL", "sqlite://from-env.db");
        env::set_var("VESTIA_COMPATIBILITY_ON_SINK_ERROR", "abort");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("vestia.toml");
            fs::write(
                &path,
                r#"
[database]
url = "sqlite://from-file.db"

[catalog]
page_size = 250

[compatibility]
grouping_field = "season"
on_sink_error = "continue"

[logging]
level = "warn"
"#,
            )
            .map_err(|err| err.to_string())?;

            let config = AppConfig::load(LoadOptions {
                config_path: Some(path),
                overrides: ConfigOverrides {
                    database_url: Some("sqlite://from-override.db".to_string()),
                    log_level: Some("debug".to_string()),
                    ..ConfigOverrides::default()
                },
                ..LoadOptions::default()
            })
            .map_err(|err| format!("config load failed: {err}"))?;

            ensure(
                config.database.url == "sqlite://from-override.db",
                "override database url should win",
            )?;
            ensure(config.logging.level == "debug", "overridden log level should be debug")?;
            ensure(config.catalog.page_size == 250, "file page size should beat the default")?;
            ensure(
                config.compatibility.grouping_field == "season",
                "file grouping field should beat the default",
            )?;
            ensure(
                config.compatibility.on_sink_error == SinkErrorPolicy::Abort,
                "env sink policy should win over file",
            )?;
            Ok(())
        })();

        clear_vars(&["VESTIA_DATABASE_URL", "VESTIA_COMPATIBILITY_ON_SINK_ERROR"]);
        result
    }

    #[test]
    fn validation_fails_fast_with_actionable_error() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("VESTIA_DATABASE_URL", "postgres://localhost/vestia");

        let result = (|| -> Result<(), String> {
            let error = match AppConfig::load(LoadOptions::default()) {
                Ok(_) => {
                    return Err("expected validation failure but config load succeeded".to_string())
                }
                Err(error) => error,
            };
            let has_message = matches!(
                error,
                ConfigError::Validation(ref message) if message.contains("database.url")
            );
            ensure(has_message, "validation failure should mention database.url")
        })();

        clear_vars(&["VESTIA_DATABASE_URL"]);
        result
    }

    #[test]
    fn invalid_numeric_env_override_is_rejected() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("VESTIA_CATALOG_PAGE_SIZE", "lots");

        let outcome = AppConfig::load(LoadOptions::default());
        clear_vars(&["VESTIA_CATALOG_PAGE_SIZE"]);

        ensure(
            matches!(
                outcome,
                Err(ConfigError::InvalidEnvOverride { ref key, .. })
                    if key == "VESTIA_CATALOG_PAGE_SIZE"
            ),
            "non-numeric page size should be rejected",
        )
    }

    #[test]
    fn out_of_range_page_size_fails_validation() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        let outcome = AppConfig::load(LoadOptions {
            overrides: ConfigOverrides { catalog_page_size: Some(0), ..ConfigOverrides::default() },
            ..LoadOptions::default()
        });

        ensure(
            matches!(
                outcome,
                Err(ConfigError::Validation(ref message)) if message.contains("page_size")
            ),
            "zero page size should fail validation",
        )
    }
}
