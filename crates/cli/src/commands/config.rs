use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use toml::Value;
use vestia_core::config::{resolve_config_path, AppConfig, LoadOptions};

struct ConfigField {
    key_path: &'static str,
    env_keys: &'static [&'static str],
    value: String,
}

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = resolve_config_path(None);
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    for field in effective_fields(&config) {
        let source = field_source(
            field.key_path,
            field.env_keys,
            config_file_doc.as_ref(),
            config_file_path.as_deref(),
        );
        lines.push(render_line(field.key_path, &field.value, source));
    }

    lines.join("\n")
}

fn effective_fields(config: &AppConfig) -> Vec<ConfigField> {
    vec![
        ConfigField {
            key_path: "database.url",
            env_keys: &["VESTIA_DATABASE_URL"],
            value: config.database.url.clone(),
        },
        ConfigField {
            key_path: "database.max_connections",
            env_keys: &["VESTIA_DATABASE_MAX_CONNECTIONS"],
            value: config.database.max_connections.to_string(),
        },
        ConfigField {
            key_path: "database.timeout_secs",
            env_keys: &["VESTIA_DATABASE_TIMEOUT_SECS"],
            value: config.database.timeout_secs.to_string(),
        },
        ConfigField {
            key_path: "catalog.page_size",
            env_keys: &["VESTIA_CATALOG_PAGE_SIZE"],
            value: config.catalog.page_size.to_string(),
        },
        ConfigField {
            key_path: "catalog.image_prefix",
            env_keys: &["VESTIA_CATALOG_IMAGE_PREFIX"],
            value: config.catalog.image_prefix.clone(),
        },
        ConfigField {
            key_path: "compatibility.grouping_field",
            env_keys: &["VESTIA_COMPATIBILITY_GROUPING_FIELD"],
            value: config.compatibility.grouping_field.clone(),
        },
        ConfigField {
            key_path: "compatibility.on_sink_error",
            env_keys: &["VESTIA_COMPATIBILITY_ON_SINK_ERROR"],
            value: config.compatibility.on_sink_error.as_str().to_string(),
        },
        ConfigField {
            key_path: "logging.level",
            env_keys: &["VESTIA_LOGGING_LEVEL", "VESTIA_LOG_LEVEL"],
            value: config.logging.level.clone(),
        },
        ConfigField {
            key_path: "logging.format",
            env_keys: &["VESTIA_LOGGING_FORMAT", "VESTIA_LOG_FORMAT"],
            value: config.logging.format.as_str().to_string(),
        },
    ]
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}
