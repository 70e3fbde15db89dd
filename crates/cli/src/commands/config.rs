use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use concierge_core::config::{AppConfig, LoadOptions};
use toml::Value;

use crate::commands::CommandResult;

const COMMAND: &str = "config";

pub fn run(config_path: Option<PathBuf>) -> CommandResult {
    let options = LoadOptions { config_path: config_path.clone(), ..LoadOptions::default() };
    let config = match AppConfig::load(options) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                COMMAND,
                "config_validation",
                format!("config validation failed: {error}"),
                3,
            );
        }
    };

    let config_file_path = detect_config_path(config_path);
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let source = |key_path: &str, env_keys: &[&str]| {
        field_source(key_path, env_keys, config_file_doc.as_ref(), config_file_path.as_deref())
    };

    let fields = [
        (
            "engine.default_max_results",
            config.engine.default_max_results.to_string(),
            source("engine.default_max_results", &["CONCIERGE_ENGINE_DEFAULT_MAX_RESULTS"]),
        ),
        (
            "engine.max_input_chars",
            config.engine.max_input_chars.to_string(),
            source("engine.max_input_chars", &["CONCIERGE_ENGINE_MAX_INPUT_CHARS"]),
        ),
        (
            "scoring.occasion_weight",
            config.scoring.occasion_weight.to_string(),
            source("scoring.occasion_weight", &["CONCIERGE_SCORING_OCCASION_WEIGHT"]),
        ),
        (
            "scoring.vibe_weight",
            config.scoring.vibe_weight.to_string(),
            source("scoring.vibe_weight", &["CONCIERGE_SCORING_VIBE_WEIGHT"]),
        ),
        (
            "scoring.audience_weight",
            config.scoring.audience_weight.to_string(),
            source("scoring.audience_weight", &["CONCIERGE_SCORING_AUDIENCE_WEIGHT"]),
        ),
        (
            "catalog.path",
            display_path(config.catalog.path.as_deref(), "<built-in demo catalog>"),
            source("catalog.path", &["CONCIERGE_CATALOG_PATH"]),
        ),
        (
            "taxonomy.path",
            display_path(config.taxonomy.path.as_deref(), "<unrestricted>"),
            source("taxonomy.path", &["CONCIERGE_TAXONOMY_PATH"]),
        ),
        (
            "logging.level",
            config.logging.level.clone(),
            source("logging.level", &["CONCIERGE_LOGGING_LEVEL", "CONCIERGE_LOG_LEVEL"]),
        ),
        (
            "logging.format",
            format!("{:?}", config.logging.format).to_ascii_lowercase(),
            source("logging.format", &["CONCIERGE_LOGGING_FORMAT", "CONCIERGE_LOG_FORMAT"]),
        ),
    ];

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    lines.extend(fields.into_iter().map(|(key, value, source)| render_line(key, &value, source)));
    CommandResult { exit_code: 0, output: lines.join("\n") }
}

fn detect_config_path(explicit: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return path.exists().then_some(path);
    }

    [PathBuf::from("concierge.toml"), PathBuf::from("config/concierge.toml")]
        .into_iter()
        .find(|path| path.exists())
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
    for env_key in env_keys {
        let set = env::var(env_key).map(|value| !value.trim().is_empty()).unwrap_or(false);
        if set {
            return format!("env ({env_key})");
        }
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

fn display_path(path: Option<&Path>, unset: &str) -> String {
    path.map(|path| path.display().to_string()).unwrap_or_else(|| unset.to_string())
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}
