use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

use concierge_cli::commands::recommend::RecommendArgs;
use concierge_cli::commands::{config, recommend};
use serde_json::Value;
use tempfile::TempDir;

fn args(text: &str) -> RecommendArgs {
    RecommendArgs { text: text.to_string(), ..RecommendArgs::default() }
}

fn top3_ids(payload: &Value) -> Vec<String> {
    payload["top3"]
        .as_array()
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| entry["productId"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

#[test]
fn recommend_uses_demo_catalog_by_default() {
    with_env(&[], || {
        let result = recommend::run(args("modern business look"), None);
        assert_eq!(result.exit_code, 0, "expected successful recommendation");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["success"], true);
        assert_eq!(payload["debug"]["reason"], "ranked");
        assert_eq!(top3_ids(&payload), vec!["merino-crewneck", "structured-blazer"]);
    });
}

#[test]
fn recommend_empty_text_asks_for_clarification() {
    with_env(&[], || {
        let result = recommend::run(args("  "), None);
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["needsClarification"], true);
        assert_eq!(payload["debug"]["reason"], "empty-input");
        assert!(top3_ids(&payload).is_empty());
    });
}

#[test]
fn recommend_reads_catalog_and_taxonomy_files() {
    with_env(&[], || {
        let dir = TempDir::new().expect("tempdir");
        let catalog = dir.path().join("products.json");
        let taxonomy = dir.path().join("taxonomy.json");
        fs::write(
            &catalog,
            r#"[
                {"id": "linen-set", "tags": {"occasion": ["vacation"], "vibe": ["relaxed"]}},
                {"id": "rain-shell", "tags": {"vibe": ["modern"]}}
            ]"#,
        )
        .expect("write catalog");
        fs::write(&taxonomy, r#"{"vibe": ["modern"]}"#).expect("write taxonomy");

        let result = recommend::run(
            RecommendArgs {
                catalog: Some(catalog),
                taxonomy: Some(taxonomy),
                max_results: Some(5),
                ..args("relaxed beach trip, something sleek")
            },
            None,
        );
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["intent"]["vibe"], serde_json::json!(["modern"]));
        assert_eq!(payload["debug"]["maxResults"], 2);
        assert_eq!(top3_ids(&payload), vec!["linen-set", "rain-shell"]);
    });
}

#[test]
fn recommend_reports_catalog_load_failure() {
    with_env(&[], || {
        let dir = TempDir::new().expect("tempdir");
        let catalog = dir.path().join("products.json");
        fs::write(&catalog, r#"{"not": "an array"}"#).expect("write catalog");

        let result =
            recommend::run(RecommendArgs { catalog: Some(catalog), ..args("party") }, None);
        assert_eq!(result.exit_code, 4);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "recommend");
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "catalog_load");
    });
}

#[test]
fn recommend_returns_error_response_for_oversized_text() {
    with_env(&[("CONCIERGE_ENGINE_MAX_INPUT_CHARS", "10")], || {
        let result = recommend::run(args("business casual for the office"), None);
        assert_eq!(result.exit_code, 2, "expected error response exit code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["success"], false);
        assert_eq!(payload["error"]["code"], "INVALID_INPUT");
        assert_eq!(payload["error"]["details"]["limit"], 10);
    });
}

#[test]
fn recommend_returns_config_failure_for_invalid_env() {
    with_env(&[("CONCIERGE_SCORING_OCCASION_WEIGHT", "heavy")], || {
        let result = recommend::run(args("party"), None);
        assert_eq!(result.exit_code, 3, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "config_validation");
    });
}

#[test]
fn recommend_honors_explicit_config_file() {
    with_env(&[], || {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("concierge.toml");
        fs::write(&path, "[engine]\ndefault_max_results = 1\n").expect("write config");

        let result = recommend::run(args("modern business look"), Some(path));
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        assert_eq!(top3_ids(&payload), vec!["merino-crewneck"]);
    });
}

#[test]
fn config_reports_sources() {
    with_env(&[("CONCIERGE_LOG_LEVEL", "debug")], || {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("concierge.toml");
        fs::write(&path, "[scoring]\nvibe_weight = 4\n").expect("write config");

        let result = config::run(Some(path.clone()));
        assert_eq!(result.exit_code, 0);
        let output = result.output;
        assert!(output.starts_with("effective config"));
        assert!(output.contains("- logging.level = debug (source: env (CONCIERGE_LOG_LEVEL))"));
        assert!(output.contains(&format!(
            "- scoring.vibe_weight = 4 (source: file ({}))",
            path.display()
        )));
        assert!(output.contains("- engine.default_max_results = 2 (source: default)"));
        assert!(output.contains("- catalog.path = <built-in demo catalog> (source: default)"));
    });
}

#[test]
fn config_reports_validation_failure() {
    with_env(&[("CONCIERGE_ENGINE_DEFAULT_MAX_RESULTS", "9")], || {
        let result = config::run(None::<PathBuf>);
        assert_eq!(result.exit_code, 3, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "config");
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "config_validation");
        assert!(payload["message"]
            .as_str()
            .is_some_and(|message| message.contains("engine.default_max_results")));
    });
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "CONCIERGE_ENGINE_DEFAULT_MAX_RESULTS",
        "CONCIERGE_ENGINE_MAX_INPUT_CHARS",
        "CONCIERGE_SCORING_OCCASION_WEIGHT",
        "CONCIERGE_SCORING_VIBE_WEIGHT",
        "CONCIERGE_SCORING_AUDIENCE_WEIGHT",
        "CONCIERGE_CATALOG_PATH",
        "CONCIERGE_TAXONOMY_PATH",
        "CONCIERGE_LOGGING_LEVEL",
        "CONCIERGE_LOGGING_FORMAT",
        "CONCIERGE_LOG_LEVEL",
        "CONCIERGE_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
