use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::intent::DEFAULT_MAX_INPUT_CHARS;
use crate::ranking::{ScoringWeights, DEFAULT_MAX_RESULTS, DEFAULT_WEIGHTS, HARD_MAX_RESULTS};

const MAX_INPUT_CHARS_CEILING: usize = 100_000;
const MAX_SCORING_WEIGHT: u32 = 1_000;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AppConfig {
    pub engine: EngineConfig,
    pub scoring: ScoringConfig,
    pub catalog: CatalogConfig,
    pub taxonomy: TaxonomyConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EngineConfig {
    pub default_max_results: usize,
    pub max_input_chars: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ScoringConfig {
    pub occasion_weight: u32,
    pub vibe_weight: u32,
    pub audience_weight: u32,
}

impl ScoringConfig {
    pub fn weights(&self) -> ScoringWeights {
        ScoringWeights {
            occasion: self.occasion_weight,
            vibe: self.vibe_weight,
            audience: self.audience_weight,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CatalogConfig {
    /// JSON product array; the built-in demo catalog is used when unset
    pub path: Option<PathBuf>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TaxonomyConfig {
    /// JSON object of allowed tags per family; unrestricted when unset
    pub path: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
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
    pub default_max_results: Option<usize>,
    pub max_input_chars: Option<usize>,
    pub catalog_path: Option<PathBuf>,
    pub taxonomy_path: Option<PathBuf>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
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
            engine: EngineConfig {
                default_max_results: DEFAULT_MAX_RESULTS,
                max_input_chars: DEFAULT_MAX_INPUT_CHARS,
            },
            scoring: ScoringConfig {
                occasion_weight: DEFAULT_WEIGHTS.occasion,
                vibe_weight: DEFAULT_WEIGHTS.vibe,
                audience_weight: DEFAULT_WEIGHTS.audience,
            },
            catalog: CatalogConfig::default(),
            taxonomy: TaxonomyConfig::default(),
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
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

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("concierge.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(engine) = patch.engine {
            if let Some(default_max_results) = engine.default_max_results {
                self.engine.default_max_results = default_max_results;
            }
            if let Some(max_input_chars) = engine.max_input_chars {
                self.engine.max_input_chars = max_input_chars;
            }
        }

        if let Some(scoring) = patch.scoring {
            if let Some(weight) = scoring.occasion_weight {
                self.scoring.occasion_weight = weight;
            }
            if let Some(weight) = scoring.vibe_weight {
                self.scoring.vibe_weight = weight;
            }
            if let Some(weight) = scoring.audience_weight {
                self.scoring.audience_weight = weight;
            }
        }

        if let Some(catalog) = patch.catalog {
            if let Some(path) = catalog.path {
                self.catalog.path = Some(path);
            }
        }

        if let Some(taxonomy) = patch.taxonomy {
            if let Some(path) = taxonomy.path {
                self.taxonomy.path = Some(path);
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
        if let Some(value) = read_env("CONCIERGE_ENGINE_DEFAULT_MAX_RESULTS") {
            self.engine.default_max_results =
                parse_usize("CONCIERGE_ENGINE_DEFAULT_MAX_RESULTS", &value)?;
        }
        if let Some(value) = read_env("CONCIERGE_ENGINE_MAX_INPUT_CHARS") {
            self.engine.max_input_chars = parse_usize("CONCIERGE_ENGINE_MAX_INPUT_CHARS", &value)?;
        }

        if let Some(value) = read_env("CONCIERGE_SCORING_OCCASION_WEIGHT") {
            self.scoring.occasion_weight = parse_u32("CONCIERGE_SCORING_OCCASION_WEIGHT", &value)?;
        }
        if let Some(value) = read_env("CONCIERGE_SCORING_VIBE_WEIGHT") {
            self.scoring.vibe_weight = parse_u32("CONCIERGE_SCORING_VIBE_WEIGHT", &value)?;
        }
        if let Some(value) = read_env("CONCIERGE_SCORING_AUDIENCE_WEIGHT") {
            self.scoring.audience_weight = parse_u32("CONCIERGE_SCORING_AUDIENCE_WEIGHT", &value)?;
        }

        if let Some(value) = read_env("CONCIERGE_CATALOG_PATH") {
            self.catalog.path = Some(PathBuf::from(value));
        }
        if let Some(value) = read_env("CONCIERGE_TAXONOMY_PATH") {
            self.taxonomy.path = Some(PathBuf::from(value));
        }

        let log_level =
            read_env("CONCIERGE_LOGGING_LEVEL").or_else(|| read_env("CONCIERGE_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("CONCIERGE_LOGGING_FORMAT").or_else(|| read_env("CONCIERGE_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(default_max_results) = overrides.default_max_results {
            self.engine.default_max_results = default_max_results;
        }
        if let Some(max_input_chars) = overrides.max_input_chars {
            self.engine.max_input_chars = max_input_chars;
        }
        if let Some(catalog_path) = overrides.catalog_path {
            self.catalog.path = Some(catalog_path);
        }
        if let Some(taxonomy_path) = overrides.taxonomy_path {
            self.taxonomy.path = Some(taxonomy_path);
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(log_format) = overrides.log_format {
            self.logging.format = log_format;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_engine(&self.engine)?;
        validate_scoring(&self.scoring)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("concierge.toml"), PathBuf::from("config/concierge.toml")]
        .into_iter()
        .find(|path| path.exists())
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

fn validate_engine(engine: &EngineConfig) -> Result<(), ConfigError> {
    if engine.default_max_results == 0 || engine.default_max_results > HARD_MAX_RESULTS {
        return Err(ConfigError::Validation(format!(
            "engine.default_max_results must be in range 1..={HARD_MAX_RESULTS}"
        )));
    }

    if engine.max_input_chars == 0 || engine.max_input_chars > MAX_INPUT_CHARS_CEILING {
        return Err(ConfigError::Validation(format!(
            "engine.max_input_chars must be in range 1..={MAX_INPUT_CHARS_CEILING}"
        )));
    }

    Ok(())
}

fn validate_scoring(scoring: &ScoringConfig) -> Result<(), ConfigError> {
    if scoring.occasion_weight == 0 {
        return Err(ConfigError::Validation(
            "scoring.occasion_weight must be greater than zero".to_string(),
        ));
    }

    if scoring.vibe_weight == 0 {
        return Err(ConfigError::Validation(
            "scoring.vibe_weight must be greater than zero".to_string(),
        ));
    }

    let weights = [
        ("scoring.occasion_weight", scoring.occasion_weight),
        ("scoring.vibe_weight", scoring.vibe_weight),
        ("scoring.audience_weight", scoring.audience_weight),
    ];
    if let Some((field, _)) = weights.iter().find(|(_, weight)| *weight > MAX_SCORING_WEIGHT) {
        return Err(ConfigError::Validation(format!(
            "{field} must be at most {MAX_SCORING_WEIGHT}"
        )));
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
    value.trim().parse::<u32>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_usize(key: &str, value: &str) -> Result<usize, ConfigError> {
    value.trim().parse::<usize>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    engine: Option<EnginePatch>,
    scoring: Option<ScoringPatch>,
    catalog: Option<PathPatch>,
    taxonomy: Option<PathPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct EnginePatch {
    default_max_results: Option<usize>,
    max_input_chars: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct ScoringPatch {
    occasion_weight: Option<u32>,
    vibe_weight: Option<u32>,
    audience_weight: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
struct PathPatch {
    path: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
