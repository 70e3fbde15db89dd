use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use concierge_agent::{Concierge, RecommendRequest, Reply};
use concierge_core::config::{AppConfig, ConfigOverrides, LoadOptions};
use concierge_core::{demo_catalog, load_products, load_taxonomy, Product, Taxonomy};

use crate::commands::CommandResult;
use crate::logging::init_logging;

const COMMAND: &str = "recommend";

#[derive(Debug, Clone, Default, Args)]
pub struct RecommendArgs {
    #[arg(long, help = "Free-form shopper message")]
    pub text: String,
    #[arg(long, help = "Audience for the request (men|woman)")]
    pub audience: Option<String>,
    #[arg(long, allow_negative_numbers = true, help = "Result cap, clamped to 1..=2")]
    pub max_results: Option<i64>,
    #[arg(long, help = "Product catalog JSON file (defaults to the built-in demo catalog)")]
    pub catalog: Option<PathBuf>,
    #[arg(long, help = "Taxonomy allow-list JSON file")]
    pub taxonomy: Option<PathBuf>,
}

pub fn run(args: RecommendArgs, config_path: Option<PathBuf>) -> CommandResult {
    let options = LoadOptions {
        config_path,
        overrides: ConfigOverrides {
            catalog_path: args.catalog.clone(),
            taxonomy_path: args.taxonomy.clone(),
            ..ConfigOverrides::default()
        },
        ..LoadOptions::default()
    };
    let config = match AppConfig::load(options) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                COMMAND,
                "config_validation",
                format!("configuration issue: {error}"),
                3,
            );
        }
    };
    init_logging(&config);

    let (taxonomy, catalog) = match load_snapshots(&config) {
        Ok(snapshots) => snapshots,
        Err(error) => {
            return CommandResult::failure(COMMAND, "catalog_load", format!("{error:#}"), 4);
        }
    };

    let concierge = Concierge::from_config(&config, taxonomy).default_catalog(catalog).build();

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                COMMAND,
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                5,
            );
        }
    };

    let mut request = RecommendRequest::new(args.text);
    request.context.audience = args.audience;
    request.context.max_results = args.max_results;

    let reply = Reply::from(runtime.block_on(concierge.recommend(request)));
    let exit_code = if reply.is_success() { 0 } else { 2 };
    CommandResult::document(COMMAND, &reply, exit_code)
}

fn load_snapshots(config: &AppConfig) -> Result<(Taxonomy, Vec<Product>)> {
    let taxonomy = match &config.taxonomy.path {
        Some(path) => load_taxonomy(path)
            .with_context(|| format!("loading taxonomy from {}", path.display()))?,
        None => Taxonomy::default(),
    };

    let catalog = match &config.catalog.path {
        Some(path) => load_products(path)
            .with_context(|| format!("loading catalog from {}", path.display()))?,
        None => demo_catalog(),
    };

    Ok((taxonomy, catalog))
}
