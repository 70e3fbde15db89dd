pub mod commands;
pub mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use commands::recommend::RecommendArgs;

#[derive(Debug, Parser)]
#[command(
    name = "concierge",
    about = "Shopping concierge operator CLI",
    long_about = "Turn shopper text into a short, inventory-aware product list and inspect effective configuration.",
    after_help = "Examples:\n  concierge recommend --text \"modern business look for her\"\n  concierge recommend --text \"beach wedding\" --catalog products.json --max-results 1\n  concierge config"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Config file (defaults to concierge.toml or config/concierge.toml)")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Recommend products for a shopper message and print the JSON response")]
    Recommend(RecommendArgs),
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Recommend(args) => commands::recommend::run(args, cli.config),
        Command::Config => commands::config::run(cli.config),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
