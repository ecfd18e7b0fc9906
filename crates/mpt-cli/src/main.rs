mod commands;
mod config;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::optimize::{EnsembleArgs, OptimizeArgs};
use commands::projection::ProjectArgs;
use commands::validate::ValidateArgs;
use config::CliConfig;

/// Monte Carlo maximum-Sharpe portfolio optimization
#[derive(Parser)]
#[command(
    name = "mpt",
    version,
    about = "Monte Carlo maximum-Sharpe portfolio optimization",
    long_about = "A CLI for Modern Portfolio Theory optimization. Samples random long-only \
                  portfolios, keeps the one with the highest Sharpe ratio, returns a sample \
                  of the efficient frontier, and projects an allocation's growth."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// YAML or JSON file with default input values
    #[arg(long, global = true)]
    config: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Find the maximum-Sharpe portfolio and an efficient frontier sample
    Optimize(OptimizeArgs),
    /// Average the optima of several independent searches
    Ensemble(EnsembleArgs),
    /// Check assets and correlations without optimizing
    Validate(ValidateArgs),
    /// Project an allocation's value year by year
    Project(ProjectArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let config = match CliConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    };

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Optimize(args) => commands::optimize::run_optimize(args, &config),
        Commands::Ensemble(args) => commands::optimize::run_ensemble(args, &config),
        Commands::Validate(args) => commands::validate::run_validate(args, &config),
        Commands::Project(args) => commands::projection::run_project(args),
        Commands::Version => {
            println!("mpt {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
