pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::Level;
use vestia_core::config::{AppConfig, LoadOptions, LogFormat};

#[derive(Debug, Parser)]
#[command(
    name = "vestia",
    about = "Vestia compatibility aggregator CLI",
    long_about = "Ingest the product catalog, build pairwise compatibility stats and inspect the results.",
    after_help = "Examples:\n  vestia ingest --file styles.csv\n  vestia build --dimension all\n  vestia stats --dimension color --limit 20"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Apply pending database migrations and return structured status output")]
    Migrate,
    #[command(about = "Load the styles export (CSV or JSON lines) into the product catalog")]
    Ingest {
        #[arg(long, help = "Path to styles.csv, or a JSON-lines file with one product per line")]
        file: PathBuf,
    },
    #[command(about = "Aggregate the catalog into compatibility stats and upsert them")]
    Build {
        #[arg(long, default_value = "all", help = "article, color, usage or all")]
        dimension: String,
    },
    #[command(about = "Upsert the starter article and color compatibility rules")]
    Seed,
    #[command(about = "List stored compatibility stats for one dimension, highest score first")]
    Stats {
        #[arg(long, help = "article, color or usage")]
        dimension: String,
        #[arg(long, default_value_t = 50)]
        limit: u32,
    },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
    #[command(about = "Validate config, DB connectivity and schema readiness")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    let result = match cli.command {
        Command::Migrate => commands::migrate::run(),
        Command::Ingest { file } => commands::ingest::run(&file),
        Command::Build { dimension } => commands::build::run(&dimension),
        Command::Seed => commands::seed::run(),
        Command::Stats { dimension, limit } => commands::stats::run(&dimension, limit),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(json) }
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

/// Logs go to stderr so stdout stays a single JSON payload per command.
fn init_logging() {
    let (level, format) = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => (config.logging.level, config.logging.format),
        Err(_) => ("info".to_string(), LogFormat::Compact),
    };
    let log_level = level.parse::<Level>().unwrap_or(Level::INFO);

    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(log_level)
        .with_writer(std::io::stderr);

    let _ = match format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}
