#![allow(clippy::doc_markdown)]
//! `annex` CLI - nearest-neighbor search over JSON Lines data
//!
//! Usage:
//!   `annex search ./vectors.jsonl --query "0.1,0.2,0.3" -k 5`
//!   `annex stats ./vectors.jsonl`
//!   `annex config`

mod import;
mod output;

use annex_core::{AnnexConfig, LoggingConfig, VectorTable};
use anyhow::Context;
use clap::{Parser, Subcommand};
use output::OutputFormat;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "annex")]
#[command(
    author,
    version,
    about = "Annex CLI - HNSW nearest-neighbor search"
)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, env = "ANNEX_CONFIG", default_value = "annex.toml")]
    config: PathBuf,

    /// Fixed seed for layer sampling (overrides hnsw.seed)
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load vectors and return the rows nearest to a query
    Search {
        /// Path to JSON Lines data file
        file: PathBuf,

        /// Query vector, as a JSON array or comma-separated floats
        #[arg(short, long, allow_hyphen_values = true)]
        query: String,

        /// Number of rows to return
        #[arg(short = 'k', long, default_value = "10")]
        limit: usize,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Load vectors and print per-layer graph statistics
    Stats {
        /// Path to JSON Lines data file
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Print the effective configuration as TOML
    Config,
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("annex_core={0},annex={0}", logging.level)));
    let registry = tracing_subscriber::registry().with(filter);

    if logging.format == "json" {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn load_table(config: &AnnexConfig, file: &Path) -> anyhow::Result<VectorTable> {
    let table = VectorTable::from_config(config)?;
    let stats = import::import_jsonl(&table, file)?;
    if stats.imported == 0 {
        anyhow::bail!(
            "No valid records in {} ({} errors)",
            file.display(),
            stats.errors
        );
    }
    tracing::info!(
        rows = stats.imported,
        errors = stats.errors,
        records_per_sec = stats.records_per_sec(),
        "table loaded"
    );
    Ok(table)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AnnexConfig::load_from_path(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    if cli.seed.is_some() {
        config.hnsw.seed = cli.seed;
    }
    config.validate()?;
    init_tracing(&config.logging);

    match cli.command {
        Commands::Search {
            file,
            query,
            limit,
            format,
        } => {
            let query = import::parse_vector(&query)?;
            let table = load_table(&config, &file)?;
            let hits = table.search(&query, limit)?;
            output::print_hits(&hits, format)?;
        }
        Commands::Stats { file, format } => {
            let table = load_table(&config, &file)?;
            let stats = table.stats()?;
            output::print_stats(table.len(), &stats, format)?;
        }
        Commands::Config => {
            print!("{}", config.to_toml()?);
        }
    }

    Ok(())
}
