// agricredit/cli/src/main.rs

use agricredit_marketplace::{metrics, AgriMarket};
use agricredit_primitives::SystemClock;
use agricredit_storage::{LedgerStore, MemoryLedgerStore, RocksLedgerStore};
use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};

mod commands;
mod config;
mod logging;
mod utils;

use commands::LedgerCommands;
use config::{AgriConfig, StorageBackend};
use logging::{init_logging, LogConfig};
use utils::output::Output;

#[derive(Parser)]
#[command(
    name = "agricredit",
    version,
    about = "AgriCredit ledger CLI - MSP-pegged credits, listings and escrowed trades",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, global = true, env = "AGRICREDIT_CONFIG")]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Print operation counters (Prometheus text format) to stderr after a ledger command
    #[arg(long, global = true)]
    metrics: bool,

    /// Verbosity level
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },

    /// Credit value of a commodity quantity at the MSP peg
    Valuate {
        commodity: String,

        /// Quantity in base units (kg)
        quantity: u64,
    },

    /// Show the MSP reference price table
    Prices,

    #[command(flatten)]
    Ledger(LedgerCommands),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&LogConfig::from_env().with_verbosity(cli.verbose))?;
    let output = Output::new(cli.json);

    match cli.command {
        Commands::Init { force } => {
            let path = AgriConfig::init(cli.config.as_deref(), force)?;
            println!("{}", "✓ Configuration initialized successfully".green());
            println!("Config: {:?}", path);
        }
        Commands::Valuate {
            commodity,
            quantity,
        } => {
            let config = AgriConfig::load(cli.config.as_deref())?;
            commands::valuate::execute(&config, &commodity, quantity, output)?;
        }
        Commands::Prices => {
            let config = AgriConfig::load(cli.config.as_deref())?;
            commands::valuate::list_prices(&config, output)?;
        }
        Commands::Ledger(cmd) => {
            let config = AgriConfig::load(cli.config.as_deref())?;
            match config.storage.backend {
                StorageBackend::Rocksdb => {
                    let store = RocksLedgerStore::open(
                        &config.storage.data_dir,
                        &config.genesis,
                        Utc::now(),
                    )
                    .with_context(|| {
                        format!("Failed to open ledger at {:?}", config.storage.data_dir)
                    })?;
                    debug!(path = %store.path().display(), "Ledger opened");
                    run(Arc::new(store), &config, cmd, output)?;
                }
                StorageBackend::Memory => {
                    warn!("Memory backend selected; changes are discarded on exit");
                    let store = MemoryLedgerStore::with_genesis(&config.genesis, Utc::now());
                    run(Arc::new(store), &config, cmd, output)?;
                }
            }
            if cli.metrics {
                eprint!("{}", metrics::gather_text());
            }
        }
    }

    Ok(())
}

fn run<S: LedgerStore>(
    store: Arc<S>,
    config: &AgriConfig,
    cmd: LedgerCommands,
    output: Output,
) -> Result<()> {
    let market = AgriMarket::new(store, config.market_config(), Arc::new(SystemClock))
        .context("Invalid market configuration")?;
    commands::execute(cmd, &market, output)
}
