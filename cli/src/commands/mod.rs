// agricredit/cli/src/commands/mod.rs

pub mod account;
pub mod listing;
pub mod trade;
pub mod valuate;
pub mod wallet;

use agricredit_marketplace::AgriMarket;
use agricredit_storage::LedgerStore;
use anyhow::Result;
use clap::Subcommand;

use crate::utils::output::Output;

/// Commands that need an open ledger
#[derive(Subcommand)]
pub enum LedgerCommands {
    /// Account management
    #[command(subcommand)]
    Account(account::AccountCommands),

    /// Create, verify and browse listings
    #[command(subcommand)]
    Listing(listing::ListingCommands),

    /// Buy listings and settle escrow
    #[command(subcommand)]
    Trade(trade::TradeCommands),

    /// Platform fee wallet and supply audit
    Wallet,
}

pub fn execute<S: LedgerStore>(
    cmd: LedgerCommands,
    market: &AgriMarket<S>,
    output: Output,
) -> Result<()> {
    match cmd {
        LedgerCommands::Account(cmd) => account::execute(cmd, market, output),
        LedgerCommands::Listing(cmd) => listing::execute(cmd, market, output),
        LedgerCommands::Trade(cmd) => trade::execute(cmd, market, output),
        LedgerCommands::Wallet => wallet::execute(market, output),
    }
}
