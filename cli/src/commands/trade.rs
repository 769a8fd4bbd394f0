// agricredit/cli/src/commands/trade.rs

use agricredit_marketplace::AgriMarket;
use agricredit_primitives::{AccountId, CancelReason, ListingId, TradeId};
use agricredit_storage::LedgerStore;
use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;

use crate::utils::output::{credits, print_trade, Output};

#[derive(Subcommand)]
pub enum TradeCommands {
    /// Buy a listing; its total is locked in escrow
    Buy {
        buyer: AccountId,
        listing: ListingId,
    },

    /// Confirm delivery and release escrow to the seller
    Confirm {
        trade: TradeId,

        /// Buyer or seller of the trade
        confirmer: AccountId,
    },

    /// Cancel an escrowed trade and refund the buyer
    Cancel {
        trade: TradeId,
        requester: AccountId,

        /// mutual (seller), arbiter, or timeout (after the dispute window)
        #[arg(short, long, default_value = "mutual")]
        reason: CancelReason,
    },

    /// Show one trade
    Show {
        trade: TradeId,
    },
}

pub fn execute<S: LedgerStore>(
    cmd: TradeCommands,
    market: &AgriMarket<S>,
    output: Output,
) -> Result<()> {
    match cmd {
        TradeCommands::Buy { buyer, listing } => {
            let trade = market
                .buy_listing(&buyer, &listing)
                .with_context(|| format!("Failed to buy listing {}", listing))?;
            output.emit(&trade, |trade| {
                println!(
                    "{}",
                    format!("✓ {} locked in escrow", credits(trade.locked_amount)).green()
                );
                print_trade(trade);
            })
        }
        TradeCommands::Confirm { trade, confirmer } => {
            let trade = market
                .confirm_delivery(&trade, &confirmer)
                .with_context(|| format!("Failed to confirm delivery for trade {}", trade))?;
            output.emit(&trade, |trade| {
                println!(
                    "{}",
                    format!(
                        "✓ Released {} to {} (fee {})",
                        credits(trade.locked_amount - trade.fee),
                        trade.seller,
                        credits(trade.fee)
                    )
                    .green()
                );
                print_trade(trade);
            })
        }
        TradeCommands::Cancel {
            trade,
            requester,
            reason,
        } => {
            let trade = market
                .cancel_trade(&trade, &requester, reason)
                .with_context(|| format!("Failed to cancel trade {}", trade))?;
            output.emit(&trade, |trade| {
                println!(
                    "{}",
                    format!("✓ Refunded {} to {}", credits(trade.locked_amount), trade.buyer)
                        .green()
                );
                print_trade(trade);
            })
        }
        TradeCommands::Show { trade } => {
            let trade = market
                .get_trade(&trade)
                .with_context(|| format!("Failed to load trade {}", trade))?;
            output.emit(&trade, print_trade)
        }
    }
}
