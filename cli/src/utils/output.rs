// agricredit/cli/src/utils/output.rs

use agricredit_primitives::{Credits, Listing, Trade, TradeStatus};
use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

/// Human or JSON rendering for command results
#[derive(Debug, Clone, Copy)]
pub struct Output {
    json: bool,
}

impl Output {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    /// Print `value` as JSON, or run `human` for terminal output
    pub fn emit<T: Serialize>(&self, value: &T, human: impl FnOnce(&T)) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            human(value);
        }
        Ok(())
    }
}

pub fn credits(amount: Credits) -> String {
    format!("{} AC", amount)
}

pub fn print_listing(listing: &Listing) {
    println!("Listing:   {}", listing.id.to_string().cyan());
    println!("Owner:     {}", listing.owner);
    println!("Commodity: {}", listing.commodity);
    println!(
        "Quantity:  {} @ {} = {}",
        listing.quantity,
        credits(listing.unit_price),
        credits(listing.total).bold()
    );
    println!("Status:    {}", listing.status);
    let verified = if listing.verified {
        "yes".green()
    } else {
        "no".yellow()
    };
    println!(
        "Verified:  {} ({} verifier(s))",
        verified,
        listing.verification_count()
    );
}

pub fn print_trade(trade: &Trade) {
    let status = match trade.status {
        TradeStatus::Escrow => trade.status.as_str().yellow(),
        TradeStatus::Completed => trade.status.as_str().green(),
        TradeStatus::Cancelled => trade.status.as_str().red(),
    };
    println!("Trade:   {} [{}]", trade.id.to_string().cyan(), status);
    println!("Listing: {}", trade.listing_id);
    println!("Buyer:   {}", trade.buyer);
    println!("Seller:  {}", trade.seller);
    println!("Amount:  {}", credits(trade.locked_amount));
    if trade.status == TradeStatus::Completed {
        println!("Fee:     {}", credits(trade.fee));
    }
    println!("Opened:  {}", trade.created_at.to_rfc3339());
    if let Some(at) = trade.completed_at {
        println!("Closed:  {}", at.to_rfc3339());
    }
    if let (Some(at), Some(reason)) = (trade.cancelled_at, trade.cancel_reason) {
        println!("Cancelled: {} ({})", at.to_rfc3339(), reason);
    }
}
