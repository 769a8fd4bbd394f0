// agricredit/cli/src/commands/listing.rs

use agricredit_marketplace::AgriMarket;
use agricredit_primitives::{AccountId, Credits, ListingId};
use agricredit_storage::LedgerStore;
use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;

use crate::utils::output::{credits, print_listing, Output};

#[derive(Subcommand)]
pub enum ListingCommands {
    /// Offer a commodity lot for sale
    Create {
        owner: AccountId,
        commodity: String,

        /// Quantity in base units (kg)
        quantity: u64,

        /// Price per base unit in credits
        unit_price: Credits,
    },

    /// Endorse another account's listing
    Verify {
        listing: ListingId,
        verifier: AccountId,
    },

    /// Show one listing
    Show {
        listing: ListingId,
    },

    /// List open listings, newest first
    Open,
}

pub fn execute<S: LedgerStore>(
    cmd: ListingCommands,
    market: &AgriMarket<S>,
    output: Output,
) -> Result<()> {
    match cmd {
        ListingCommands::Create {
            owner,
            commodity,
            quantity,
            unit_price,
        } => {
            let listing = market
                .create_listing(&owner, &commodity, quantity, unit_price)
                .with_context(|| format!("Failed to create listing for {}", owner))?;
            let reference = market.valuate(&listing.commodity, quantity);
            output.emit(&listing, |listing| {
                println!("{}", "✓ Listing created".green());
                print_listing(listing);
                println!("MSP value: {}", credits(reference).dimmed());
            })
        }
        ListingCommands::Verify { listing, verifier } => {
            let listing = market
                .verify_listing(&listing, &verifier)
                .with_context(|| format!("Failed to verify listing {}", listing))?;
            output.emit(&listing, |listing| {
                println!("{}", format!("✓ Verification by {} recorded", verifier).green());
                print_listing(listing);
            })
        }
        ListingCommands::Show { listing } => {
            let listing = market
                .get_listing(&listing)
                .with_context(|| format!("Failed to load listing {}", listing))?;
            output.emit(&listing, print_listing)
        }
        ListingCommands::Open => {
            let listings = market.open_listings();
            output.emit(&listings, |listings| {
                if listings.is_empty() {
                    println!("{}", "No open listings".yellow());
                    return;
                }
                println!("{}", "Open listings:".bold());
                for listing in listings {
                    println!(
                        "  • {} {} {} x {} = {}{}",
                        listing.id.to_string().cyan(),
                        listing.commodity,
                        listing.quantity,
                        credits(listing.unit_price),
                        credits(listing.total),
                        if listing.verified { " ✓".green() } else { "".normal() }
                    );
                }
                println!("\nTotal: {} listing(s)", listings.len());
            })
        }
    }
}
