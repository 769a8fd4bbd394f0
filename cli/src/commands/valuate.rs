// agricredit/cli/src/commands/valuate.rs

use agricredit_economics::Valuator;
use anyhow::Result;
use colored::Colorize;
use std::collections::BTreeMap;

use crate::config::AgriConfig;
use crate::utils::output::{credits, Output};

pub fn execute(config: &AgriConfig, commodity: &str, quantity: u64, output: Output) -> Result<()> {
    let valuator = Valuator::new(config.economics.valuation.clone())?;
    let quote = valuator.quote(commodity, quantity);

    output.emit(&quote, |quote| {
        println!("Commodity: {}", quote.commodity.cyan());
        if quote.used_fallback {
            println!(
                "{}",
                format!("  no reference price, priced as {}", quote.priced_as).yellow()
            );
        }
        println!(
            "MSP:       ₹{}.{:02} per 100 units",
            quote.reference_price_paise / 100,
            quote.reference_price_paise % 100
        );
        println!("Quantity:  {}", quote.quantity);
        println!("Value:     {}", credits(quote.credits).bold());
    })
}

/// Print the reference price table
pub fn list_prices(config: &AgriConfig, output: Output) -> Result<()> {
    let valuator = Valuator::new(config.economics.valuation.clone())?;
    let prices: BTreeMap<&str, u64> = valuator.commodities().collect();

    output.emit(&prices, |prices| {
        println!("{}", "MSP reference prices (per 100 units):".bold());
        for (commodity, paise) in prices {
            let marker = if *commodity == config.economics.valuation.default_commodity {
                " (default)".dimmed()
            } else {
                "".normal()
            };
            println!("  • {:<12} ₹{}.{:02}{}", commodity, paise / 100, paise % 100, marker);
        }
        println!(
            "\n1 credit = ₹{}.{:02}",
            config.economics.valuation.paise_per_credit / 100,
            config.economics.valuation.paise_per_credit % 100
        );
    })
}
