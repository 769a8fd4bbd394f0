// agricredit/cli/src/commands/wallet.rs

use agricredit_marketplace::AgriMarket;
use agricredit_storage::LedgerStore;
use anyhow::Result;
use colored::Colorize;

use crate::utils::output::{credits, Output};

pub fn execute<S: LedgerStore>(market: &AgriMarket<S>, output: Output) -> Result<()> {
    let audit = market.supply_audit();

    output.emit(&audit, |audit| {
        println!("{}", "Platform wallet".bold());
        println!("  Collected fees: {}", credits(audit.wallet.collected_fees));
        println!("  Fee events:     {}", audit.wallet.fee_events);
        println!("{}", "Supply".bold());
        println!("  Genesis:     {}", audit.supply.genesis);
        println!("  Minted:      {}", audit.supply.minted);
        println!("  Decayed:     {}", audit.supply.decayed);
        println!("  Circulating: {}", audit.circulating);
        if audit.is_balanced() {
            println!("{}", "✓ Supply balanced".green());
        } else {
            println!(
                "{}",
                format!("✗ Supply mismatch: expected {}", audit.expected).red().bold()
            );
        }
    })
}
