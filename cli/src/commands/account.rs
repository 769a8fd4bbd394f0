// agricredit/cli/src/commands/account.rs

use agricredit_economics::RewardAction;
use agricredit_marketplace::AgriMarket;
use agricredit_primitives::AccountId;
use agricredit_storage::LedgerStore;
use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;

use crate::utils::output::{credits, print_trade, Output};

#[derive(Subcommand)]
pub enum AccountCommands {
    /// Open a new account with a zero balance
    Open {
        /// Account id
        account: AccountId,
    },

    /// Available and locked credits, after inactivity decay
    Balance {
        account: AccountId,
    },

    /// Trades where the account is buyer or seller, newest first
    History {
        account: AccountId,
    },

    /// Mint a platform reward to an account
    Reward {
        account: AccountId,

        /// listing_created, trade_completed, first_trade_of_month,
        /// peer_verification, quality_grade or referral
        action: RewardAction,
    },
}

pub fn execute<S: LedgerStore>(
    cmd: AccountCommands,
    market: &AgriMarket<S>,
    output: Output,
) -> Result<()> {
    match cmd {
        AccountCommands::Open { account } => {
            let opened = market
                .open_account(account.clone())
                .with_context(|| format!("Failed to open account {}", account))?;
            output.emit(&opened, |opened| {
                println!("{}", "✓ Account opened".green());
                println!("Account: {}", opened.id.to_string().cyan());
                println!("Trust:   {}", opened.trust_score);
            })
        }
        AccountCommands::Balance { account } => {
            let balance = market
                .get_balance(&account)
                .with_context(|| format!("Failed to read balance of {}", account))?;
            output.emit(&balance, |balance| {
                println!("Account:   {}", account.to_string().cyan());
                println!("Available: {}", credits(balance.available).bold());
                println!("Locked:    {}", credits(balance.locked));
            })
        }
        AccountCommands::History { account } => {
            let trades = market.get_transaction_history(&account);
            output.emit(&trades, |trades| {
                if trades.is_empty() {
                    println!("{}", "No trades found".yellow());
                    return;
                }
                println!("{}", format!("Trades for {}:", account).bold());
                for trade in trades {
                    println!();
                    print_trade(trade);
                }
            })
        }
        AccountCommands::Reward { account, action } => {
            let balance = market
                .issue_reward(&account, action)
                .with_context(|| format!("Failed to issue {} reward to {}", action, account))?;
            output.emit(&balance, |balance| {
                println!(
                    "{}",
                    format!("✓ Issued {} for {}", credits(action.credits()), action).green()
                );
                println!("Available: {}", credits(balance.available).bold());
            })
        }
    }
}
