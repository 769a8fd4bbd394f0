// agricredit/core/storage/src/state/mod.rs

pub mod txn;

pub use txn::{LedgerTxn, WriteSet};

use agricredit_primitives::{
    Account, AccountId, Credits, Listing, ListingId, ListingStatus, PlatformWallet, SupplyStats,
    Trade, TradeId,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Initial credits for one account, written once when a store is created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenesisAllocation {
    pub account: AccountId,
    pub credits: Credits,
}

/// Committed ledger state: accounts, listings, trades and the singletons
#[derive(Debug, Clone, Default)]
pub struct LedgerState {
    pub(crate) accounts: HashMap<AccountId, Account>,
    pub(crate) listings: HashMap<ListingId, Listing>,
    pub(crate) trades: HashMap<TradeId, Trade>,
    pub(crate) wallet: PlatformWallet,
    pub(crate) supply: SupplyStats,
    pub(crate) next_sequence: u64,
}

impl LedgerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// State holding only the genesis accounts
    pub fn genesis(allocations: &[GenesisAllocation], now: DateTime<Utc>) -> Self {
        let mut state = Self::new();
        for allocation in allocations {
            let account = state
                .accounts
                .entry(allocation.account.clone())
                .or_insert_with(|| Account::new(allocation.account.clone(), now));
            account.available = account.available.saturating_add(allocation.credits);
            state.supply.genesis = state.supply.genesis.saturating_add(allocation.credits);
        }
        state
    }

    pub fn account(&self, id: &AccountId) -> Option<&Account> {
        self.accounts.get(id)
    }

    pub fn listing(&self, id: &ListingId) -> Option<&Listing> {
        self.listings.get(id)
    }

    pub fn trade(&self, id: &TradeId) -> Option<&Trade> {
        self.trades.get(id)
    }

    pub fn wallet(&self) -> PlatformWallet {
        self.wallet
    }

    pub fn supply(&self) -> SupplyStats {
        self.supply
    }

    /// Trades where `account` is buyer or seller, newest first
    pub fn trades_for(&self, account: &AccountId) -> Vec<&Trade> {
        let mut trades: Vec<&Trade> = self
            .trades
            .values()
            .filter(|trade| trade.is_party(account))
            .collect();
        trades.sort_by(|a, b| b.sequence.cmp(&a.sequence));
        trades
    }

    /// Open listings, newest first
    pub fn open_listings(&self) -> Vec<&Listing> {
        let mut listings: Vec<&Listing> = self
            .listings
            .values()
            .filter(|listing| listing.status == ListingStatus::Open)
            .collect();
        listings.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        listings
    }

    /// Sum of all balances plus collected fees
    pub fn circulating_supply(&self) -> u128 {
        let balances: u128 = self
            .accounts
            .values()
            .map(|account| account.available as u128 + account.locked as u128)
            .sum();
        balances + self.wallet.collected_fees as u128
    }

    /// Apply a committed write set
    pub(crate) fn apply(&mut self, writes: WriteSet) {
        self.accounts.extend(writes.accounts);
        self.listings.extend(writes.listings);
        self.trades.extend(writes.trades);
        if let Some(wallet) = writes.wallet {
            self.wallet = wallet;
        }
        if let Some(supply) = writes.supply {
            self.supply = supply;
        }
        if let Some(next_sequence) = writes.next_sequence {
            self.next_sequence = next_sequence;
        }
    }
}
