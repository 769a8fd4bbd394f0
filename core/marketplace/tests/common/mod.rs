// Shared fixtures for marketplace integration tests

#![allow(dead_code)]

use agricredit_marketplace::{AgriMarket, MarketConfig};
use agricredit_primitives::{AccountId, Clock, Credits, ManualClock};
use agricredit_storage::{GenesisAllocation, MemoryLedgerStore};
use chrono::{TimeZone, Utc};
use std::sync::Arc;

pub fn id(name: &str) -> AccountId {
    AccountId::new(name).unwrap()
}

pub fn genesis(accounts: &[(&str, Credits)]) -> Vec<GenesisAllocation> {
    accounts
        .iter()
        .map(|(name, credits)| GenesisAllocation {
            account: id(name),
            credits: *credits,
        })
        .collect()
}

pub fn fixed_clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2024, 4, 1, 9, 0, 0).unwrap(),
    ))
}

pub fn market_with(
    accounts: &[(&str, Credits)],
    config: MarketConfig,
) -> (AgriMarket<MemoryLedgerStore>, Arc<ManualClock>) {
    let clock = fixed_clock();
    let store = Arc::new(MemoryLedgerStore::with_genesis(
        &genesis(accounts),
        clock.now(),
    ));
    let market = AgriMarket::new(store, config, clock.clone()).unwrap();
    (market, clock)
}

pub fn market(accounts: &[(&str, Credits)]) -> (AgriMarket<MemoryLedgerStore>, Arc<ManualClock>) {
    market_with(accounts, MarketConfig::default())
}
