// agricredit/core/storage/src/lib.rs

//! Ledger storage for AgriCredit.
//!
//! All money movement funnels through [`LedgerStore::transact`]: one
//! multi-account atomic update that either commits every staged write or
//! none of them.

pub mod db;
pub mod memory;
pub mod state;
pub mod store;

pub use db::RocksLedgerStore;
pub use memory::MemoryLedgerStore;
pub use state::{GenesisAllocation, LedgerState, LedgerTxn, WriteSet};
pub use store::LedgerStore;
