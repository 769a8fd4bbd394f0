// agricredit/core/storage/src/db/mod.rs

// Database module
pub mod column_families;
pub mod rocks_store;

pub use rocks_store::RocksLedgerStore;
