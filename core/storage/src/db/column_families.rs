// agricredit/core/storage/src/db/column_families.rs

pub const CF_ACCOUNTS: &str = "accounts";
pub const CF_LISTINGS: &str = "listings";
pub const CF_TRADES: &str = "trades";
pub const CF_META: &str = "meta";

pub const ALL_COLUMN_FAMILIES: &[&str] = &[CF_ACCOUNTS, CF_LISTINGS, CF_TRADES, CF_META];

// Singleton keys in CF_META
pub const KEY_WALLET: &[u8] = b"wallet";
pub const KEY_SUPPLY: &[u8] = b"supply";
pub const KEY_NEXT_SEQUENCE: &[u8] = b"next_sequence";
