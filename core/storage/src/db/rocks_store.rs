// agricredit/core/storage/src/db/rocks_store.rs

use crate::db::column_families::*;
use crate::state::{GenesisAllocation, LedgerState, LedgerTxn, WriteSet};
use crate::store::LedgerStore;
use agricredit_primitives::{Account, LedgerError, LedgerResult, Listing, Trade};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use rocksdb::{ColumnFamily, IteratorMode, Options, WriteBatch, DB};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Durable ledger store.
///
/// Committed state is cached in memory behind the same lock discipline as
/// [`crate::MemoryLedgerStore`]. Every transaction becomes one RocksDB
/// `WriteBatch`; the cache is updated only after the batch is written.
pub struct RocksLedgerStore {
    db: DB,
    path: PathBuf,
    state: RwLock<LedgerState>,
}

impl RocksLedgerStore {
    /// Open or create a store. `genesis` is written only when the store is new.
    pub fn open(
        path: impl AsRef<Path>,
        genesis: &[GenesisAllocation],
        now: DateTime<Utc>,
    ) -> LedgerResult<Self> {
        let path = path.as_ref().to_path_buf();

        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let db = DB::open_cf(&opts, &path, ALL_COLUMN_FAMILIES).map_err(storage_error)?;

        let initialized = db
            .get_cf(column_family(&db, CF_META)?, KEY_SUPPLY)
            .map_err(storage_error)?
            .is_some();

        let state = if initialized {
            let state = load_state(&db)?;
            info!(
                path = %path.display(),
                accounts = state.accounts.len(),
                listings = state.listings.len(),
                trades = state.trades.len(),
                "Opened ledger store"
            );
            state
        } else {
            let state = LedgerState::genesis(genesis, now);
            let writes = WriteSet {
                accounts: state
                    .accounts
                    .iter()
                    .map(|(id, account)| (id.clone(), account.clone()))
                    .collect(),
                wallet: Some(state.wallet),
                supply: Some(state.supply),
                next_sequence: Some(state.next_sequence),
                ..WriteSet::default()
            };
            db.write(build_batch(&db, &writes)?).map_err(storage_error)?;
            info!(
                path = %path.display(),
                genesis_accounts = genesis.len(),
                genesis_supply = state.supply.genesis,
                "Created ledger store"
            );
            state
        };

        Ok(Self {
            db,
            path,
            state: RwLock::new(state),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn flush(&self) -> LedgerResult<()> {
        self.db.flush().map_err(storage_error)
    }
}

impl LedgerStore for RocksLedgerStore {
    fn transact<T, F>(&self, f: F) -> LedgerResult<T>
    where
        F: FnOnce(&mut LedgerTxn<'_>) -> LedgerResult<T>,
    {
        let mut state = self.state.write();
        let (value, writes) = {
            let mut txn = LedgerTxn::new(&state);
            let value = f(&mut txn)?;
            (value, txn.into_write_set())
        };

        if writes.is_empty() {
            return Ok(value);
        }

        let batch = build_batch(&self.db, &writes)?;
        self.db.write(batch).map_err(storage_error)?;
        debug!(
            accounts = writes.accounts.len(),
            listings = writes.listings.len(),
            trades = writes.trades.len(),
            "Persisted ledger update"
        );

        state.apply(writes);
        Ok(value)
    }

    fn read<T, F>(&self, f: F) -> T
    where
        F: FnOnce(&LedgerState) -> T,
    {
        f(&self.state.read())
    }
}

fn build_batch(db: &DB, writes: &WriteSet) -> LedgerResult<WriteBatch> {
    let mut batch = WriteBatch::default();

    let accounts = column_family(db, CF_ACCOUNTS)?;
    for (id, account) in &writes.accounts {
        batch.put_cf(accounts, id.as_str().as_bytes(), encode(account)?);
    }

    let listings = column_family(db, CF_LISTINGS)?;
    for (id, listing) in &writes.listings {
        batch.put_cf(listings, id.as_bytes(), encode(listing)?);
    }

    let trades = column_family(db, CF_TRADES)?;
    for (id, trade) in &writes.trades {
        batch.put_cf(trades, id.as_bytes(), encode(trade)?);
    }

    let meta = column_family(db, CF_META)?;
    if let Some(wallet) = &writes.wallet {
        batch.put_cf(meta, KEY_WALLET, encode(wallet)?);
    }
    if let Some(supply) = &writes.supply {
        batch.put_cf(meta, KEY_SUPPLY, encode(supply)?);
    }
    if let Some(next_sequence) = &writes.next_sequence {
        batch.put_cf(meta, KEY_NEXT_SEQUENCE, next_sequence.to_be_bytes());
    }

    Ok(batch)
}

fn load_state(db: &DB) -> LedgerResult<LedgerState> {
    let mut state = LedgerState::new();

    for account in load_cf::<Account>(db, CF_ACCOUNTS)? {
        state.accounts.insert(account.id.clone(), account);
    }
    for listing in load_cf::<Listing>(db, CF_LISTINGS)? {
        state.listings.insert(listing.id, listing);
    }
    for trade in load_cf::<Trade>(db, CF_TRADES)? {
        state.trades.insert(trade.id, trade);
    }

    let meta = column_family(db, CF_META)?;
    if let Some(bytes) = db.get_cf(meta, KEY_WALLET).map_err(storage_error)? {
        state.wallet = decode(&bytes)?;
    }
    if let Some(bytes) = db.get_cf(meta, KEY_SUPPLY).map_err(storage_error)? {
        state.supply = decode(&bytes)?;
    }
    if let Some(bytes) = db.get_cf(meta, KEY_NEXT_SEQUENCE).map_err(storage_error)? {
        let raw: [u8; 8] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| LedgerError::Storage("corrupt sequence counter".to_string()))?;
        state.next_sequence = u64::from_be_bytes(raw);
    }

    Ok(state)
}

fn load_cf<T: DeserializeOwned>(db: &DB, name: &str) -> LedgerResult<Vec<T>> {
    let cf = column_family(db, name)?;
    let mut records = Vec::new();
    for item in db.iterator_cf(cf, IteratorMode::Start) {
        let (_, value) = item.map_err(storage_error)?;
        records.push(decode(&value)?);
    }
    Ok(records)
}

fn column_family<'a>(db: &'a DB, name: &str) -> LedgerResult<&'a ColumnFamily> {
    db.cf_handle(name)
        .ok_or_else(|| LedgerError::Storage(format!("missing column family {}", name)))
}

fn encode<T: Serialize>(value: &T) -> LedgerResult<Vec<u8>> {
    bincode::serialize(value).map_err(storage_error)
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> LedgerResult<T> {
    bincode::deserialize(bytes).map_err(storage_error)
}

fn storage_error(err: impl std::fmt::Display) -> LedgerError {
    LedgerError::Storage(err.to_string())
}
