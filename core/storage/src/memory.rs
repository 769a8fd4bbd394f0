// agricredit/core/storage/src/memory.rs

use crate::state::{GenesisAllocation, LedgerState, LedgerTxn};
use crate::store::LedgerStore;
use agricredit_primitives::LedgerResult;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::debug;

/// In-memory ledger arena behind a single lock
#[derive(Debug, Default)]
pub struct MemoryLedgerStore {
    state: RwLock<LedgerState>,
}

impl MemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_genesis(allocations: &[GenesisAllocation], now: DateTime<Utc>) -> Self {
        Self {
            state: RwLock::new(LedgerState::genesis(allocations, now)),
        }
    }
}

impl LedgerStore for MemoryLedgerStore {
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

        if !writes.is_empty() {
            debug!(
                accounts = writes.accounts.len(),
                listings = writes.listings.len(),
                trades = writes.trades.len(),
                "Committed ledger update"
            );
            state.apply(writes);
        }
        Ok(value)
    }

    fn read<T, F>(&self, f: F) -> T
    where
        F: FnOnce(&LedgerState) -> T,
    {
        f(&self.state.read())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agricredit_primitives::{AccountId, BalanceDelta, LedgerError};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    fn id(name: &str) -> AccountId {
        AccountId::new(name).unwrap()
    }

    fn store() -> MemoryLedgerStore {
        MemoryLedgerStore::with_genesis(
            &[
                GenesisAllocation {
                    account: id("alice"),
                    credits: 1_000,
                },
                GenesisAllocation {
                    account: id("bob"),
                    credits: 1_000,
                },
            ],
            Utc::now(),
        )
    }

    #[test]
    fn test_failed_update_applies_nothing() {
        let store = store();

        let result: LedgerResult<()> = store.transact(|txn| {
            txn.apply_delta(&id("alice"), BalanceDelta::debit(500))?;
            txn.apply_delta(&id("bob"), BalanceDelta::credit(500))?;
            // third leg overdraws and aborts the whole update
            txn.apply_delta(&id("alice"), BalanceDelta::debit(600))?;
            Ok(())
        });

        assert!(matches!(result, Err(LedgerError::Conflict(_))));
        store.read(|state| {
            assert_eq!(state.account(&id("alice")).unwrap().available, 1_000);
            assert_eq!(state.account(&id("bob")).unwrap().available, 1_000);
        });
    }

    #[test]
    fn test_successful_update_commits_all_legs() {
        let store = store();

        store
            .transact(|txn| {
                txn.apply_delta(&id("alice"), BalanceDelta::debit(300))?;
                txn.apply_delta(&id("bob"), BalanceDelta::credit(300))
            })
            .unwrap();

        store.read(|state| {
            assert_eq!(state.account(&id("alice")).unwrap().available, 700);
            assert_eq!(state.account(&id("bob")).unwrap().available, 1_300);
            assert_eq!(state.circulating_supply(), 2_000);
        });
    }

    #[test]
    fn test_readers_never_see_partial_updates() {
        let store = Arc::new(store());
        let done = Arc::new(AtomicBool::new(false));

        let writer = {
            let store = Arc::clone(&store);
            let done = Arc::clone(&done);
            std::thread::spawn(move || {
                for i in 0..2_000u64 {
                    let (from, to) = if i % 2 == 0 { ("alice", "bob") } else { ("bob", "alice") };
                    store
                        .transact(|txn| {
                            txn.apply_delta(&id(from), BalanceDelta::lock(10))?;
                            txn.apply_delta(&id(from), BalanceDelta::release_locked(10))?;
                            txn.apply_delta(&id(to), BalanceDelta::credit(10))
                        })
                        .unwrap();
                }
                done.store(true, Ordering::SeqCst);
            })
        };

        while !done.load(Ordering::SeqCst) {
            let total = store.read(|state| state.circulating_supply());
            assert_eq!(total, 2_000);
        }
        writer.join().unwrap();
    }
}
