// agricredit/core/storage/src/store.rs

use crate::state::{LedgerState, LedgerTxn};
use agricredit_primitives::LedgerResult;

/// Atomic access to ledger state.
///
/// `transact` runs the closure against a staged view while holding the
/// store's write lock. If the closure returns `Ok`, every staged write is
/// committed together; on `Err` nothing is. `read` observes committed state
/// only, so a reader never sees half of an update.
pub trait LedgerStore: Send + Sync {
    fn transact<T, F>(&self, f: F) -> LedgerResult<T>
    where
        F: FnOnce(&mut LedgerTxn<'_>) -> LedgerResult<T>;

    fn read<T, F>(&self, f: F) -> T
    where
        F: FnOnce(&LedgerState) -> T;
}
