// agricredit/core/marketplace/src/ledger.rs

use crate::metrics;
use agricredit_economics::{DecayPolicy, RewardAction};
use agricredit_primitives::{
    Account, AccountId, Balance, BalanceDelta, Clock, LedgerResult, PlatformWallet, SupplyStats,
};
use agricredit_storage::{LedgerStore, LedgerTxn};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// Conservation check over the whole ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplyAudit {
    /// Sum of available + locked across accounts, plus collected fees
    pub circulating: u128,
    /// genesis + minted - decayed
    pub expected: u128,
    pub supply: SupplyStats,
    pub wallet: PlatformWallet,
}

impl SupplyAudit {
    pub fn is_balanced(&self) -> bool {
        self.circulating == self.expected
    }
}

/// Account-level operations: opening accounts, balances, rewards
pub struct Ledger<S> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<S: LedgerStore> Ledger<S> {
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub fn open_account(&self, id: AccountId) -> LedgerResult<Account> {
        let now = self.clock.now();
        let result = self.store.transact(|txn| {
            let account = Account::new(id.clone(), now);
            txn.insert_account(account.clone())?;
            Ok(account)
        });

        metrics::record_outcome("open_account", &result);
        if result.is_ok() {
            info!(account = %id, "Account opened");
        }
        result
    }

    /// Balance with inactivity decay applied and committed
    pub fn get_balance(&self, id: &AccountId) -> LedgerResult<Balance> {
        self.account(id).map(|account| account.balance())
    }

    /// Account record with inactivity decay applied and committed
    pub fn account(&self, id: &AccountId) -> LedgerResult<Account> {
        let now = self.clock.now();
        let result = transact_settling(&*self.store, |txn| settle_account(txn, id, now));
        metrics::record_outcome("get_balance", &result);
        result
    }

    /// Mint the fixed reward for `action` to `id`
    pub fn issue_reward(&self, id: &AccountId, action: RewardAction) -> LedgerResult<Balance> {
        let now = self.clock.now();
        let result = transact_settling(&*self.store, |txn| {
            settle_account(txn, id, now)?;
            mint(txn, id, action, now).map(|account| account.balance())
        });

        metrics::record_outcome("issue_reward", &result);
        if result.is_ok() {
            metrics::CREDITS_MINTED_TOTAL.inc_by(action.credits());
            info!(account = %id, action = %action, credits = action.credits(), "Reward issued");
        }
        result
    }

    pub fn platform_wallet(&self) -> PlatformWallet {
        self.store.read(|state| state.wallet())
    }

    pub fn supply_audit(&self) -> SupplyAudit {
        self.store.read(|state| {
            let supply = state.supply();
            SupplyAudit {
                circulating: state.circulating_supply(),
                expected: supply.expected_supply(),
                supply,
                wallet: state.wallet(),
            }
        })
    }
}

/// Run one store update that may settle decay.
///
/// The decayed-credits counter moves only when the update commits.
pub(crate) fn transact_settling<S, T, F>(store: &S, f: F) -> LedgerResult<T>
where
    S: LedgerStore,
    F: FnOnce(&mut LedgerTxn<'_>) -> LedgerResult<T>,
{
    let mut decayed = 0;
    let result = store.transact(|txn| {
        let before = txn.supply().decayed;
        let value = f(txn)?;
        decayed = txn.supply().decayed - before;
        Ok(value)
    });

    if result.is_ok() && decayed > 0 {
        metrics::CREDITS_DECAYED_TOTAL.inc_by(decayed);
    }
    result
}

/// Read an account for a decision, committing any decay that has come due.
///
/// Decay settlement is not activity: the decay clock keeps running and the
/// applied months are checkpointed so they are never charged twice.
pub(crate) fn settle_account(
    txn: &mut LedgerTxn<'_>,
    id: &AccountId,
    now: DateTime<Utc>,
) -> LedgerResult<Account> {
    let account = txn.account(id)?;
    let outcome = DecayPolicy.evaluate(
        account.available,
        account.last_activity,
        now,
        account.decay_months_applied,
    );

    if outcome.decay_months <= account.decay_months_applied {
        return Ok(account);
    }

    let lost = account.available - outcome.balance;
    let mut settled = txn.apply_delta(id, BalanceDelta::debit(lost))?;
    settled.decay_months_applied = outcome.decay_months;
    txn.put_account(settled.clone())?;

    if lost > 0 {
        let mut supply = txn.supply();
        supply.decayed += lost;
        txn.put_supply(supply);
        debug!(
            account = %id,
            months_inactive = outcome.months_inactive,
            decay_months = outcome.decay_months,
            lost,
            "Committed balance decay"
        );
    }

    Ok(settled)
}

/// Credit a reward. The only path that grows total supply.
pub(crate) fn mint(
    txn: &mut LedgerTxn<'_>,
    id: &AccountId,
    action: RewardAction,
    now: DateTime<Utc>,
) -> LedgerResult<Account> {
    let credits = action.credits();
    txn.apply_delta(id, BalanceDelta::credit(credits))?;

    let mut supply = txn.supply();
    supply.minted += credits;
    txn.put_supply(supply);

    record_activity(txn, id, now, 0)
}

/// Mark a balance-changing operation on `id` and optionally raise trust
pub(crate) fn record_activity(
    txn: &mut LedgerTxn<'_>,
    id: &AccountId,
    now: DateTime<Utc>,
    trust_points: u8,
) -> LedgerResult<Account> {
    let mut account = txn.account(id)?;
    account.touch(now);
    account.raise_trust(trust_points);
    txn.put_account(account.clone())?;
    Ok(account)
}
