// agricredit/core/storage/src/state/txn.rs

use super::LedgerState;
use agricredit_primitives::{
    Account, AccountId, BalanceDelta, Credits, DomainConflict, LedgerResult, Listing, ListingId,
    NotFoundError, PlatformWallet, SupplyStats, Trade, TradeId, ValidationError,
};
use std::collections::BTreeMap;

/// Records staged by one transaction, committed together or not at all
#[derive(Debug, Clone, Default)]
pub struct WriteSet {
    pub accounts: BTreeMap<AccountId, Account>,
    pub listings: BTreeMap<ListingId, Listing>,
    pub trades: BTreeMap<TradeId, Trade>,
    pub wallet: Option<PlatformWallet>,
    pub supply: Option<SupplyStats>,
    pub next_sequence: Option<u64>,
}

impl WriteSet {
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
            && self.listings.is_empty()
            && self.trades.is_empty()
            && self.wallet.is_none()
            && self.supply.is_none()
            && self.next_sequence.is_none()
    }
}

/// Staged view over committed state.
///
/// Reads see this transaction's own writes first. Nothing reaches the
/// committed state unless the store commits the resulting [`WriteSet`].
pub struct LedgerTxn<'a> {
    base: &'a LedgerState,
    writes: WriteSet,
}

impl<'a> LedgerTxn<'a> {
    pub fn new(base: &'a LedgerState) -> Self {
        Self {
            base,
            writes: WriteSet::default(),
        }
    }

    pub fn into_write_set(self) -> WriteSet {
        self.writes
    }

    pub fn account(&self, id: &AccountId) -> LedgerResult<Account> {
        self.writes
            .accounts
            .get(id)
            .or_else(|| self.base.accounts.get(id))
            .cloned()
            .ok_or_else(|| NotFoundError::Account(id.clone()).into())
    }

    pub fn has_account(&self, id: &AccountId) -> bool {
        self.writes.accounts.contains_key(id) || self.base.accounts.contains_key(id)
    }

    pub fn insert_account(&mut self, account: Account) -> LedgerResult<()> {
        if self.has_account(&account.id) {
            return Err(DomainConflict::AccountExists(account.id).into());
        }
        self.writes.accounts.insert(account.id.clone(), account);
        Ok(())
    }

    /// Stage a full account record. Balances must come from `apply_delta`.
    pub fn put_account(&mut self, account: Account) -> LedgerResult<()> {
        if !self.has_account(&account.id) {
            return Err(NotFoundError::Account(account.id).into());
        }
        self.writes.accounts.insert(account.id.clone(), account);
        Ok(())
    }

    /// Adjust balances. Fails without staging anything if either side would go negative.
    pub fn apply_delta(&mut self, id: &AccountId, delta: BalanceDelta) -> LedgerResult<Account> {
        let mut account = self.account(id)?;

        let available = account.available as i128 + delta.available;
        if available < 0 {
            return Err(DomainConflict::InsufficientCredits {
                account: id.clone(),
                required: delta.available.unsigned_abs() as Credits,
                available: account.available,
            }
            .into());
        }

        let locked = account.locked as i128 + delta.locked;
        if locked < 0 {
            return Err(DomainConflict::InsufficientLocked {
                account: id.clone(),
                required: delta.locked.unsigned_abs() as Credits,
                locked: account.locked,
            }
            .into());
        }

        account.available = Credits::try_from(available)
            .map_err(|_| ValidationError::BalanceOverflow(id.clone()))?;
        account.locked =
            Credits::try_from(locked).map_err(|_| ValidationError::BalanceOverflow(id.clone()))?;

        self.writes.accounts.insert(id.clone(), account.clone());
        Ok(account)
    }

    pub fn listing(&self, id: &ListingId) -> LedgerResult<Listing> {
        self.writes
            .listings
            .get(id)
            .or_else(|| self.base.listings.get(id))
            .cloned()
            .ok_or_else(|| NotFoundError::Listing(*id).into())
    }

    pub fn put_listing(&mut self, listing: Listing) {
        self.writes.listings.insert(listing.id, listing);
    }

    pub fn trade(&self, id: &TradeId) -> LedgerResult<Trade> {
        self.writes
            .trades
            .get(id)
            .or_else(|| self.base.trades.get(id))
            .cloned()
            .ok_or_else(|| NotFoundError::Trade(*id).into())
    }

    pub fn put_trade(&mut self, trade: Trade) {
        self.writes.trades.insert(trade.id, trade);
    }

    /// Trades involving `account` as staged in this transaction, newest first
    pub fn trades_for(&self, account: &AccountId) -> Vec<Trade> {
        let mut trades: Vec<Trade> = self
            .base
            .trades
            .values()
            .filter(|trade| !self.writes.trades.contains_key(&trade.id))
            .chain(self.writes.trades.values())
            .filter(|trade| trade.is_party(account))
            .cloned()
            .collect();
        trades.sort_by(|a, b| b.sequence.cmp(&a.sequence));
        trades
    }

    /// Reserve the next trade sequence number
    pub fn next_sequence(&mut self) -> u64 {
        let current = self.writes.next_sequence.unwrap_or(self.base.next_sequence);
        self.writes.next_sequence = Some(current + 1);
        current
    }

    pub fn wallet(&self) -> PlatformWallet {
        self.writes.wallet.unwrap_or(self.base.wallet)
    }

    pub fn put_wallet(&mut self, wallet: PlatformWallet) {
        self.writes.wallet = Some(wallet);
    }

    pub fn supply(&self) -> SupplyStats {
        self.writes.supply.unwrap_or(self.base.supply)
    }

    pub fn put_supply(&mut self, supply: SupplyStats) {
        self.writes.supply = Some(supply);
    }
}
