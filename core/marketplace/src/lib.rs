// agricredit/core/marketplace/src/lib.rs

//! AgriCredit marketplace
//!
//! Ties the credit ledger, listing registry, verification gate and escrow
//! engine together over a shared [`LedgerStore`]. Each public operation is a
//! single atomic store update.

use std::sync::Arc;

pub mod config;
pub mod escrow;
pub mod ledger;
pub mod metrics;
pub mod registry;
pub mod verification;

pub use config::{ConfigError, EscrowConfig, MarketConfig};
pub use escrow::EscrowEngine;
pub use ledger::{Ledger, SupplyAudit};
pub use registry::ListingRegistry;
pub use verification::VERIFIED_OWNER_TRUST;

use agricredit_economics::{FeePolicy, RewardAction, Valuation, Valuator};
use agricredit_primitives::{
    Account, AccountId, Balance, CancelReason, Clock, Credits, LedgerResult, Listing, ListingId,
    PlatformWallet, Trade, TradeId,
};
use agricredit_storage::LedgerStore;

/// Complete marketplace over one store
pub struct AgriMarket<S> {
    valuator: Valuator,
    ledger: Ledger<S>,
    registry: ListingRegistry<S>,
    escrow: EscrowEngine<S>,
}

impl<S: LedgerStore> AgriMarket<S> {
    pub fn new(
        store: Arc<S>,
        config: MarketConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let valuator = Valuator::new(config.economics.valuation.clone())?;
        let fees = FeePolicy::new(config.economics.fee_bps)?;

        Ok(Self {
            valuator,
            ledger: Ledger::new(Arc::clone(&store), Arc::clone(&clock)),
            registry: ListingRegistry::new(Arc::clone(&store), Arc::clone(&clock)),
            escrow: EscrowEngine::new(store, clock, fees, config.escrow),
        })
    }

    pub fn ledger(&self) -> &Ledger<S> {
        &self.ledger
    }

    pub fn registry(&self) -> &ListingRegistry<S> {
        &self.registry
    }

    pub fn escrow(&self) -> &EscrowEngine<S> {
        &self.escrow
    }

    pub fn valuator(&self) -> &Valuator {
        &self.valuator
    }

    /// Credits for `quantity` units of `commodity` at the MSP peg
    pub fn valuate(&self, commodity: &str, quantity: u64) -> Credits {
        self.valuator.valuate(commodity, quantity)
    }

    pub fn quote(&self, commodity: &str, quantity: u64) -> Valuation {
        self.valuator.quote(commodity, quantity)
    }

    pub fn open_account(&self, id: AccountId) -> LedgerResult<Account> {
        self.ledger.open_account(id)
    }

    pub fn get_balance(&self, id: &AccountId) -> LedgerResult<Balance> {
        self.ledger.get_balance(id)
    }

    pub fn issue_reward(&self, id: &AccountId, action: RewardAction) -> LedgerResult<Balance> {
        self.ledger.issue_reward(id, action)
    }

    pub fn create_listing(
        &self,
        owner: &AccountId,
        commodity: &str,
        quantity: u64,
        unit_price: Credits,
    ) -> LedgerResult<Listing> {
        self.registry.create_listing(owner, commodity, quantity, unit_price)
    }

    pub fn verify_listing(
        &self,
        listing_id: &ListingId,
        verifier: &AccountId,
    ) -> LedgerResult<Listing> {
        self.registry.verify(listing_id, verifier)
    }

    pub fn get_listing(&self, listing_id: &ListingId) -> LedgerResult<Listing> {
        self.registry.get_listing(listing_id)
    }

    pub fn open_listings(&self) -> Vec<Listing> {
        self.registry.open_listings()
    }

    pub fn buy_listing(&self, buyer: &AccountId, listing_id: &ListingId) -> LedgerResult<Trade> {
        self.escrow.buy(buyer, listing_id)
    }

    pub fn confirm_delivery(
        &self,
        trade_id: &TradeId,
        confirmer: &AccountId,
    ) -> LedgerResult<Trade> {
        self.escrow.confirm_delivery(trade_id, confirmer)
    }

    pub fn cancel_trade(
        &self,
        trade_id: &TradeId,
        requester: &AccountId,
        reason: CancelReason,
    ) -> LedgerResult<Trade> {
        self.escrow.cancel(trade_id, requester, reason)
    }

    pub fn get_trade(&self, trade_id: &TradeId) -> LedgerResult<Trade> {
        self.escrow.trade(trade_id)
    }

    /// Trades where `account` is buyer or seller, most recent first
    pub fn get_transaction_history(&self, account: &AccountId) -> Vec<Trade> {
        self.escrow.history(account)
    }

    pub fn platform_wallet(&self) -> PlatformWallet {
        self.ledger.platform_wallet()
    }

    pub fn supply_audit(&self) -> SupplyAudit {
        self.ledger.supply_audit()
    }
}
