// agricredit/core/marketplace/src/escrow.rs

//! Escrow/trade engine.
//!
//! A trade moves `Escrow -> Completed` on delivery confirmation or
//! `Escrow -> Cancelled` on the recovery path. Both are terminal. Every
//! transition re-checks its precondition inside the same atomic update that
//! performs it, so concurrent callers cannot double-escrow a listing or
//! double-release a trade.

use crate::config::EscrowConfig;
use crate::ledger::{mint, record_activity, settle_account, transact_settling};
use crate::metrics;
use crate::registry::{mark_closed, mark_escrow, mark_reopened};
use agricredit_economics::{FeePolicy, RewardAction};
use agricredit_primitives::{
    AccountId, BalanceDelta, CancelReason, Clock, DomainConflict, LedgerResult, ListingId,
    ListingStatus, NotFoundError, PlatformWallet, Trade, TradeId, TradeStatus,
};
use agricredit_storage::{LedgerStore, LedgerTxn};
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tracing::{info, warn};

/// Trust points granted when a trade completes
pub const SELLER_TRUST_ON_COMPLETION: u8 = 2;
pub const BUYER_TRUST_ON_COMPLETION: u8 = 1;

/// Window for the first-sale-of-the-month bonus
const REWARD_WINDOW_DAYS: i64 = 30;

pub struct EscrowEngine<S> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
    fees: FeePolicy,
    config: EscrowConfig,
}

impl<S: LedgerStore> EscrowEngine<S> {
    pub fn new(
        store: Arc<S>,
        clock: Arc<dyn Clock>,
        fees: FeePolicy,
        config: EscrowConfig,
    ) -> Self {
        Self {
            store,
            clock,
            fees,
            config,
        }
    }

    /// Buy a listing: lock its total from the buyer and open an escrow trade
    pub fn buy(&self, buyer: &AccountId, listing_id: &ListingId) -> LedgerResult<Trade> {
        let now = self.clock.now();
        let result = transact_settling(&*self.store, |txn| {
            let listing = txn.listing(listing_id)?;
            if listing.status != ListingStatus::Open {
                return Err(DomainConflict::ListingUnavailable {
                    listing: *listing_id,
                    status: listing.status,
                }
                .into());
            }
            if &listing.owner == buyer {
                return Err(DomainConflict::SelfTradeForbidden.into());
            }

            let cost = listing.total;
            settle_account(txn, buyer, now)?;
            txn.apply_delta(buyer, BalanceDelta::lock(cost))?;
            record_activity(txn, buyer, now, 0)?;
            mark_escrow(txn, listing_id)?;

            let trade = Trade {
                id: TradeId::new(),
                sequence: txn.next_sequence(),
                listing_id: *listing_id,
                buyer: buyer.clone(),
                seller: listing.owner.clone(),
                locked_amount: cost,
                fee: 0,
                status: TradeStatus::Escrow,
                created_at: now,
                completed_at: None,
                cancelled_at: None,
                cancel_reason: None,
            };
            txn.put_trade(trade.clone());
            Ok(trade)
        });

        metrics::record_outcome("buy_listing", &result);
        match &result {
            Ok(trade) => info!(
                trade = %trade.id,
                listing = %listing_id,
                buyer = %buyer,
                seller = %trade.seller,
                locked = trade.locked_amount,
                "Escrow opened"
            ),
            Err(e) => warn!(listing = %listing_id, buyer = %buyer, error = %e, "Purchase rejected"),
        }
        result
    }

    /// Release escrow to the seller, less the platform fee.
    ///
    /// Either party to the trade may confirm.
    pub fn confirm_delivery(
        &self,
        trade_id: &TradeId,
        confirmer: &AccountId,
    ) -> LedgerResult<Trade> {
        let now = self.clock.now();
        let mut minted = 0;
        let result = transact_settling(&*self.store, |txn| {
            let mut trade = open_trade(txn, trade_id)?;
            if !trade.is_party(confirmer) {
                return Err(DomainConflict::NotTradeParty {
                    trade: *trade_id,
                    account: confirmer.clone(),
                }
                .into());
            }

            let split = self.fees.calculate(trade.locked_amount);

            // available was debited at purchase; the locked funds are extinguished here
            settle_account(txn, &trade.buyer, now)?;
            txn.apply_delta(&trade.buyer, BalanceDelta::release_locked(trade.locked_amount))?;

            settle_account(txn, &trade.seller, now)?;
            txn.apply_delta(&trade.seller, BalanceDelta::credit(split.seller_receives))?;

            let wallet = txn.wallet();
            txn.put_wallet(PlatformWallet {
                collected_fees: wallet.collected_fees + split.fee,
                fee_events: wallet.fee_events + 1,
            });

            trade.status = TradeStatus::Completed;
            trade.fee = split.fee;
            trade.completed_at = Some(now);
            txn.put_trade(trade.clone());
            mark_closed(txn, &trade.listing_id)?;

            record_activity(txn, &trade.buyer, now, BUYER_TRUST_ON_COMPLETION)?;
            record_activity(txn, &trade.seller, now, SELLER_TRUST_ON_COMPLETION)?;

            if self.config.auto_rewards {
                minted = issue_sale_rewards(txn, &trade, now)?;
            }

            Ok(trade)
        });

        metrics::record_outcome("confirm_delivery", &result);
        match &result {
            Ok(trade) => {
                metrics::FEES_COLLECTED_TOTAL.inc_by(trade.fee);
                if minted > 0 {
                    metrics::CREDITS_MINTED_TOTAL.inc_by(minted);
                }
                info!(
                    trade = %trade.id,
                    confirmer = %confirmer,
                    seller = %trade.seller,
                    amount = trade.locked_amount,
                    fee = trade.fee,
                    fee_bps = self.fees.fee_bps(),
                    rewards = minted,
                    "Escrow released"
                );
            }
            Err(e) => warn!(
                trade = %trade_id,
                confirmer = %confirmer,
                error = %e,
                "Release rejected"
            ),
        }
        result
    }

    /// Unwind an escrow: refund the buyer and reopen the listing.
    ///
    /// `MutualAgreement` must come from the seller, `ArbiterDecision` from a
    /// configured arbiter, and `DisputeTimeout` from either party once the
    /// dispute window has elapsed.
    pub fn cancel(
        &self,
        trade_id: &TradeId,
        requester: &AccountId,
        reason: CancelReason,
    ) -> LedgerResult<Trade> {
        let now = self.clock.now();
        let timeout = self.config.dispute_timeout();
        let result = transact_settling(&*self.store, |txn| {
            let mut trade = open_trade(txn, trade_id)?;
            self.authorize_cancel(&trade, requester, reason, now, timeout)?;

            settle_account(txn, &trade.buyer, now)?;
            txn.apply_delta(&trade.buyer, BalanceDelta::unlock(trade.locked_amount))?;
            record_activity(txn, &trade.buyer, now, 0)?;
            mark_reopened(txn, &trade.listing_id)?;

            trade.status = TradeStatus::Cancelled;
            trade.cancelled_at = Some(now);
            trade.cancel_reason = Some(reason);
            txn.put_trade(trade.clone());
            Ok(trade)
        });

        metrics::record_outcome("cancel_trade", &result);
        match &result {
            Ok(trade) => info!(
                trade = %trade.id,
                requester = %requester,
                reason = %reason,
                refunded = trade.locked_amount,
                "Escrow cancelled"
            ),
            Err(e) => warn!(
                trade = %trade_id,
                requester = %requester,
                error = %e,
                "Cancellation rejected"
            ),
        }
        result
    }

    pub fn trade(&self, trade_id: &TradeId) -> LedgerResult<Trade> {
        self.store.read(|state| {
            state
                .trade(trade_id)
                .cloned()
                .ok_or_else(|| NotFoundError::Trade(*trade_id).into())
        })
    }

    /// Trades where `account` is buyer or seller, most recent first
    pub fn history(&self, account: &AccountId) -> Vec<Trade> {
        self.store
            .read(|state| state.trades_for(account).into_iter().cloned().collect())
    }

    fn authorize_cancel(
        &self,
        trade: &Trade,
        requester: &AccountId,
        reason: CancelReason,
        now: DateTime<Utc>,
        timeout: Duration,
    ) -> LedgerResult<()> {
        let not_party = || DomainConflict::NotTradeParty {
            trade: trade.id,
            account: requester.clone(),
        };

        match reason {
            CancelReason::MutualAgreement => {
                if requester != &trade.seller {
                    return Err(not_party().into());
                }
            }
            CancelReason::ArbiterDecision => {
                if !self.config.is_arbiter(requester) {
                    return Err(DomainConflict::NotArbiter(requester.clone()).into());
                }
            }
            CancelReason::DisputeTimeout => {
                if !trade.is_party(requester) {
                    return Err(not_party().into());
                }
                // a window that ends past the representable range never opens
                let opens_at = trade
                    .created_at
                    .checked_add_signed(timeout)
                    .unwrap_or(DateTime::<Utc>::MAX_UTC);
                if now < opens_at {
                    return Err(DomainConflict::DisputeWindowOpen {
                        trade: trade.id,
                        opens_at,
                    }
                    .into());
                }
            }
        }
        Ok(())
    }
}

fn open_trade(txn: &LedgerTxn<'_>, trade_id: &TradeId) -> LedgerResult<Trade> {
    let trade = txn.trade(trade_id)?;
    if trade.status.is_terminal() {
        return Err(DomainConflict::NotInEscrow {
            trade: *trade_id,
            status: trade.status,
        }
        .into());
    }
    Ok(trade)
}

/// Seller rewards for a completed sale. Returns the credits minted.
fn issue_sale_rewards(
    txn: &mut LedgerTxn<'_>,
    trade: &Trade,
    now: DateTime<Utc>,
) -> LedgerResult<u64> {
    let mut minted = RewardAction::TradeCompletedSeller.credits();
    mint(txn, &trade.seller, RewardAction::TradeCompletedSeller, now)?;

    let window_start = now - Duration::days(REWARD_WINDOW_DAYS);
    let sold_recently = txn.trades_for(&trade.seller).iter().any(|other| {
        other.id != trade.id
            && other.seller == trade.seller
            && other.status == TradeStatus::Completed
            && other.completed_at.is_some_and(|at| at >= window_start)
    });

    if !sold_recently {
        mint(txn, &trade.seller, RewardAction::FirstTradeOfMonth, now)?;
        minted += RewardAction::FirstTradeOfMonth.credits();
    }
    Ok(minted)
}
