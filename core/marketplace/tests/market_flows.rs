// End-to-end marketplace flows over the in-memory store

mod common;

use agricredit_economics::RewardAction;
use agricredit_marketplace::{EscrowConfig, MarketConfig};
use agricredit_primitives::{
    CancelReason, Clock, DomainConflict, LedgerError, ListingId, ListingStatus, NotFoundError,
    TradeId, TradeStatus, ValidationError,
};
use chrono::Duration;
use common::{id, market, market_with};

#[test_log::test]
fn test_buy_deliver_release_scenario() {
    let (market, _) = market(&[("seller", 0), ("buyer", 60_000)]);
    let seller = id("seller");
    let buyer = id("buyer");

    let listing = market.create_listing(&seller, "wheat", 50, 1_100).unwrap();
    assert_eq!(listing.total, 55_000);

    let trade = market.buy_listing(&buyer, &listing.id).unwrap();
    let balance = market.get_balance(&buyer).unwrap();
    assert_eq!(balance.available, 5_000);
    assert_eq!(balance.locked, 55_000);
    assert_eq!(
        market.get_listing(&listing.id).unwrap().status,
        ListingStatus::InEscrow
    );

    let completed = market.confirm_delivery(&trade.id, &seller).unwrap();
    assert_eq!(completed.status, TradeStatus::Completed);
    assert_eq!(completed.fee, 550);

    assert_eq!(market.get_balance(&seller).unwrap().available, 54_450);
    let balance = market.get_balance(&buyer).unwrap();
    assert_eq!(balance.available, 5_000);
    assert_eq!(balance.locked, 0);
    assert_eq!(
        market.get_listing(&listing.id).unwrap().status,
        ListingStatus::Closed
    );
    assert_eq!(market.platform_wallet().collected_fees, 550);
    assert!(market.supply_audit().is_balanced());
}

#[test_log::test]
fn test_self_trade_is_rejected_without_mutation() {
    let (market, _) = market(&[("seller", 100_000)]);
    let seller = id("seller");
    let listing = market.create_listing(&seller, "paddy", 10, 100).unwrap();

    let err = market.buy_listing(&seller, &listing.id).unwrap_err();
    assert_eq!(err.conflict(), Some(&DomainConflict::SelfTradeForbidden));
    assert!(!err.is_retryable());

    assert_eq!(market.get_listing(&listing.id).unwrap(), listing);
    let balance = market.get_balance(&seller).unwrap();
    assert_eq!(balance.available, 100_000);
    assert_eq!(balance.locked, 0);
    assert!(market.get_transaction_history(&seller).is_empty());
}

#[test]
fn test_unknown_ids_are_not_found() {
    let (market, _) = market(&[("buyer", 10)]);
    let missing_trade = TradeId::new();
    let missing_listing = ListingId::new();

    let err = market.get_trade(&missing_trade).unwrap_err();
    assert_eq!(err, LedgerError::NotFound(NotFoundError::Trade(missing_trade)));
    assert!(err.is_retryable());

    assert!(matches!(
        market.buy_listing(&id("buyer"), &missing_listing),
        Err(LedgerError::NotFound(NotFoundError::Listing(_)))
    ));
    assert!(matches!(
        market.confirm_delivery(&missing_trade, &id("buyer")),
        Err(LedgerError::NotFound(NotFoundError::Trade(_)))
    ));
    assert!(matches!(
        market.get_balance(&id("nobody")),
        Err(LedgerError::NotFound(NotFoundError::Account(_)))
    ));
}

#[test]
fn test_invalid_listing_is_rejected_before_state_change() {
    let (market, _) = market(&[("seller", 0)]);
    assert_eq!(
        market
            .create_listing(&id("seller"), "wheat", 0, 1_100)
            .unwrap_err(),
        LedgerError::Validation(ValidationError::ZeroQuantity)
    );
    assert!(market.open_listings().is_empty());
}

#[test_log::test]
fn test_cancellation_refunds_and_reopens() {
    let (market, clock) = market(&[("seller", 0), ("buyer", 60_000), ("late", 55_000)]);
    let listing = market
        .create_listing(&id("seller"), "wheat", 50, 1_100)
        .unwrap();
    let trade = market.buy_listing(&id("buyer"), &listing.id).unwrap();

    clock.advance(Duration::hours(72));
    let cancelled = market
        .cancel_trade(&trade.id, &id("buyer"), CancelReason::DisputeTimeout)
        .unwrap();
    assert_eq!(cancelled.status, TradeStatus::Cancelled);
    assert_eq!(cancelled.cancelled_at, Some(clock.now()));

    let balance = market.get_balance(&id("buyer")).unwrap();
    assert_eq!(balance.available, 60_000);
    assert_eq!(balance.locked, 0);
    assert_eq!(market.open_listings().len(), 1);

    // terminal: neither release nor a second cancel is possible
    assert!(matches!(
        market.confirm_delivery(&trade.id, &id("seller")).unwrap_err().conflict(),
        Some(DomainConflict::NotInEscrow {
            status: TradeStatus::Cancelled,
            ..
        })
    ));
    assert!(market
        .cancel_trade(&trade.id, &id("seller"), CancelReason::MutualAgreement)
        .is_err());

    // the reopened listing can be bought by someone else
    let retry = market.buy_listing(&id("late"), &listing.id).unwrap();
    assert_eq!(retry.status, TradeStatus::Escrow);
    assert_eq!(market.platform_wallet().collected_fees, 0);
    assert!(market.supply_audit().is_balanced());
}

#[test]
fn test_verification_gate_end_to_end() {
    let (market, _) = market(&[("farmer", 0), ("a", 0), ("b", 0), ("c", 0)]);
    let listing = market
        .create_listing(&id("farmer"), "mustard", 20, 300)
        .unwrap();

    assert_eq!(
        market
            .verify_listing(&listing.id, &id("farmer"))
            .unwrap_err()
            .conflict(),
        Some(&DomainConflict::SelfVerification)
    );

    market.verify_listing(&listing.id, &id("a")).unwrap();
    market.verify_listing(&listing.id, &id("a")).unwrap();
    let verified = market.verify_listing(&listing.id, &id("b")).unwrap();
    assert!(verified.verified);
    assert_eq!(verified.verification_count(), 2);

    let more = market.verify_listing(&listing.id, &id("c")).unwrap();
    assert!(more.verified);
    assert_eq!(more.verification_count(), 3);
}

#[test]
fn test_history_and_trust() {
    let (market, _) = market(&[("seller", 0), ("buyer", 10_000)]);
    let first = market.create_listing(&id("seller"), "gram", 1, 1_000).unwrap();
    let second = market.create_listing(&id("seller"), "gram", 2, 1_000).unwrap();

    let t1 = market.buy_listing(&id("buyer"), &first.id).unwrap();
    market.confirm_delivery(&t1.id, &id("buyer")).unwrap();
    let t2 = market.buy_listing(&id("buyer"), &second.id).unwrap();

    let history = market.get_transaction_history(&id("buyer"));
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].id, t2.id);
    assert_eq!(history[0].status, TradeStatus::Escrow);
    assert_eq!(history[1].id, t1.id);
    assert_eq!(history[1].status, TradeStatus::Completed);

    let seller = market.ledger().account(&id("seller")).unwrap();
    let buyer = market.ledger().account(&id("buyer")).unwrap();
    assert_eq!(seller.trust_score, 52);
    assert_eq!(buyer.trust_score, 51);
}

#[test_log::test]
fn test_auto_rewards_only_for_first_sale_in_window() {
    let config = MarketConfig {
        escrow: EscrowConfig {
            auto_rewards: true,
            ..EscrowConfig::default()
        },
        ..MarketConfig::default()
    };
    let (market, clock) = market_with(&[("seller", 0), ("buyer", 10_000)], config);
    let seller_reward = RewardAction::TradeCompletedSeller.credits();
    let monthly = RewardAction::FirstTradeOfMonth.credits();

    let sell = |units: u64| {
        let listing = market.create_listing(&id("seller"), "jowar", units, 100).unwrap();
        let trade = market.buy_listing(&id("buyer"), &listing.id).unwrap();
        market.confirm_delivery(&trade.id, &id("buyer")).unwrap()
    };

    sell(10);
    let after_first = market.get_balance(&id("seller")).unwrap().available;
    assert_eq!(after_first, 990 + seller_reward + monthly);

    clock.advance(Duration::days(3));
    sell(10);
    let after_second = market.get_balance(&id("seller")).unwrap().available;
    assert_eq!(after_second, after_first + 990 + seller_reward);

    clock.advance(Duration::days(31));
    sell(10);
    let after_third = market.get_balance(&id("seller")).unwrap().available;
    assert_eq!(after_third, after_second + 990 + seller_reward + monthly);

    let audit = market.supply_audit();
    assert_eq!(audit.supply.minted, 3 * seller_reward + 2 * monthly);
    assert!(audit.is_balanced());
}

#[test_log::test]
fn test_decay_settles_before_escrow_decisions() {
    let (market, clock) = market(&[("seller", 10_000), ("buyer", 10_000), ("mill", 100_000)]);
    let listing = market.create_listing(&id("seller"), "wheat", 10, 1_000).unwrap();

    clock.advance(Duration::days(30 * 13));

    // 10_000 decays to 9_604, which no longer covers the listing
    let err = market.buy_listing(&id("buyer"), &listing.id).unwrap_err();
    assert_eq!(
        err.conflict(),
        Some(&DomainConflict::InsufficientCredits {
            account: id("buyer"),
            required: 10_000,
            available: 9_604,
        })
    );
    assert_eq!(market.supply_audit().supply.decayed, 0);
    assert_eq!(
        market.get_listing(&listing.id).unwrap().status,
        ListingStatus::Open
    );

    let trade = market.buy_listing(&id("mill"), &listing.id).unwrap();
    let mill = market.get_balance(&id("mill")).unwrap();
    assert_eq!(mill.available, 96_040 - 10_000);
    assert_eq!(mill.locked, 10_000);

    // the inactive seller is settled before the payout lands
    market.confirm_delivery(&trade.id, &id("mill")).unwrap();
    let seller = market.get_balance(&id("seller")).unwrap();
    assert_eq!(seller.available, 9_604 + 9_900);
    assert_eq!(seller.locked, 0);

    assert_eq!(market.get_balance(&id("buyer")).unwrap().available, 9_604);
    let audit = market.supply_audit();
    assert_eq!(audit.supply.decayed, 3_960 + 396 + 396);
    assert!(audit.is_balanced());
}

#[test]
fn test_manual_reward_issuance() {
    let (market, _) = market(&[]);
    market.open_account(id("newcomer")).unwrap();
    let balance = market
        .issue_reward(&id("newcomer"), RewardAction::ListingCreated)
        .unwrap();
    assert_eq!(balance.available, 10);
    assert_eq!(market.supply_audit().expected, 10);
}

#[test]
fn test_valuation_through_market() {
    let (market, _) = market(&[]);
    assert_eq!(market.valuate("wheat", 100), 100);
    let quote = market.quote("unobtainium", 100);
    assert!(quote.used_fallback);
    assert_eq!(quote.credits, 100);
}

