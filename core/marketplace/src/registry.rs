// agricredit/core/marketplace/src/registry.rs

use crate::metrics;
use crate::verification::{record_verification, VerificationOutcome};
use agricredit_economics::valuation::normalize_commodity;
use agricredit_primitives::{
    AccountId, Clock, Credits, DomainConflict, LedgerResult, Listing, ListingId, ListingStatus,
    NotFoundError, ValidationError,
};
use agricredit_storage::{LedgerStore, LedgerTxn};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{info, warn};

/// Sellable offers and their verification state
pub struct ListingRegistry<S> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<S: LedgerStore> ListingRegistry<S> {
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Create an Open listing. No credits are touched.
    pub fn create_listing(
        &self,
        owner: &AccountId,
        commodity: &str,
        quantity: u64,
        unit_price: Credits,
    ) -> LedgerResult<Listing> {
        let result = validate_listing(commodity, quantity, unit_price).and_then(|total| {
            let now = self.clock.now();
            self.store.transact(|txn| {
                txn.account(owner)?;

                let listing = Listing {
                    id: ListingId::new(),
                    owner: owner.clone(),
                    commodity: normalize_commodity(commodity),
                    quantity,
                    unit_price,
                    total,
                    status: ListingStatus::Open,
                    verifiers: BTreeSet::new(),
                    verified: false,
                    created_at: now,
                };
                txn.put_listing(listing.clone());
                Ok(listing)
            })
        });

        metrics::record_outcome("create_listing", &result);
        match &result {
            Ok(listing) => info!(
                listing = %listing.id,
                owner = %owner,
                commodity = %listing.commodity,
                quantity,
                unit_price,
                total = listing.total,
                "Listing created"
            ),
            Err(e) => warn!(owner = %owner, error = %e, "Listing rejected"),
        }
        result
    }

    /// Endorse a listing. Re-verification by the same account is a no-op.
    pub fn verify(&self, listing_id: &ListingId, verifier: &AccountId) -> LedgerResult<Listing> {
        let result = self
            .store
            .transact(|txn| record_verification(txn, listing_id, verifier));

        metrics::record_outcome("verify_listing", &result);
        match result {
            Ok(VerificationOutcome {
                listing,
                recorded,
                became_verified,
            }) => {
                if recorded {
                    info!(
                        listing = %listing_id,
                        verifier = %verifier,
                        count = listing.verification_count(),
                        verified = listing.verified,
                        became_verified,
                        "Listing verification recorded"
                    );
                }
                Ok(listing)
            }
            Err(e) => {
                warn!(
                    listing = %listing_id,
                    verifier = %verifier,
                    error = %e,
                    "Verification rejected"
                );
                Err(e)
            }
        }
    }

    pub fn get_listing(&self, listing_id: &ListingId) -> LedgerResult<Listing> {
        self.store.read(|state| {
            state
                .listing(listing_id)
                .cloned()
                .ok_or_else(|| NotFoundError::Listing(*listing_id).into())
        })
    }

    /// Open listings, newest first
    pub fn open_listings(&self) -> Vec<Listing> {
        self.store
            .read(|state| state.open_listings().into_iter().cloned().collect())
    }
}

/// Returns the listing total on success
fn validate_listing(commodity: &str, quantity: u64, unit_price: Credits) -> LedgerResult<Credits> {
    if normalize_commodity(commodity).is_empty() {
        return Err(ValidationError::EmptyCommodity.into());
    }
    if quantity == 0 {
        return Err(ValidationError::ZeroQuantity.into());
    }
    if unit_price == 0 {
        return Err(ValidationError::ZeroUnitPrice.into());
    }
    quantity.checked_mul(unit_price).ok_or_else(|| {
        ValidationError::TotalOverflow {
            quantity,
            unit_price,
        }
        .into()
    })
}

/// Open -> InEscrow. Escrow engine only.
pub(crate) fn mark_escrow(
    txn: &mut LedgerTxn<'_>,
    listing_id: &ListingId,
) -> LedgerResult<Listing> {
    transition(txn, listing_id, ListingStatus::Open, ListingStatus::InEscrow)
}

/// InEscrow -> Closed. Escrow engine only.
pub(crate) fn mark_closed(
    txn: &mut LedgerTxn<'_>,
    listing_id: &ListingId,
) -> LedgerResult<Listing> {
    transition(txn, listing_id, ListingStatus::InEscrow, ListingStatus::Closed)
}

/// InEscrow -> Open, when an escrow is cancelled. Escrow engine only.
pub(crate) fn mark_reopened(
    txn: &mut LedgerTxn<'_>,
    listing_id: &ListingId,
) -> LedgerResult<Listing> {
    transition(txn, listing_id, ListingStatus::InEscrow, ListingStatus::Open)
}

fn transition(
    txn: &mut LedgerTxn<'_>,
    listing_id: &ListingId,
    from: ListingStatus,
    to: ListingStatus,
) -> LedgerResult<Listing> {
    let mut listing = txn.listing(listing_id)?;
    if listing.status != from {
        return Err(DomainConflict::InvalidTransition {
            listing: *listing_id,
            from: listing.status,
            to,
        }
        .into());
    }
    listing.status = to;
    txn.put_listing(listing.clone());
    Ok(listing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verification::VERIFIED_OWNER_TRUST;
    use agricredit_primitives::{LedgerError, ManualClock, INITIAL_TRUST_SCORE, MAX_TRUST_SCORE};
    use agricredit_storage::{GenesisAllocation, MemoryLedgerStore};
    use chrono::Utc;

    fn id(name: &str) -> AccountId {
        AccountId::new(name).unwrap()
    }

    fn registry() -> (ListingRegistry<MemoryLedgerStore>, Arc<MemoryLedgerStore>) {
        let now = Utc::now();
        let genesis: Vec<GenesisAllocation> = ["owner", "a", "b", "c"]
            .iter()
            .map(|name| GenesisAllocation {
                account: id(name),
                credits: 0,
            })
            .collect();
        let store = Arc::new(MemoryLedgerStore::with_genesis(&genesis, now));
        let clock = Arc::new(ManualClock::new(now));
        (ListingRegistry::new(store.clone(), clock), store)
    }

    #[test]
    fn test_create_listing() {
        let (registry, _) = registry();
        let listing = registry
            .create_listing(&id("owner"), " Wheat ", 50, 1_100)
            .unwrap();

        assert_eq!(listing.commodity, "wheat");
        assert_eq!(listing.total, 55_000);
        assert_eq!(listing.status, ListingStatus::Open);
        assert_eq!(listing.verification_count(), 0);
        assert!(!listing.verified);
        assert_eq!(registry.get_listing(&listing.id).unwrap(), listing);
    }

    #[test]
    fn test_create_listing_validation() {
        let (registry, _) = registry();
        let owner = id("owner");

        assert_eq!(
            registry.create_listing(&owner, "wheat", 0, 10).unwrap_err(),
            LedgerError::Validation(ValidationError::ZeroQuantity)
        );
        assert_eq!(
            registry.create_listing(&owner, "wheat", 10, 0).unwrap_err(),
            LedgerError::Validation(ValidationError::ZeroUnitPrice)
        );
        assert_eq!(
            registry.create_listing(&owner, "  ", 10, 10).unwrap_err(),
            LedgerError::Validation(ValidationError::EmptyCommodity)
        );
        assert!(matches!(
            registry.create_listing(&owner, "wheat", u64::MAX, 2),
            Err(LedgerError::Validation(ValidationError::TotalOverflow { .. }))
        ));
        assert!(matches!(
            registry.create_listing(&id("ghost"), "wheat", 1, 1),
            Err(LedgerError::NotFound(_))
        ));
        assert!(registry.open_listings().is_empty());
    }

    #[test]
    fn test_verification_threshold_and_monotonicity() {
        let (registry, store) = registry();
        let listing = registry.create_listing(&id("owner"), "paddy", 10, 20).unwrap();

        let after_a = registry.verify(&listing.id, &id("a")).unwrap();
        assert_eq!(after_a.verification_count(), 1);
        assert!(!after_a.verified);

        // repeat by the same verifier is a no-op
        let repeat = registry.verify(&listing.id, &id("a")).unwrap();
        assert_eq!(repeat.verification_count(), 1);

        let after_b = registry.verify(&listing.id, &id("b")).unwrap();
        assert_eq!(after_b.verification_count(), 2);
        assert!(after_b.verified);

        let again_a = registry.verify(&listing.id, &id("a")).unwrap();
        assert_eq!(again_a.verification_count(), 2);
        assert!(again_a.verified);

        let after_c = registry.verify(&listing.id, &id("c")).unwrap();
        assert_eq!(after_c.verification_count(), 3);
        assert!(after_c.verified);

        // owner trust raised exactly once
        let owner_trust = store.read(|state| state.account(&id("owner")).unwrap().trust_score);
        assert_eq!(
            owner_trust,
            (INITIAL_TRUST_SCORE + VERIFIED_OWNER_TRUST).min(MAX_TRUST_SCORE)
        );
    }

    #[test]
    fn test_self_verification_is_rejected_without_mutation() {
        let (registry, _) = registry();
        let listing = registry.create_listing(&id("owner"), "maize", 5, 5).unwrap();

        let err = registry.verify(&listing.id, &id("owner")).unwrap_err();
        assert_eq!(err.conflict(), Some(&DomainConflict::SelfVerification));
        assert_eq!(registry.get_listing(&listing.id).unwrap(), listing);
    }

    #[test]
    fn test_verifier_must_exist() {
        let (registry, _) = registry();
        let listing = registry.create_listing(&id("owner"), "maize", 5, 5).unwrap();
        assert!(matches!(
            registry.verify(&listing.id, &id("ghost")),
            Err(LedgerError::NotFound(NotFoundError::Account(_)))
        ));
        assert!(matches!(
            registry.verify(&ListingId::new(), &id("a")),
            Err(LedgerError::NotFound(NotFoundError::Listing(_)))
        ));
    }

    #[test]
    fn test_transitions_enforce_sequence() {
        let (registry, store) = registry();
        let listing = registry.create_listing(&id("owner"), "gram", 1, 1).unwrap();

        let err = store
            .transact(|txn| mark_closed(txn, &listing.id))
            .unwrap_err();
        assert!(matches!(
            err.conflict(),
            Some(DomainConflict::InvalidTransition {
                from: ListingStatus::Open,
                to: ListingStatus::Closed,
                ..
            })
        ));

        store.transact(|txn| mark_escrow(txn, &listing.id)).unwrap();
        assert!(store.transact(|txn| mark_escrow(txn, &listing.id)).is_err());
        store.transact(|txn| mark_closed(txn, &listing.id)).unwrap();
        assert!(store.transact(|txn| mark_reopened(txn, &listing.id)).is_err());
        assert_eq!(
            registry.get_listing(&listing.id).unwrap().status,
            ListingStatus::Closed
        );
    }
}
