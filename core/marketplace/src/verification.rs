// agricredit/core/marketplace/src/verification.rs

//! Peer verification gate.
//!
//! A listing becomes verified once two distinct accounts other than its owner
//! have endorsed it. Verification is monotonic and does not gate purchases.

use agricredit_primitives::{
    AccountId, DomainConflict, LedgerResult, Listing, ListingId, VERIFICATION_THRESHOLD,
};
use agricredit_storage::LedgerTxn;

/// Trust points granted to an owner when their listing becomes verified
pub const VERIFIED_OWNER_TRUST: u8 = 5;

#[derive(Debug, Clone)]
pub struct VerificationOutcome {
    pub listing: Listing,
    /// False when the verifier had already endorsed this listing
    pub recorded: bool,
    /// True only on the endorsement that crossed the threshold
    pub became_verified: bool,
}

pub(crate) fn record_verification(
    txn: &mut LedgerTxn<'_>,
    listing_id: &ListingId,
    verifier: &AccountId,
) -> LedgerResult<VerificationOutcome> {
    let mut listing = txn.listing(listing_id)?;

    if &listing.owner == verifier {
        return Err(DomainConflict::SelfVerification.into());
    }
    txn.account(verifier)?;

    if !listing.verifiers.insert(verifier.clone()) {
        return Ok(VerificationOutcome {
            listing,
            recorded: false,
            became_verified: false,
        });
    }

    let was_verified = listing.verified;
    listing.verified = was_verified || listing.verification_count() >= VERIFICATION_THRESHOLD;
    let became_verified = listing.verified && !was_verified;

    if became_verified {
        let mut owner = txn.account(&listing.owner)?;
        owner.raise_trust(VERIFIED_OWNER_TRUST);
        txn.put_account(owner)?;
    }

    txn.put_listing(listing.clone());
    Ok(VerificationOutcome {
        listing,
        recorded: true,
        became_verified,
    })
}
