// agricredit/core/primitives/src/error.rs

use crate::types::{AccountId, Credits, ListingId, ListingStatus, TradeId, TradeStatus};
use chrono::{DateTime, Utc};

/// Bad input shape or range. Rejected before any state change.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Quantity must be at least 1")]
    ZeroQuantity,

    #[error("Unit price must be at least 1 credit")]
    ZeroUnitPrice,

    #[error("Commodity must not be empty")]
    EmptyCommodity,

    #[error("Listing total overflows: {quantity} x {unit_price}")]
    TotalOverflow { quantity: u64, unit_price: Credits },

    #[error("Invalid account id '{id}': {reason}")]
    InvalidAccountId { id: String, reason: &'static str },

    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Invalid cancel reason: {0}")]
    InvalidCancelReason(String),

    #[error("Balance overflow on account {0}")]
    BalanceOverflow(AccountId),
}

/// Precondition failure inside an atomic update. Nothing was applied.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainConflict {
    #[error("Listing {listing} is not available (status: {status})")]
    ListingUnavailable {
        listing: ListingId,
        status: ListingStatus,
    },

    #[error("Sellers cannot buy their own listing")]
    SelfTradeForbidden,

    #[error("Owners cannot verify their own listing")]
    SelfVerification,

    #[error("Trade {trade} is not in escrow (status: {status})")]
    NotInEscrow { trade: TradeId, status: TradeStatus },

    #[error("Insufficient credits on {account}: need {required}, have {available}")]
    InsufficientCredits {
        account: AccountId,
        required: Credits,
        available: Credits,
    },

    #[error("Insufficient locked credits on {account}: need {required}, have {locked}")]
    InsufficientLocked {
        account: AccountId,
        required: Credits,
        locked: Credits,
    },

    #[error("Account {account} is not a party to trade {trade}")]
    NotTradeParty { trade: TradeId, account: AccountId },

    #[error("Account {0} is not a configured arbiter")]
    NotArbiter(AccountId),

    #[error("Dispute window for trade {trade} is open until {opens_at}")]
    DisputeWindowOpen {
        trade: TradeId,
        opens_at: DateTime<Utc>,
    },

    #[error("Account {0} already exists")]
    AccountExists(AccountId),

    #[error("Listing {listing} cannot move from {from} to {to}")]
    InvalidTransition {
        listing: ListingId,
        from: ListingStatus,
        to: ListingStatus,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotFoundError {
    #[error("Account not found: {0}")]
    Account(AccountId),

    #[error("Listing not found: {0}")]
    Listing(ListingId),

    #[error("Trade not found: {0}")]
    Trade(TradeId),
}

/// Every failure the ledger core can return
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Conflict(#[from] DomainConflict),

    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl LedgerError {
    /// Callers may resubmit unchanged only for lookups and backend failures.
    /// Conflicts must re-read current state first.
    pub fn is_retryable(&self) -> bool {
        matches!(self, LedgerError::NotFound(_) | LedgerError::Storage(_))
    }

    pub fn conflict(&self) -> Option<&DomainConflict> {
        match self {
            LedgerError::Conflict(conflict) => Some(conflict),
            _ => None,
        }
    }
}

pub type LedgerResult<T> = Result<T, LedgerError>;
