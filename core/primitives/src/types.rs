// agricredit/core/primitives/src/types.rs

use crate::error::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Ledger-internal unit of value (AgriCredit).
pub type Credits = u64;

/// Distinct verifiers needed before a listing is shown as verified
pub const VERIFICATION_THRESHOLD: usize = 2;

/// Upper bound for an account's trust score
pub const MAX_TRUST_SCORE: u8 = 100;

/// Trust score assigned to freshly opened accounts
pub const INITIAL_TRUST_SCORE: u8 = 50;

const MAX_ACCOUNT_ID_LEN: usize = 64;

/// User account identifier.
///
/// Accepts ASCII letters, digits and `_ - . @`, up to 64 characters.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId(String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ValidationError::InvalidAccountId {
                id,
                reason: "must not be empty",
            });
        }
        if id.len() > MAX_ACCOUNT_ID_LEN {
            return Err(ValidationError::InvalidAccountId {
                id,
                reason: "longer than 64 characters",
            });
        }
        if !id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '@'))
        {
            return Err(ValidationError::InvalidAccountId {
                id,
                reason: "contains unsupported characters",
            });
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for AccountId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for AccountId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AccountId> for String {
    fn from(id: AccountId) -> Self {
        id.0
    }
}

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn as_bytes(&self) -> &[u8; 16] {
                self.0.as_bytes()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s.trim())
                    .map(Self)
                    .map_err(|_| ValidationError::InvalidIdentifier(s.to_string()))
            }
        }
    };
}

uuid_id!(
    /// Listing identifier
    ListingId
);
uuid_id!(
    /// Escrow trade identifier
    TradeId
);

/// Balance and activity record for one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Account {
    pub id: AccountId,
    /// Credits spendable now
    pub available: Credits,
    /// Credits held in open escrow
    pub locked: Credits,
    pub last_activity: DateTime<Utc>,
    /// Informational, 0-100
    pub trust_score: u8,
    /// Decay months already committed since `last_activity`
    pub decay_months_applied: u32,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn new(id: AccountId, now: DateTime<Utc>) -> Self {
        Self {
            id,
            available: 0,
            locked: 0,
            last_activity: now,
            trust_score: INITIAL_TRUST_SCORE,
            decay_months_applied: 0,
            created_at: now,
        }
    }

    pub fn balance(&self) -> Balance {
        Balance {
            available: self.available,
            locked: self.locked,
        }
    }

    /// Record a balance-changing operation. Restarts the decay clock.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_activity = now;
        self.decay_months_applied = 0;
    }

    pub fn raise_trust(&mut self, points: u8) {
        self.trust_score = self.trust_score.saturating_add(points).min(MAX_TRUST_SCORE);
    }
}

/// Balance view returned to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub available: Credits,
    pub locked: Credits,
}

impl Balance {
    pub fn total(&self) -> Credits {
        self.available.saturating_add(self.locked)
    }
}

/// Signed adjustment to an account's balances, applied atomically
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BalanceDelta {
    pub available: i128,
    pub locked: i128,
}

impl BalanceDelta {
    /// Move `amount` from available into locked
    pub fn lock(amount: Credits) -> Self {
        Self {
            available: -(amount as i128),
            locked: amount as i128,
        }
    }

    /// Return `amount` from locked to available
    pub fn unlock(amount: Credits) -> Self {
        Self {
            available: amount as i128,
            locked: -(amount as i128),
        }
    }

    /// Extinguish `amount` of locked funds
    pub fn release_locked(amount: Credits) -> Self {
        Self {
            available: 0,
            locked: -(amount as i128),
        }
    }

    pub fn credit(amount: Credits) -> Self {
        Self {
            available: amount as i128,
            locked: 0,
        }
    }

    pub fn debit(amount: Credits) -> Self {
        Self {
            available: -(amount as i128),
            locked: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListingStatus {
    Open,
    InEscrow,
    Closed,
}

impl ListingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingStatus::Open => "open",
            ListingStatus::InEscrow => "in_escrow",
            ListingStatus::Closed => "closed",
        }
    }
}

impl fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A sellable commodity offer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub id: ListingId,
    pub owner: AccountId,
    /// Normalized (trimmed, lowercase) commodity key
    pub commodity: String,
    /// Base units, e.g. kilograms
    pub quantity: u64,
    pub unit_price: Credits,
    /// quantity x unit_price, fixed at creation
    pub total: Credits,
    pub status: ListingStatus,
    pub verifiers: BTreeSet<AccountId>,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
}

impl Listing {
    pub fn verification_count(&self) -> usize {
        self.verifiers.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradeStatus {
    Escrow,
    Completed,
    Cancelled,
}

impl TradeStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TradeStatus::Escrow)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TradeStatus::Escrow => "escrow",
            TradeStatus::Completed => "completed",
            TradeStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for TradeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What moved a trade from Escrow to Cancelled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CancelReason {
    /// Both parties agreed to unwind
    MutualAgreement,
    /// A configured arbiter ruled for the buyer
    ArbiterDecision,
    /// The dispute window elapsed without delivery
    DisputeTimeout,
}

impl CancelReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            CancelReason::MutualAgreement => "mutual",
            CancelReason::ArbiterDecision => "arbiter",
            CancelReason::DisputeTimeout => "timeout",
        }
    }
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CancelReason {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mutual" | "mutual_agreement" => Ok(CancelReason::MutualAgreement),
            "arbiter" | "arbiter_decision" => Ok(CancelReason::ArbiterDecision),
            "timeout" | "dispute_timeout" => Ok(CancelReason::DisputeTimeout),
            _ => Err(ValidationError::InvalidCancelReason(s.to_string())),
        }
    }
}

/// Escrow record linking a buyer, a seller and one listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    pub id: TradeId,
    /// Store-assigned, strictly increasing
    pub sequence: u64,
    pub listing_id: ListingId,
    pub buyer: AccountId,
    pub seller: AccountId,
    pub locked_amount: Credits,
    /// Zero until release
    pub fee: Credits,
    pub status: TradeStatus,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub cancel_reason: Option<CancelReason>,
}

impl Trade {
    pub fn is_party(&self, account: &AccountId) -> bool {
        &self.buyer == account || &self.seller == account
    }
}

/// Running total of collected trade fees
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformWallet {
    pub collected_fees: Credits,
    pub fee_events: u64,
}

/// Supply bookkeeping for the conservation audit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplyStats {
    /// Initial allocation written when the store was created
    pub genesis: Credits,
    /// Sum of reward issuances
    pub minted: Credits,
    /// Sum of committed decay
    pub decayed: Credits,
}

impl SupplyStats {
    /// Credits that should exist across balances and the platform wallet
    pub fn expected_supply(&self) -> u128 {
        self.genesis as u128 + self.minted as u128 - self.decayed as u128
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_id_validation() {
        assert!(AccountId::new("farmer_01").is_ok());
        assert!(AccountId::new("ravi@kisan.coop").is_ok());
        assert!(AccountId::new("").is_err());
        assert!(AccountId::new("has space").is_err());
        assert!(AccountId::new("x".repeat(65)).is_err());
    }

    #[test]
    fn test_account_rejects_unknown_fields() {
        let now = Utc::now();
        let account = Account::new(AccountId::new("alice").unwrap(), now);
        let mut value = serde_json::to_value(&account).unwrap();
        value
            .as_object_mut()
            .unwrap()
            .insert("nickname".to_string(), serde_json::json!("al"));

        let merged: Result<Account, _> = serde_json::from_value(value);
        assert!(merged.is_err());
    }

    #[test]
    fn test_account_id_deserialize_validates() {
        let parsed: Result<AccountId, _> = serde_json::from_str("\"bad id\"");
        assert!(parsed.is_err());
    }

    #[test]
    fn test_trust_score_is_capped() {
        let mut account = Account::new(AccountId::new("alice").unwrap(), Utc::now());
        account.raise_trust(40);
        account.raise_trust(40);
        assert_eq!(account.trust_score, MAX_TRUST_SCORE);
    }

    #[test]
    fn test_touch_resets_decay_checkpoint() {
        let start = Utc::now();
        let mut account = Account::new(AccountId::new("alice").unwrap(), start);
        account.decay_months_applied = 3;
        account.touch(start + chrono::Duration::days(1));
        assert_eq!(account.decay_months_applied, 0);
        assert_eq!(account.last_activity, start + chrono::Duration::days(1));
    }

    #[test]
    fn test_ids_parse_and_survive_bincode() {
        let id = TradeId::new();
        let parsed: TradeId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);

        let bytes = bincode::serialize(&id).unwrap();
        let decoded: TradeId = bincode::deserialize(&bytes).unwrap();
        assert_eq!(decoded, id);

        assert!("not-a-uuid".parse::<ListingId>().is_err());
    }

    #[test]
    fn test_cancel_reason_parsing() {
        assert_eq!("mutual".parse::<CancelReason>().unwrap(), CancelReason::MutualAgreement);
        assert_eq!("Timeout".parse::<CancelReason>().unwrap(), CancelReason::DisputeTimeout);
        assert!("refund".parse::<CancelReason>().is_err());
    }
}
