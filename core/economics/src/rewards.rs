// agricredit/core/economics/src/rewards.rs

use agricredit_primitives::{Credits, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Platform actions that mint credits.
///
/// Rewards are the only path that creates credits; trades only move them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RewardAction {
    ListingCreated,
    TradeCompletedSeller,
    /// First completed sale in a rolling 30-day window
    FirstTradeOfMonth,
    PeerVerification,
    QualityGradeBonus,
    Referral,
}

impl RewardAction {
    pub const fn credits(&self) -> Credits {
        match self {
            RewardAction::ListingCreated => 10,
            RewardAction::TradeCompletedSeller => 50,
            RewardAction::FirstTradeOfMonth => 100,
            RewardAction::PeerVerification => 5,
            RewardAction::QualityGradeBonus => 25,
            RewardAction::Referral => 200,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RewardAction::ListingCreated => "listing_created",
            RewardAction::TradeCompletedSeller => "trade_completed",
            RewardAction::FirstTradeOfMonth => "first_trade_of_month",
            RewardAction::PeerVerification => "peer_verification",
            RewardAction::QualityGradeBonus => "quality_grade",
            RewardAction::Referral => "referral",
        }
    }

    pub fn all() -> &'static [RewardAction] {
        &[
            RewardAction::ListingCreated,
            RewardAction::TradeCompletedSeller,
            RewardAction::FirstTradeOfMonth,
            RewardAction::PeerVerification,
            RewardAction::QualityGradeBonus,
            RewardAction::Referral,
        ]
    }
}

impl fmt::Display for RewardAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RewardAction {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace('-', "_");
        RewardAction::all()
            .iter()
            .copied()
            .find(|action| action.as_str() == key)
            .ok_or_else(|| ValidationError::InvalidIdentifier(s.to_string()))
    }
}
