// agricredit/core/economics/src/lib.rs

//! Pure credit policy: MSP valuation, trade fees, platform rewards and
//! inactivity decay. Nothing in this crate touches ledger state.

pub mod decay;
pub mod fees;
pub mod rewards;
pub mod valuation;

pub use decay::{apply_decay, decay_balance, DecayOutcome, DecayPolicy};
pub use fees::{calculate_fee, FeeBreakdown, FeePolicy, DEFAULT_FEE_BPS};
pub use rewards::RewardAction;
pub use valuation::{Valuation, ValuationConfig, Valuator};

use serde::{Deserialize, Serialize};

/// Economics configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EconomicsConfig {
    /// Trade fee in basis points (100 = 1%)
    #[serde(default = "default_fee_bps")]
    pub fee_bps: u32,

    #[serde(default)]
    pub valuation: ValuationConfig,
}

fn default_fee_bps() -> u32 {
    DEFAULT_FEE_BPS
}

impl Default for EconomicsConfig {
    fn default() -> Self {
        Self {
            fee_bps: DEFAULT_FEE_BPS,
            valuation: ValuationConfig::default(),
        }
    }
}

impl EconomicsConfig {
    pub fn validate(&self) -> Result<(), EconomicsError> {
        FeePolicy::new(self.fee_bps)?;
        self.valuation.validate()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EconomicsError {
    #[error("Fee rate {0} bps exceeds 10000")]
    InvalidFeeRate(u32),

    #[error("Credit peg must be at least 1 paisa per credit")]
    InvalidPeg,

    #[error("Default commodity '{0}' has no reference price")]
    UnknownDefaultCommodity(String),

    #[error("Reference price for '{0}' must be positive")]
    ZeroReferencePrice(String),
}
