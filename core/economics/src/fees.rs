// agricredit/core/economics/src/fees.rs

use crate::EconomicsError;
use agricredit_primitives::Credits;
use serde::{Deserialize, Serialize};

/// 1% trade fee
pub const DEFAULT_FEE_BPS: u32 = 100;

const BPS_DENOMINATOR: u128 = 10_000;

/// How a released escrow amount splits between seller and platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeBreakdown {
    pub amount: Credits,
    pub fee: Credits,
    pub seller_receives: Credits,
}

/// Proportional trade fee, rounded up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeePolicy {
    fee_bps: u32,
}

impl FeePolicy {
    pub fn new(fee_bps: u32) -> Result<Self, EconomicsError> {
        if fee_bps as u128 > BPS_DENOMINATOR {
            return Err(EconomicsError::InvalidFeeRate(fee_bps));
        }
        Ok(Self { fee_bps })
    }

    pub fn fee_bps(&self) -> u32 {
        self.fee_bps
    }

    /// `fee = ceil(amount * rate)`; the platform never under-collects.
    pub fn calculate(&self, amount: Credits) -> FeeBreakdown {
        let scaled = amount as u128 * self.fee_bps as u128;
        let fee = scaled.div_ceil(BPS_DENOMINATOR) as Credits;

        FeeBreakdown {
            amount,
            fee,
            seller_receives: amount - fee,
        }
    }
}

impl Default for FeePolicy {
    fn default() -> Self {
        Self {
            fee_bps: DEFAULT_FEE_BPS,
        }
    }
}

/// Fee split at the default 1% rate
pub fn calculate_fee(amount: Credits) -> FeeBreakdown {
    FeePolicy::default().calculate(amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_amount() {
        let split = calculate_fee(2_000);
        assert_eq!(split.fee, 20);
        assert_eq!(split.seller_receives, 1_980);
    }

    #[test]
    fn test_fractional_fee_rounds_up() {
        let split = calculate_fee(55);
        assert_eq!(split.fee, 1);
        assert_eq!(split.seller_receives, 54);
    }

    #[test]
    fn test_zero_amount() {
        let split = calculate_fee(0);
        assert_eq!(split.fee, 0);
        assert_eq!(split.seller_receives, 0);
    }

    #[test]
    fn test_rate_bounds() {
        assert!(FeePolicy::new(10_000).is_ok());
        assert_eq!(
            FeePolicy::new(10_001).unwrap_err(),
            EconomicsError::InvalidFeeRate(10_001)
        );

        let everything = FeePolicy::new(10_000).unwrap().calculate(777);
        assert_eq!(everything.fee, 777);
        assert_eq!(everything.seller_receives, 0);

        let free = FeePolicy::new(0).unwrap().calculate(777);
        assert_eq!(free.fee, 0);
    }

    #[test]
    fn test_max_amount_does_not_overflow() {
        let split = calculate_fee(Credits::MAX);
        assert_eq!(split.fee + split.seller_receives, Credits::MAX);
    }
}
