// agricredit/core/marketplace/src/config.rs

use agricredit_economics::{EconomicsConfig, EconomicsError};
use agricredit_primitives::AccountId;
use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Marketplace configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketConfig {
    #[serde(default)]
    pub economics: EconomicsConfig,

    #[serde(default)]
    pub escrow: EscrowConfig,
}

impl MarketConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.economics.validate()?;
        self.escrow.validate()
    }
}

/// Escrow and dispute settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowConfig {
    /// Hours after purchase before either party may cancel on timeout
    #[serde(default = "default_dispute_timeout_hours")]
    pub dispute_timeout_hours: u64,

    /// Accounts allowed to cancel a trade by arbiter decision
    #[serde(default)]
    pub arbiters: Vec<AccountId>,

    /// Issue seller rewards inside the release transaction
    #[serde(default)]
    pub auto_rewards: bool,
}

/// Longest accepted dispute timeout, one hundred years
pub const MAX_DISPUTE_TIMEOUT_HOURS: u64 = 100 * 365 * 24;

fn default_dispute_timeout_hours() -> u64 {
    72
}

impl Default for EscrowConfig {
    fn default() -> Self {
        Self {
            dispute_timeout_hours: default_dispute_timeout_hours(),
            arbiters: Vec::new(),
            auto_rewards: false,
        }
    }
}

impl EscrowConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dispute_timeout_hours == 0 {
            return Err(ConfigError::ZeroDisputeTimeout);
        }
        if self.dispute_timeout_hours > MAX_DISPUTE_TIMEOUT_HOURS {
            return Err(ConfigError::DisputeTimeoutTooLong(self.dispute_timeout_hours));
        }
        Ok(())
    }

    pub fn dispute_timeout(&self) -> Duration {
        Duration::hours(self.dispute_timeout_hours as i64)
    }

    pub fn is_arbiter(&self, account: &AccountId) -> bool {
        self.arbiters.contains(account)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Economics(#[from] EconomicsError),

    #[error("Dispute timeout must be at least one hour")]
    ZeroDisputeTimeout,

    #[error("Dispute timeout of {0} hours is out of range")]
    DisputeTimeoutTooLong(u64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = MarketConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.escrow.dispute_timeout(), Duration::hours(72));
        assert!(!config.escrow.auto_rewards);
    }

    #[test]
    fn test_rejects_bad_values() {
        let mut config = MarketConfig::default();
        config.escrow.dispute_timeout_hours = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroDisputeTimeout));

        let mut config = MarketConfig::default();
        config.economics.fee_bps = 20_000;
        assert!(matches!(config.validate(), Err(ConfigError::Economics(_))));
    }

    #[test]
    fn test_dispute_timeout_upper_bound() {
        let mut config = EscrowConfig {
            dispute_timeout_hours: MAX_DISPUTE_TIMEOUT_HOURS,
            ..EscrowConfig::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(
            config.dispute_timeout(),
            Duration::hours(MAX_DISPUTE_TIMEOUT_HOURS as i64)
        );

        config.dispute_timeout_hours = 10_000_000_000;
        assert_eq!(
            config.validate(),
            Err(ConfigError::DisputeTimeoutTooLong(10_000_000_000))
        );
    }
}
