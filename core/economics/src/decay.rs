// agricredit/core/economics/src/decay.rs

use agricredit_primitives::Credits;
use chrono::{DateTime, Utc};
use primitive_types::U512;
use serde::{Deserialize, Serialize};

/// A decay month is 30 days
pub const SECONDS_PER_MONTH: i64 = 30 * 24 * 60 * 60;

/// Inactive months before any decay accrues
pub const GRACE_MONTHS: u32 = 12;

// 0.98 per month, reduced to 49/50
const RETAIN_NUMERATOR: u64 = 49;
const RETAIN_DENOMINATOR: u64 = 50;

// 50^64 * u64::MAX stays well inside U512
const MAX_EXACT_MONTHS: u32 = 64;

/// Result of evaluating decay for one balance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecayOutcome {
    pub balance: Credits,
    pub decayed: bool,
    pub months_inactive: u32,
    /// Months of decay due in total since the last activity
    pub decay_months: u32,
}

/// Whole 30-day months between `last_activity` and `now`. Clock skew counts as zero.
pub fn months_inactive(last_activity: DateTime<Utc>, now: DateTime<Utc>) -> u32 {
    let elapsed = (now - last_activity).num_seconds();
    if elapsed <= 0 {
        return 0;
    }
    u32::try_from(elapsed / SECONDS_PER_MONTH).unwrap_or(u32::MAX)
}

/// Decay months owed after `months` of inactivity.
///
/// Twelve months inactive is still inside the grace period. From the
/// thirteenth month on, decay counts from month 12 (13 inactive -> 2 months).
pub fn decay_months_due(months: u32) -> u32 {
    if months <= GRACE_MONTHS {
        0
    } else {
        months - (GRACE_MONTHS - 1)
    }
}

/// `floor(balance * 0.98^months)`, exact within each 64-month chunk
pub fn decay_balance(balance: Credits, months: u32) -> Credits {
    let mut remaining = months;
    let mut value = balance;

    while remaining > 0 && value > 0 {
        let chunk = remaining.min(MAX_EXACT_MONTHS);
        let exponent = U512::from(chunk);
        let numerator = U512::from(RETAIN_NUMERATOR).pow(exponent);
        let denominator = U512::from(RETAIN_DENOMINATOR).pow(exponent);

        value = (U512::from(value) * numerator / denominator).low_u64();
        remaining -= chunk;
    }

    value
}

/// Apply inactivity decay to a balance whose last activity was `last_activity`
pub fn apply_decay(
    balance: Credits,
    last_activity: DateTime<Utc>,
    now: DateTime<Utc>,
) -> (Credits, bool) {
    let outcome = DecayPolicy::default().evaluate(balance, last_activity, now, 0);
    (outcome.balance, outcome.decayed)
}

/// Decay evaluation that accounts for months already committed
#[derive(Debug, Clone, Copy, Default)]
pub struct DecayPolicy;

impl DecayPolicy {
    /// Evaluate decay for a stored balance that already had
    /// `months_applied` months of decay committed since `last_activity`.
    pub fn evaluate(
        &self,
        balance: Credits,
        last_activity: DateTime<Utc>,
        now: DateTime<Utc>,
        months_applied: u32,
    ) -> DecayOutcome {
        let months_inactive = months_inactive(last_activity, now);
        let decay_months = decay_months_due(months_inactive);
        let pending = decay_months.saturating_sub(months_applied);

        let new_balance = decay_balance(balance, pending);

        DecayOutcome {
            balance: new_balance,
            decayed: new_balance < balance,
            months_inactive,
            decay_months,
        }
    }
}
