// agricredit/core/economics/src/valuation.rs

use crate::EconomicsError;
use agricredit_primitives::Credits;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Rupees per credit, in paise (22.75 per credit)
pub const DEFAULT_PAISE_PER_CREDIT: u64 = 2_275;

/// Commodity used when a key has no reference price
pub const DEFAULT_COMMODITY: &str = "wheat";

/// Government minimum support prices, rupees per quintal (100 kg)
pub const MSP_TABLE: &[(&str, u64)] = &[
    ("wheat", 2_275),
    ("paddy", 2_183),
    ("jowar", 3_180),
    ("bajra", 2_500),
    ("maize", 2_090),
    ("ragi", 3_846),
    ("barley", 1_850),
    ("tur", 7_000),
    ("moong", 8_558),
    ("urad", 6_950),
    ("gram", 5_440),
    ("masur", 6_425),
    ("groundnut", 6_377),
    ("sunflower", 6_760),
    ("soybean", 4_600),
    ("sesamum", 8_635),
    ("mustard", 5_650),
    ("safflower", 5_800),
    ("cotton", 6_620),
];

/// Reference price table and credit peg
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValuationConfig {
    /// Paise per credit
    pub paise_per_credit: u64,

    /// Fallback for unknown commodity keys
    pub default_commodity: String,

    /// Paise per 100 base units, keyed by normalized commodity name
    pub reference_prices: BTreeMap<String, u64>,
}

impl Default for ValuationConfig {
    fn default() -> Self {
        Self {
            paise_per_credit: DEFAULT_PAISE_PER_CREDIT,
            default_commodity: DEFAULT_COMMODITY.to_string(),
            reference_prices: MSP_TABLE
                .iter()
                .map(|(name, rupees)| (name.to_string(), rupees * 100))
                .collect(),
        }
    }
}

impl ValuationConfig {
    pub fn validate(&self) -> Result<(), EconomicsError> {
        if self.paise_per_credit == 0 {
            return Err(EconomicsError::InvalidPeg);
        }

        if let Some((name, _)) = self.reference_prices.iter().find(|(_, price)| **price == 0) {
            return Err(EconomicsError::ZeroReferencePrice(name.clone()));
        }

        let default = normalize_commodity(&self.default_commodity);
        if !self.reference_prices.contains_key(&default) {
            return Err(EconomicsError::UnknownDefaultCommodity(default));
        }

        Ok(())
    }
}

/// Result of a valuation, with the price that produced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Valuation {
    /// Key as given by the caller, normalized
    pub commodity: String,
    /// Key whose reference price was used
    pub priced_as: String,
    pub used_fallback: bool,
    pub reference_price_paise: u64,
    pub quantity: u64,
    pub credits: Credits,
}

/// MSP-to-credit valuation
#[derive(Debug, Clone)]
pub struct Valuator {
    paise_per_credit: u64,
    default_commodity: String,
    prices: BTreeMap<String, u64>,
}

impl Valuator {
    pub fn new(config: ValuationConfig) -> Result<Self, EconomicsError> {
        config.validate()?;

        let prices = config
            .reference_prices
            .into_iter()
            .map(|(name, price)| (normalize_commodity(&name), price))
            .collect();

        Ok(Self {
            paise_per_credit: config.paise_per_credit,
            default_commodity: normalize_commodity(&config.default_commodity),
            prices,
        })
    }

    /// Credits for `quantity` base units of `commodity`. Always rounds down.
    pub fn valuate(&self, commodity: &str, quantity: u64) -> Credits {
        self.quote(commodity, quantity).credits
    }

    pub fn quote(&self, commodity: &str, quantity: u64) -> Valuation {
        let commodity = normalize_commodity(commodity);
        let (priced_as, price, used_fallback) = match self.prices.get(&commodity) {
            Some(price) => (commodity.clone(), *price, false),
            None => (self.default_commodity.clone(), self.default_price(), true),
        };

        // floor(price_per_hundred / 100 * quantity / peg), kept in integers
        let numerator = price as u128 * quantity as u128;
        let denominator = 100u128 * self.paise_per_credit as u128;
        let credits = Credits::try_from(numerator / denominator).unwrap_or(Credits::MAX);

        Valuation {
            commodity,
            priced_as,
            used_fallback,
            reference_price_paise: price,
            quantity,
            credits,
        }
    }

    pub fn reference_price(&self, commodity: &str) -> Option<u64> {
        self.prices.get(&normalize_commodity(commodity)).copied()
    }

    pub fn commodities(&self) -> impl Iterator<Item = (&str, u64)> {
        self.prices.iter().map(|(name, price)| (name.as_str(), *price))
    }

    fn default_price(&self) -> u64 {
        // validate() guarantees the default key is present
        self.prices.get(&self.default_commodity).copied().unwrap_or(0)
    }
}

impl Default for Valuator {
    fn default() -> Self {
        let config = ValuationConfig::default();
        Self {
            paise_per_credit: config.paise_per_credit,
            default_commodity: config.default_commodity,
            prices: config.reference_prices,
        }
    }
}

/// Lookup key for a commodity name
pub fn normalize_commodity(name: &str) -> String {
    name.trim().to_lowercase()
}
