//! Pricing settings loaded from the environment.
//!
//! | Variable | Default | |
//! |---|---|---|
//! | `PRICING_VAT_RATE` | `0.20` | fraction in `[0, 1]` |
//! | `PRICING_CURRENCY` | `EUR` | `EUR`, `USD`, `GBP` |
//! | `PRICING_MATCH_STRATEGY` | `exact` | `exact` or `subset` |
//! | `PRICING_BELOW_MIN_TIER` | `reject` | `reject` or `clamp` |
//! | `PRICING_MODIFIER_RULES` | unset | path to a JSON rule file |

use core_config::{ConfigError, FromEnv, env_optional, env_parse};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use strum::{Display, EnumString};

/// How a customer selection picks a price row
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum MatchStrategy {
    /// Row attributes must equal the selection
    #[default]
    Exact,
    /// Row attributes must be contained in the selection; the most specific row wins
    Subset,
}

/// What to do when the quantity is smaller than every tier threshold
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum BelowMinimumTierPolicy {
    #[default]
    Reject,
    /// Price at the smallest tier
    Clamp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricingConfig {
    pub vat_rate: Decimal,
    pub currency: crate::models::Currency,
    pub match_strategy: MatchStrategy,
    pub below_min_tier: BelowMinimumTierPolicy,
    pub modifier_rules_path: Option<PathBuf>,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            vat_rate: Decimal::new(20, 2),
            currency: Default::default(),
            match_strategy: MatchStrategy::default(),
            below_min_tier: BelowMinimumTierPolicy::default(),
            modifier_rules_path: None,
        }
    }
}

impl PricingConfig {
    pub fn with_vat_rate(mut self, vat_rate: Decimal) -> Self {
        self.vat_rate = vat_rate;
        self
    }

    pub fn with_match_strategy(mut self, strategy: MatchStrategy) -> Self {
        self.match_strategy = strategy;
        self
    }

    pub fn with_below_min_tier(mut self, policy: BelowMinimumTierPolicy) -> Self {
        self.below_min_tier = policy;
        self
    }
}

impl FromEnv for PricingConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let vat_rate: Decimal = env_parse("PRICING_VAT_RATE", "0.20")?;
        if vat_rate.is_sign_negative() || vat_rate > Decimal::ONE {
            return Err(ConfigError::InvalidValue {
                key: "PRICING_VAT_RATE".to_string(),
                details: format!("{} is outside [0, 1]", vat_rate),
            });
        }

        Ok(Self {
            vat_rate,
            currency: env_parse("PRICING_CURRENCY", "EUR")?,
            match_strategy: env_parse("PRICING_MATCH_STRATEGY", "exact")?,
            below_min_tier: env_parse("PRICING_BELOW_MIN_TIER", "reject")?,
            modifier_rules_path: env_optional("PRICING_MODIFIER_RULES").map(PathBuf::from),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Currency;
    use rust_decimal_macros::dec;

    const KEYS: [&str; 5] = [
        "PRICING_VAT_RATE",
        "PRICING_CURRENCY",
        "PRICING_MATCH_STRATEGY",
        "PRICING_BELOW_MIN_TIER",
        "PRICING_MODIFIER_RULES",
    ];

    #[test]
    fn test_defaults_when_unset() {
        temp_env::with_vars_unset(KEYS, || {
            let config = PricingConfig::from_env().unwrap();
            assert_eq!(config, PricingConfig::default());
            assert_eq!(config.vat_rate, dec!(0.20));
            assert_eq!(config.currency, Currency::Eur);
        });
    }

    #[test]
    fn test_custom_values() {
        temp_env::with_vars(
            [
                ("PRICING_VAT_RATE", Some("0.19")),
                ("PRICING_CURRENCY", Some("gbp")),
                ("PRICING_MATCH_STRATEGY", Some("Subset")),
                ("PRICING_BELOW_MIN_TIER", Some("clamp")),
                ("PRICING_MODIFIER_RULES", Some("/etc/pricing/rules.json")),
            ],
            || {
                let config = PricingConfig::from_env().unwrap();
                assert_eq!(config.vat_rate, dec!(0.19));
                assert_eq!(config.currency, Currency::Gbp);
                assert_eq!(config.match_strategy, MatchStrategy::Subset);
                assert_eq!(config.below_min_tier, BelowMinimumTierPolicy::Clamp);
                assert_eq!(
                    config.modifier_rules_path,
                    Some(PathBuf::from("/etc/pricing/rules.json"))
                );
            },
        );
    }

    #[test]
    fn test_vat_rate_out_of_range_is_rejected() {
        for bad in ["-0.1", "1.5"] {
            temp_env::with_var("PRICING_VAT_RATE", Some(bad), || {
                let err = PricingConfig::from_env().unwrap_err();
                assert!(matches!(err, ConfigError::InvalidValue { .. }));
            });
        }
    }

    #[test]
    fn test_unparseable_values_name_the_key() {
        temp_env::with_var("PRICING_VAT_RATE", Some("twenty"), || {
            let err = PricingConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("PRICING_VAT_RATE"));
        });

        temp_env::with_vars(
            [("PRICING_VAT_RATE", None), ("PRICING_MATCH_STRATEGY", Some("fuzzy"))],
            || {
                let err = PricingConfig::from_env().unwrap_err();
                assert!(err.to_string().contains("PRICING_MATCH_STRATEGY"));
            },
        );
    }
}
