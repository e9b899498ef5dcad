//! Rate calculator: base net price of a resolved row.

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeSet;
use utoipa::ToSchema;

use crate::config::BelowMinimumTierPolicy;
use crate::error::{PricingError, PricingResult};
use crate::models::{PriceRow, RuleKind, Tier};
use crate::money;

/// Validated pricing rule of a row. Tiers are sorted ascending by `qty`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateRule {
    Fixed { fixed: Decimal },
    PerUnit { unit: Decimal },
    Tiered { tiers: Vec<Tier>, setup: Decimal },
}

/// Base charge of a quote, before modifiers and tax
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BaseCharge {
    pub net: Decimal,
    pub rule_kind: RuleKind,
    pub row_id: i64,
    /// Tier applied, for tiered rows
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<Tier>,
    /// Setup fee included in `net`, for tiered rows
    #[serde(skip_serializing_if = "Option::is_none")]
    pub setup: Option<Decimal>,
}

pub fn ensure_positive_quantity(qty: i64) -> PricingResult<()> {
    if qty <= 0 {
        return Err(PricingError::InvalidQuantity(qty));
    }
    Ok(())
}

fn required_price(row: &PriceRow, field: &str, value: Option<Decimal>) -> PricingResult<Decimal> {
    let value = value.ok_or_else(|| {
        PricingError::UnexpectedComputation(format!(
            "row {} ({}) has no '{}' price",
            row.id, row.rule_kind, field
        ))
    })?;
    non_negative(row, field, value)
}

fn non_negative(row: &PriceRow, field: &str, value: Decimal) -> PricingResult<Decimal> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(PricingError::UnexpectedComputation(format!(
            "row {} has a negative '{}' price",
            row.id, field
        )));
    }
    Ok(value)
}

impl TryFrom<&PriceRow> for RateRule {
    type Error = PricingError;

    fn try_from(row: &PriceRow) -> Result<Self, Self::Error> {
        let rule = match row.rule_kind {
            RuleKind::Fixed => RateRule::Fixed {
                fixed: required_price(row, "fixed", row.fixed)?,
            },
            RuleKind::PerUnit => RateRule::PerUnit {
                unit: required_price(row, "unit", row.unit)?,
            },
            RuleKind::Tiered => {
                if row.tiers.is_empty() {
                    return Err(PricingError::UnexpectedComputation(format!(
                        "tiered row {} has no tiers",
                        row.id
                    )));
                }

                let mut seen = BTreeSet::new();
                for tier in &row.tiers {
                    if tier.qty <= 0 {
                        return Err(PricingError::UnexpectedComputation(format!(
                            "row {} has a tier with non-positive qty {}",
                            row.id, tier.qty
                        )));
                    }
                    if !seen.insert(tier.qty) {
                        return Err(PricingError::UnexpectedComputation(format!(
                            "row {} has duplicate tier qty {}",
                            row.id, tier.qty
                        )));
                    }
                    non_negative(row, "tier unit", tier.unit)?;
                }

                let mut tiers = row.tiers.clone();
                tiers.sort_by_key(|tier| tier.qty);

                let setup = match row.setup {
                    Some(setup) => non_negative(row, "setup", setup)?,
                    None => Decimal::ZERO,
                };

                RateRule::Tiered { tiers, setup }
            }
        };

        if has_ignored_fields(row) {
            tracing::warn!(
                row_id = row.id,
                rule_kind = %row.rule_kind,
                "Price row carries fields its rule kind ignores"
            );
        }

        Ok(rule)
    }
}

fn has_ignored_fields(row: &PriceRow) -> bool {
    match row.rule_kind {
        RuleKind::Fixed => row.unit.is_some() || row.setup.is_some() || !row.tiers.is_empty(),
        RuleKind::PerUnit => row.fixed.is_some() || row.setup.is_some() || !row.tiers.is_empty(),
        RuleKind::Tiered => row.fixed.is_some() || row.unit.is_some(),
    }
}

impl RateRule {
    pub fn kind(&self) -> RuleKind {
        match self {
            RateRule::Fixed { .. } => RuleKind::Fixed,
            RateRule::PerUnit { .. } => RuleKind::PerUnit,
            RateRule::Tiered { .. } => RuleKind::Tiered,
        }
    }

    /// Tier that applies to `qty`: the highest threshold not above it.
    fn select_tier(
        tiers: &[Tier],
        qty: i64,
        policy: BelowMinimumTierPolicy,
    ) -> PricingResult<&Tier> {
        if let Some(tier) = tiers.iter().rev().find(|tier| tier.qty <= qty) {
            return Ok(tier);
        }

        let smallest = tiers.first().ok_or_else(|| {
            PricingError::UnexpectedComputation("tiered rule without tiers".to_string())
        })?;

        match policy {
            BelowMinimumTierPolicy::Reject => Err(PricingError::QuantityBelowMinimumTier {
                qty,
                min_tier: smallest.qty,
            }),
            BelowMinimumTierPolicy::Clamp => Ok(smallest),
        }
    }

    /// Base net for `qty` pieces of the row `row_id`.
    pub fn base_charge(
        &self,
        row_id: i64,
        qty: i64,
        policy: BelowMinimumTierPolicy,
    ) -> PricingResult<BaseCharge> {
        ensure_positive_quantity(qty)?;
        let quantity = Decimal::from(qty);

        let charge = match self {
            RateRule::Fixed { fixed } => BaseCharge {
                net: *fixed,
                rule_kind: RuleKind::Fixed,
                row_id,
                tier: None,
                setup: None,
            },
            RateRule::PerUnit { unit } => BaseCharge {
                net: money::mul(*unit, quantity)?,
                rule_kind: RuleKind::PerUnit,
                row_id,
                tier: None,
                setup: None,
            },
            RateRule::Tiered { tiers, setup } => {
                let tier = Self::select_tier(tiers, qty, policy)?;
                let net = money::add(money::mul(tier.unit, quantity)?, *setup)?;
                BaseCharge {
                    net,
                    rule_kind: RuleKind::Tiered,
                    row_id,
                    tier: Some(tier.clone()),
                    setup: Some(*setup),
                }
            }
        };

        Ok(charge)
    }
}

/// Convert `row` and compute its base charge for `qty`.
pub fn compute_base(
    row: &PriceRow,
    qty: i64,
    policy: BelowMinimumTierPolicy,
) -> PricingResult<BaseCharge> {
    ensure_positive_quantity(qty)?;
    RateRule::try_from(row)?.base_charge(row.id, qty, policy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Selection;
    use rust_decimal_macros::dec;

    fn base_row(rule_kind: RuleKind) -> PriceRow {
        PriceRow {
            id: 1,
            service_id: 1,
            attrs: Selection::new(),
            rule_kind,
            unit: None,
            fixed: None,
            setup: None,
            tiers: vec![],
        }
    }

    fn tiered_row() -> PriceRow {
        PriceRow {
            setup: Some(dec!(10)),
            tiers: vec![
                Tier { qty: 100, unit: dec!(2.50) },
                Tier { qty: 50, unit: dec!(3.00) },
            ],
            ..base_row(RuleKind::Tiered)
        }
    }

    #[test]
    fn test_per_unit_multiplies_quantity() {
        let row = PriceRow { unit: Some(dec!(2.00)), ..base_row(RuleKind::PerUnit) };
        let base = compute_base(&row, 100, BelowMinimumTierPolicy::Reject).unwrap();
        assert_eq!(base.net, dec!(200.00));
        assert_eq!(base.rule_kind, RuleKind::PerUnit);
        assert_eq!(base.tier, None);
    }

    #[test]
    fn test_fixed_ignores_quantity_but_validates_it() {
        let row = PriceRow { fixed: Some(dec!(35.00)), ..base_row(RuleKind::Fixed) };

        let one = compute_base(&row, 1, BelowMinimumTierPolicy::Reject).unwrap();
        let many = compute_base(&row, 5000, BelowMinimumTierPolicy::Reject).unwrap();
        assert_eq!(one.net, dec!(35.00));
        assert_eq!(one, many);

        let err = compute_base(&row, 0, BelowMinimumTierPolicy::Reject).unwrap_err();
        assert!(matches!(err, PricingError::InvalidQuantity(0)));
    }

    #[test]
    fn test_tiered_boundary_is_inclusive() {
        let base = compute_base(&tiered_row(), 100, BelowMinimumTierPolicy::Reject).unwrap();
        assert_eq!(base.net, dec!(260.00));
        assert_eq!(base.tier, Some(Tier { qty: 100, unit: dec!(2.50) }));
        assert_eq!(base.setup, Some(dec!(10)));
    }

    #[test]
    fn test_tiered_just_below_boundary_uses_lower_tier() {
        let base = compute_base(&tiered_row(), 99, BelowMinimumTierPolicy::Reject).unwrap();
        assert_eq!(base.net, dec!(307.00));
    }

    #[test]
    fn test_below_minimum_tier_reject() {
        let err = compute_base(&tiered_row(), 40, BelowMinimumTierPolicy::Reject).unwrap_err();
        assert!(matches!(
            err,
            PricingError::QuantityBelowMinimumTier { qty: 40, min_tier: 50 }
        ));
    }

    #[test]
    fn test_below_minimum_tier_clamp() {
        let base = compute_base(&tiered_row(), 40, BelowMinimumTierPolicy::Clamp).unwrap();
        assert_eq!(base.net, dec!(130.00));
        assert_eq!(base.tier.map(|t| t.qty), Some(50));
    }

    #[test]
    fn test_tiered_without_setup_defaults_to_zero() {
        let row = PriceRow { setup: None, ..tiered_row() };
        let base = compute_base(&row, 50, BelowMinimumTierPolicy::Reject).unwrap();
        assert_eq!(base.net, dec!(150.00));
    }

    #[test]
    fn test_missing_required_price_is_a_computation_error() {
        for kind in [RuleKind::Fixed, RuleKind::PerUnit, RuleKind::Tiered] {
            let err = RateRule::try_from(&base_row(kind)).unwrap_err();
            assert!(matches!(err, PricingError::UnexpectedComputation(_)), "{kind}");
        }
    }

    #[test]
    fn test_faulty_tiers_are_rejected() {
        let duplicate = PriceRow {
            tiers: vec![Tier { qty: 50, unit: dec!(3) }, Tier { qty: 50, unit: dec!(2) }],
            ..base_row(RuleKind::Tiered)
        };
        let zero_qty = PriceRow {
            tiers: vec![Tier { qty: 0, unit: dec!(3) }],
            ..base_row(RuleKind::Tiered)
        };
        let negative = PriceRow {
            tiers: vec![Tier { qty: 1, unit: dec!(-3) }],
            ..base_row(RuleKind::Tiered)
        };

        for row in [duplicate, zero_qty, negative] {
            assert!(RateRule::try_from(&row).is_err());
        }
    }

    #[test]
    fn test_fields_of_other_kinds_are_ignored() {
        let row = PriceRow {
            unit: Some(dec!(2.00)),
            fixed: Some(dec!(999)),
            tiers: vec![Tier { qty: 1, unit: dec!(0.01) }],
            ..base_row(RuleKind::PerUnit)
        };

        assert_eq!(RateRule::try_from(&row).unwrap(), RateRule::PerUnit { unit: dec!(2.00) });
    }
}
