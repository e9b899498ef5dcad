//! Quote assembler: net, tax and gross from a base charge and its modifiers.

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::config::PricingConfig;
use crate::error::PricingResult;
use crate::models::Currency;
use crate::modifiers::ModifierBreakdown;
use crate::money::{self, round_half_up};
use crate::rates::BaseCharge;

/// Decimal places of the quoted gross
pub const GROSS_DP: u32 = 2;
/// Decimal places of the display unit price
pub const UNIT_DP: u32 = 4;

/// Non-fatal note attached to a breakdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum QuoteWarning {
    /// Several rows matched equally well; `chosen` is the lowest id
    AmbiguousPricingRule { candidates: Vec<i64>, chosen: i64 },
}

/// Itemized result of a price computation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuoteBreakdown {
    pub currency: Currency,
    pub quantity: i64,
    pub base: BaseCharge,
    pub modifiers: ModifierBreakdown,
    /// `base.net + modifiers.add`, unrounded
    pub net: Decimal,
    pub vat_rate: Decimal,
    /// `net * vatRate`, unrounded
    pub vat: Decimal,
    /// `net + vat` rounded half-up to cents
    pub gross: Decimal,
    /// `net / quantity` rounded half-up to 4 places, display only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<Decimal>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<QuoteWarning>,
}

pub fn assemble(
    base: BaseCharge,
    modifiers: ModifierBreakdown,
    quantity: i64,
    config: &PricingConfig,
    warnings: Vec<QuoteWarning>,
) -> PricingResult<QuoteBreakdown> {
    let net = money::add(base.net, modifiers.add)?;
    let vat = money::mul(net, config.vat_rate)?;
    let gross = round_half_up(money::add(net, vat)?, GROSS_DP);

    let unit = if quantity > 0 {
        Some(round_half_up(
            money::div(net, Decimal::from(quantity))?,
            UNIT_DP,
        ))
    } else {
        None
    };

    Ok(QuoteBreakdown {
        currency: config.currency,
        quantity,
        base,
        modifiers,
        net,
        vat_rate: config.vat_rate,
        vat,
        gross,
        unit,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RuleKind;
    use crate::modifiers::{ModifierItem, ModifierKind};
    use rust_decimal_macros::dec;

    fn base(net: Decimal) -> BaseCharge {
        BaseCharge {
            net,
            rule_kind: RuleKind::PerUnit,
            row_id: 1,
            tier: None,
            setup: None,
        }
    }

    #[test]
    fn test_net_vat_and_gross() {
        let modifiers = ModifierBreakdown {
            add: dec!(6),
            items: vec![ModifierItem {
                label: "Lamination: Matte".into(),
                kind: ModifierKind::Fixed,
                value: dec!(6),
            }],
        };

        let quote =
            assemble(base(dec!(200.00)), modifiers, 100, &PricingConfig::default(), vec![]).unwrap();

        assert_eq!(quote.net, dec!(206.00));
        assert_eq!(quote.vat, dec!(41.20));
        assert_eq!(quote.gross, dec!(247.20));
        assert_eq!(quote.unit, Some(dec!(2.06)));
    }

    #[test]
    fn test_only_gross_is_rounded() {
        let config = PricingConfig::default().with_vat_rate(dec!(0.19));
        let quote =
            assemble(base(dec!(10.005)), ModifierBreakdown::default(), 3, &config, vec![]).unwrap();

        assert_eq!(quote.net, dec!(10.005));
        assert_eq!(quote.vat, dec!(1.90095));
        assert_eq!(quote.gross.to_string(), "11.91");
        assert_eq!(quote.unit.map(|u| u.to_string()), Some("3.3350".to_string()));
    }

    #[test]
    fn test_zero_vat_rate() {
        let config = PricingConfig::default().with_vat_rate(Decimal::ZERO);
        let quote =
            assemble(base(dec!(99.99)), ModifierBreakdown::default(), 1, &config, vec![]).unwrap();
        assert_eq!(quote.gross, dec!(99.99));
        assert!(quote.vat.is_zero());
    }

    #[test]
    fn test_json_shape() {
        let quote = assemble(
            base(dec!(200.00)),
            ModifierBreakdown::default(),
            100,
            &PricingConfig::default(),
            vec![QuoteWarning::AmbiguousPricingRule { candidates: vec![3, 5], chosen: 3 }],
        )
        .unwrap();

        let json = serde_json::to_value(&quote).unwrap();
        assert_eq!(json["currency"], "EUR");
        assert_eq!(json["base"]["ruleKind"], "perUnit");
        assert_eq!(json["base"]["rowId"], 1);
        assert_eq!(json["gross"], "240.00");
        assert_eq!(json["vatRate"], "0.20");
        assert_eq!(json["warnings"][0]["type"], "ambiguousPricingRule");
        assert_eq!(json["warnings"][0]["chosen"], 3);
        assert!(json["base"].get("tier").is_none());
    }
}
