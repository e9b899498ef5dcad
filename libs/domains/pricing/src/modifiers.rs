//! Modifier engine: conditional adjustments stacked on top of the base net.
//!
//! Rules are data. A file holds a JSON array:
//!
//! ```json
//! [
//!   { "label": "Lamination: Matte", "when": { "Lamination": "Matte" },
//!     "effect": { "type": "fixed", "amount": "6.00" } },
//!   { "label": "Rush", "when": { "Rush": "yes" },
//!     "effect": { "type": "percent", "pct": "0.25" } }
//! ]
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use strum::Display;
use utoipa::ToSchema;

use crate::error::{LoadError, PricingResult};
use crate::models::{Selection, selection};
use crate::money;

/// What a matching rule adds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ModifierEffect {
    /// Flat amount
    Fixed { amount: Decimal },
    /// Amount times quantity
    PerUnit { amount: Decimal },
    /// Fraction of the base net (`0.25` = 25%)
    Percent { pct: Decimal },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, ToSchema)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum ModifierKind {
    Fixed,
    PerUnit,
    Percent,
}

impl ModifierEffect {
    pub fn kind(&self) -> ModifierKind {
        match self {
            ModifierEffect::Fixed { .. } => ModifierKind::Fixed,
            ModifierEffect::PerUnit { .. } => ModifierKind::PerUnit,
            ModifierEffect::Percent { .. } => ModifierKind::Percent,
        }
    }

    fn magnitude(&self) -> Decimal {
        match self {
            ModifierEffect::Fixed { amount } | ModifierEffect::PerUnit { amount } => *amount,
            ModifierEffect::Percent { pct } => *pct,
        }
    }

    fn value(&self, qty: i64, base_net: Decimal) -> PricingResult<Decimal> {
        match self {
            ModifierEffect::Fixed { amount } => Ok(*amount),
            ModifierEffect::PerUnit { amount } => money::mul(*amount, Decimal::from(qty)),
            ModifierEffect::Percent { pct } => money::mul(base_net, *pct),
        }
    }
}

/// Condition -> effect. An empty `when` always matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ModifierRule {
    pub label: String,
    #[serde(default)]
    pub when: Selection,
    pub effect: ModifierEffect,
}

impl ModifierRule {
    /// Every condition key is present in `attributes` with an equal value.
    pub fn matches(&self, attributes: &Selection) -> bool {
        self.when
            .iter()
            .all(|(key, value)| attributes.get(key) == Some(value))
    }
}

/// One applied modifier in a breakdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ModifierItem {
    pub label: String,
    pub kind: ModifierKind,
    pub value: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ModifierBreakdown {
    /// Sum of `items[].value`
    pub add: Decimal,
    /// Applied modifiers in rule declaration order
    pub items: Vec<ModifierItem>,
}

/// Ordered, validated list of modifier rules
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModifierRuleSet {
    rules: Vec<ModifierRule>,
}

impl ModifierRuleSet {
    /// Labels must be unique and amounts non-negative.
    pub fn new(rules: Vec<ModifierRule>) -> Result<Self, LoadError> {
        let mut labels = HashSet::new();
        for rule in &rules {
            if !labels.insert(rule.label.as_str()) {
                return Err(LoadError::Invalid(format!(
                    "duplicate modifier label '{}'",
                    rule.label
                )));
            }
            if rule.effect.magnitude().is_sign_negative() && !rule.effect.magnitude().is_zero() {
                return Err(LoadError::Invalid(format!(
                    "modifier '{}' has a negative amount",
                    rule.label
                )));
            }
        }

        Ok(Self { rules })
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let rules: Vec<ModifierRule> = LoadError::read_json(path)?;
        let rule_set = Self::new(rules)?;
        tracing::info!(path = %path.display(), rules = rule_set.len(), "Loaded modifier rules");
        Ok(rule_set)
    }

    /// Load from `path` when given, otherwise use [`ModifierRuleSet::print_shop_defaults`].
    pub fn load(path: Option<&Path>) -> Result<Self, LoadError> {
        match path {
            Some(path) => Self::from_json_file(path),
            None => {
                tracing::info!("No modifier rule file configured, using built-in defaults");
                Ok(Self::print_shop_defaults())
            }
        }
    }

    /// Built-in finishing options of the shop.
    pub fn print_shop_defaults() -> Self {
        let rule = |label: &str, when: &[(&str, &str)], effect| ModifierRule {
            label: label.to_string(),
            when: selection(when.iter().copied()),
            effect,
        };

        Self {
            rules: vec![
                rule(
                    "Lamination: Matte",
                    &[("Lamination", "Matte")],
                    ModifierEffect::Fixed { amount: Decimal::new(600, 2) },
                ),
                rule(
                    "Lamination: Gloss",
                    &[("Lamination", "Gloss")],
                    ModifierEffect::Fixed { amount: Decimal::new(800, 2) },
                ),
                rule(
                    "Double-sided",
                    &[("Sides", "Double")],
                    ModifierEffect::PerUnit { amount: Decimal::new(5, 2) },
                ),
                rule(
                    "Rounded corners",
                    &[("Corners", "Rounded")],
                    ModifierEffect::PerUnit { amount: Decimal::new(2, 2) },
                ),
                rule(
                    "Rush",
                    &[("Rush", "yes")],
                    ModifierEffect::Percent { pct: Decimal::new(25, 2) },
                ),
            ],
        }
    }

    pub fn rules(&self) -> &[ModifierRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Sum the effects of every rule matching `attributes`.
    ///
    /// Percent effects apply to `base_net`, never to the running total.
    pub fn apply(
        &self,
        attributes: &Selection,
        qty: i64,
        base_net: Decimal,
    ) -> PricingResult<ModifierBreakdown> {
        let mut breakdown = ModifierBreakdown::default();

        for rule in self.rules.iter().filter(|rule| rule.matches(attributes)) {
            let value = rule.effect.value(qty, base_net)?;
            breakdown.add = money::add(breakdown.add, value)?;
            breakdown.items.push(ModifierItem {
                label: rule.label.clone(),
                kind: rule.effect.kind(),
                value,
            });
        }

        Ok(breakdown)
    }
}
