use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::{Display, EnumString};
use utoipa::ToSchema;
use validator::Validate;

/// Attribute name -> chosen value (e.g. `Size -> A5`, `Lamination -> Matte`).
///
/// Ordered so breakdowns and log output are deterministic.
pub type Selection = BTreeMap<String, String>;

/// Currency the quote is expressed in
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    Default,
    ToSchema,
    Hash,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum Currency {
    #[default]
    Eur,
    Usd,
    Gbp,
}

/// How a price row turns a quantity into a base net
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    ToSchema,
    Hash,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum RuleKind {
    /// Flat price regardless of quantity
    Fixed,
    /// Unit price times quantity
    PerUnit,
    /// Quantity-tiered unit price plus a one-time setup fee
    Tiered,
}

impl RuleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKind::Fixed => "fixed",
            RuleKind::PerUnit => "perUnit",
            RuleKind::Tiered => "tiered",
        }
    }
}

/// A printable product (flyers, business cards, posters...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: i64,
    /// Unique human key used in URLs and quote requests
    pub slug: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub sort_order: i32,
}

fn default_active() -> bool {
    true
}

/// Quantity threshold bound to a unit price
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Tier {
    /// Minimum order quantity (inclusive)
    pub qty: i64,
    pub unit: Decimal,
}

/// Catalog price row as stored.
///
/// Only the fields relevant to `rule_kind` are read when pricing; see
/// [`crate::rates::RateRule`] for the validated form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PriceRow {
    pub id: i64,
    pub service_id: i64,
    #[serde(default)]
    pub attrs: Selection,
    pub rule_kind: RuleKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setup: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tiers: Vec<Tier>,
}

/// A service together with its price rows, ordered by row id
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PriceTable {
    pub service: Service,
    pub rows: Vec<PriceRow>,
}

/// Quote request body
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct QuoteRequest {
    /// Service slug
    #[validate(length(min = 1, max = 128))]
    pub slug: String,
    /// Number of pieces; must be positive
    pub qty: i64,
    /// Attributes that pick the price row. Under the `exact` match strategy
    /// every key must appear on the row, so modifier-only attributes
    /// (e.g. `Lamination -> Matte`) belong in `extras`.
    #[serde(default)]
    pub selection: Selection,
    /// Attributes that only trigger modifiers (e.g. `Rush -> yes`)
    #[serde(default)]
    pub extras: Selection,
}

impl QuoteRequest {
    pub fn new(slug: impl Into<String>, qty: i64, selection: Selection) -> Self {
        Self {
            slug: slug.into(),
            qty,
            selection,
            extras: Selection::new(),
        }
    }

    pub fn with_extras(mut self, extras: Selection) -> Self {
        self.extras = extras;
        self
    }

    /// Selection and extras merged; extras win on key collisions.
    pub fn modifier_attributes(&self) -> Selection {
        let mut merged = self.selection.clone();
        merged.extend(self.extras.iter().map(|(k, v)| (k.clone(), v.clone())));
        merged
    }
}

/// Build a [`Selection`] from string pairs.
pub fn selection<K, V, I>(pairs: I) -> Selection
where
    K: Into<String>,
    V: Into<String>,
    I: IntoIterator<Item = (K, V)>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}
