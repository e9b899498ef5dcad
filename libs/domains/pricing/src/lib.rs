//! Pricing Domain
//!
//! Quote calculator for the print shop: picks the price row a customer's
//! attribute selection refers to, computes the base charge, stacks the
//! matching modifiers and applies VAT.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │ PricingService   │  ← fetches catalog data, metrics, logging
//! └────────┬─────────┘
//!          │
//! ┌────────▼─────────┐
//! │ QuoteEngine      │  ← pure pipeline
//! │  resolver        │    selection -> price row
//! │  rates           │    row + qty -> base charge
//! │  modifiers       │    attributes -> adjustments
//! │  quote           │    net, vat, gross
//! └────────┬─────────┘
//!          │
//! ┌────────▼─────────┐
//! │ CatalogRepository│  ← trait + in-memory snapshot
//! └──────────────────┘
//! ```
//!
//! Money is [`rust_decimal::Decimal`] throughout and travels as a JSON string.

pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod memory;
pub mod models;
pub mod modifiers;
pub mod money;
pub mod quote;
pub mod rates;
pub mod resolver;
pub mod service;

pub use catalog::CatalogRepository;
pub use config::{BelowMinimumTierPolicy, MatchStrategy, PricingConfig};
pub use engine::QuoteEngine;
pub use error::{LoadError, PricingError, PricingResult};
pub use memory::{CatalogSnapshot, InMemoryCatalog};
pub use models::{
    Currency, PriceRow, PriceTable, QuoteRequest, RuleKind, Selection, Service, Tier, selection,
};
pub use modifiers::{ModifierEffect, ModifierItem, ModifierKind, ModifierRule, ModifierRuleSet};
pub use quote::{QuoteBreakdown, QuoteWarning};
pub use rates::{BaseCharge, RateRule};
pub use service::PricingService;
