//! Shared application state.

use domain_pricing::{InMemoryCatalog, ModifierRuleSet, PricingService, QuoteEngine};

use crate::config::Config;

/// Cloned into every handler; all fields are `Arc`-backed.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Catalog snapshot, also used by the readiness check
    pub catalog: InMemoryCatalog,
    pub pricing: PricingService<InMemoryCatalog>,
}

impl AppState {
    /// Load the catalog and modifier rules named by `config`.
    pub fn load(config: Config) -> eyre::Result<Self> {
        let catalog = InMemoryCatalog::from_json_file(&config.catalog_path)?;
        let rules = ModifierRuleSet::load(config.pricing.modifier_rules_path.as_deref())?;

        Ok(Self::new(config, catalog, rules))
    }

    pub fn new(config: Config, catalog: InMemoryCatalog, rules: ModifierRuleSet) -> Self {
        let engine = QuoteEngine::new(config.pricing.clone(), rules);
        let pricing = PricingService::new(catalog.clone(), engine);

        Self {
            config,
            catalog,
            pricing,
        }
    }
}
