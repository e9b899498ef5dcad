//! Pure quote pipeline: resolve row -> base charge -> modifiers -> assemble.

use crate::config::PricingConfig;
use crate::error::{PricingError, PricingResult};
use crate::models::{PriceRow, QuoteRequest, Service};
use crate::modifiers::ModifierRuleSet;
use crate::quote::{QuoteBreakdown, QuoteWarning, assemble};
use crate::rates::{compute_base, ensure_positive_quantity};
use crate::resolver::resolve_row;

/// Synchronous, side-effect-free quote calculator.
///
/// Catalog data is passed in by the caller, so one engine can be shared by
/// any number of concurrent requests.
#[derive(Debug, Clone)]
pub struct QuoteEngine {
    config: PricingConfig,
    rules: ModifierRuleSet,
}

impl QuoteEngine {
    pub fn new(config: PricingConfig, rules: ModifierRuleSet) -> Self {
        Self { config, rules }
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    pub fn rules(&self) -> &ModifierRuleSet {
        &self.rules
    }

    /// Price `request` against `service` and its `rows`.
    ///
    /// The selection alone picks the row; selection and extras together
    /// trigger modifiers.
    pub fn price(
        &self,
        service: &Service,
        rows: &[PriceRow],
        request: &QuoteRequest,
    ) -> PricingResult<QuoteBreakdown> {
        if !service.active {
            return Err(PricingError::ServiceNotFound(service.slug.clone()));
        }
        ensure_positive_quantity(request.qty)?;

        let resolution = resolve_row(
            &service.slug,
            rows,
            &request.selection,
            self.config.match_strategy,
        )?;

        let mut warnings = Vec::new();
        if resolution.is_ambiguous() {
            tracing::warn!(
                service = %service.slug,
                candidates = ?resolution.tied,
                chosen = resolution.row.id,
                "Ambiguous pricing rule, using lowest row id"
            );
            warnings.push(QuoteWarning::AmbiguousPricingRule {
                candidates: resolution.tied.clone(),
                chosen: resolution.row.id,
            });
        }

        let base = compute_base(resolution.row, request.qty, self.config.below_min_tier)?;
        let modifiers = self
            .rules
            .apply(&request.modifier_attributes(), request.qty, base.net)?;

        assemble(base, modifiers, request.qty, &self.config, warnings)
    }
}
