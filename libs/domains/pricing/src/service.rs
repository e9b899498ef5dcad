use observability::{QuoteMetrics, QuoteTimer};
use rust_decimal::prelude::ToPrimitive;
use std::sync::Arc;

use crate::catalog::CatalogRepository;
use crate::engine::QuoteEngine;
use crate::error::{PricingError, PricingResult};
use crate::models::{PriceTable, QuoteRequest, Selection, Service};
use crate::quote::QuoteBreakdown;

/// Quote and catalog browsing on top of a catalog repository
pub struct PricingService<C: CatalogRepository> {
    catalog: Arc<C>,
    engine: Arc<QuoteEngine>,
}

impl<C: CatalogRepository> Clone for PricingService<C> {
    fn clone(&self) -> Self {
        Self {
            catalog: Arc::clone(&self.catalog),
            engine: Arc::clone(&self.engine),
        }
    }
}

impl<C: CatalogRepository> PricingService<C> {
    pub fn new(catalog: C, engine: QuoteEngine) -> Self {
        Self {
            catalog: Arc::new(catalog),
            engine: Arc::new(engine),
        }
    }

    pub fn engine(&self) -> &QuoteEngine {
        &self.engine
    }

    /// Price `quantity` pieces of service `slug`.
    ///
    /// `selection` picks the price row; `extras` only trigger modifiers.
    pub async fn quote(
        &self,
        slug: &str,
        selection: Selection,
        quantity: i64,
        extras: Selection,
    ) -> PricingResult<QuoteBreakdown> {
        let timer = QuoteTimer::start();
        let request = QuoteRequest::new(slug, quantity, selection).with_extras(extras);

        let result = self.price(&request).await;

        match &result {
            Ok(quote) => {
                QuoteMetrics::record_quote_succeeded(
                    slug,
                    quote.base.rule_kind.as_str(),
                    quote.gross.to_f64().unwrap_or_default(),
                    timer.elapsed(),
                );
                if !quote.warnings.is_empty() {
                    QuoteMetrics::record_ambiguous_row(slug);
                }
            }
            Err(err) => {
                tracing::debug!(service = slug, reason = err.reason(), "Quote rejected: {}", err);
                QuoteMetrics::record_quote_failed(slug, err.reason(), timer.elapsed());
            }
        }

        result
    }

    async fn price(&self, request: &QuoteRequest) -> PricingResult<QuoteBreakdown> {
        let service = self
            .catalog
            .get_service(&request.slug)
            .await?
            .filter(|service| service.active)
            .ok_or_else(|| PricingError::ServiceNotFound(request.slug.clone()))?;

        let rows = self.catalog.get_price_rows(service.id).await?;

        self.engine.price(&service, &rows, request)
    }

    /// Active services, ordered for display
    pub async fn list_services(&self) -> PricingResult<Vec<Service>> {
        self.catalog.list_services().await
    }

    /// Service `slug` with its price rows. Inactive services are not found.
    pub async fn get_price_table(&self, slug: &str) -> PricingResult<PriceTable> {
        let service = self
            .catalog
            .get_service(slug)
            .await?
            .filter(|service| service.active)
            .ok_or_else(|| PricingError::ServiceNotFound(slug.to_string()))?;

        let rows = self.catalog.get_price_rows(service.id).await?;

        Ok(PriceTable { service, rows })
    }
}
