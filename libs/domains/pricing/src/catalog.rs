use async_trait::async_trait;

use crate::error::PricingResult;
use crate::models::{PriceRow, Service};

/// Read access to the service catalog and its price tables.
///
/// Implementations return inactive services from `get_service`; callers
/// decide whether inactive means "not found".
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Get a service by slug
    async fn get_service(&self, slug: &str) -> PricingResult<Option<Service>>;

    /// Price rows of a service, ordered by row id
    async fn get_price_rows(&self, service_id: i64) -> PricingResult<Vec<PriceRow>>;

    /// Active services ordered by `sort_order`, then slug
    async fn list_services(&self) -> PricingResult<Vec<Service>>;
}
