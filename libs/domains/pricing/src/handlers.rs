//! HTTP handlers for the pricing domain

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use axum_helpers::{ValidatedJson, ValidationRejection};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{OpenApi, ToSchema};

use crate::catalog::CatalogRepository;
use crate::error::{PricingError, PricingResult};
use crate::models::{Currency, PriceRow, PriceTable, QuoteRequest, RuleKind, Service, Tier};
use crate::modifiers::{ModifierBreakdown, ModifierItem, ModifierKind};
use crate::quote::{QuoteBreakdown, QuoteWarning};
use crate::rates::BaseCharge;
use crate::service::PricingService;

pub const TAG: &str = "pricing";

/// Successful quote envelope
#[derive(Debug, Serialize, ToSchema)]
pub struct QuoteResponse {
    /// Always `true`
    pub ok: bool,
    pub breakdown: QuoteBreakdown,
}

/// Failed request envelope
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct QuoteErrorResponse {
    /// Always `false`
    pub ok: bool,
    pub error: String,
}

/// OpenAPI documentation for the pricing API
#[derive(OpenApi)]
#[openapi(
    paths(create_quote, list_services, get_price_table),
    components(schemas(
        QuoteRequest,
        QuoteResponse,
        QuoteErrorResponse,
        QuoteBreakdown,
        QuoteWarning,
        BaseCharge,
        ModifierBreakdown,
        ModifierItem,
        ModifierKind,
        Service,
        PriceTable,
        PriceRow,
        Tier,
        RuleKind,
        Currency,
    )),
    tags((name = TAG, description = "Print shop quotes and price tables"))
)]
pub struct ApiDoc;

/// Create the pricing router
pub fn router<C: CatalogRepository + 'static>(service: PricingService<C>) -> Router {
    Router::new()
        .route("/quote", post(create_quote))
        .route("/services", get(list_services))
        .route("/services/{slug}", get(get_price_table))
        .with_state(Arc::new(service))
}

/// Compute a quote
#[utoipa::path(
    post,
    path = "/quote",
    tag = TAG,
    request_body = QuoteRequest,
    responses(
        (status = 200, description = "Quote computed", body = QuoteResponse),
        (status = 400, description = "Invalid input, quantity, or quantity below the minimum tier", body = QuoteErrorResponse),
        (status = 404, description = "Unknown service or no matching price row", body = QuoteErrorResponse),
        (status = 500, description = "Unexpected error", body = QuoteErrorResponse)
    )
)]
async fn create_quote<C: CatalogRepository>(
    State(service): State<Arc<PricingService<C>>>,
    payload: Result<ValidatedJson<QuoteRequest>, ValidationRejection>,
) -> PricingResult<Json<QuoteResponse>> {
    let ValidatedJson(request) = payload.map_err(PricingError::from)?;

    let breakdown = service
        .quote(&request.slug, request.selection, request.qty, request.extras)
        .await?;

    Ok(Json(QuoteResponse {
        ok: true,
        breakdown,
    }))
}

/// List active services
#[utoipa::path(
    get,
    path = "/services",
    tag = TAG,
    responses(
        (status = 200, description = "Active services", body = Vec<Service>),
        (status = 500, description = "Unexpected error", body = QuoteErrorResponse)
    )
)]
async fn list_services<C: CatalogRepository>(
    State(service): State<Arc<PricingService<C>>>,
) -> PricingResult<Json<Vec<Service>>> {
    Ok(Json(service.list_services().await?))
}

/// Get a service with its price rows
#[utoipa::path(
    get,
    path = "/services/{slug}",
    tag = TAG,
    params(("slug" = String, Path, description = "Service slug")),
    responses(
        (status = 200, description = "Price table", body = PriceTable),
        (status = 404, description = "Unknown or inactive service", body = QuoteErrorResponse),
        (status = 500, description = "Unexpected error", body = QuoteErrorResponse)
    )
)]
async fn get_price_table<C: CatalogRepository>(
    State(service): State<Arc<PricingService<C>>>,
    Path(slug): Path<String>,
) -> PricingResult<Json<PriceTable>> {
    Ok(Json(service.get_price_table(&slug).await?))
}
