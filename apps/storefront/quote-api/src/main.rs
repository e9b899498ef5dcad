use axum_helpers::server::{create_production_app, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use observability::QuoteMetrics;
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    let config = Config::from_env()?;

    init_tracing(&config.environment);
    observability::init_metrics();

    info!(
        catalog = %config.catalog_path.display(),
        vat_rate = %config.pricing.vat_rate,
        currency = %config.pricing.currency,
        match_strategy = %config.pricing.match_strategy,
        below_min_tier = %config.pricing.below_min_tier,
        "Loading pricing data"
    );

    let state = AppState::load(config)?;

    let (services, rows) = state.catalog.counts().await;
    QuoteMetrics::record_catalog_loaded(services, rows);
    info!(
        services,
        rows,
        modifier_rules = state.pricing.engine().rules().len(),
        "Pricing engine ready"
    );

    let api_routes = api::routes(&state);

    // create_router adds docs/middleware to our composed routes
    let router = axum_helpers::create_router::<openapi::ApiDoc>(api_routes)?;

    // - /health: liveness check with app name/version
    // - /ready: catalog has active services
    // - /metrics: Prometheus scrape endpoint
    let app = router
        .merge(health_router(state.config.app))
        .merge(api::ready_router(state.clone()))
        .merge(api::metrics_router())
        .layer(axum::middleware::from_fn(observability::metrics_middleware));

    info!("Starting quote API with graceful shutdown (30s timeout)");

    let server = state.config.server.clone();
    create_production_app(app, &server, Duration::from_secs(30), async move {
        let (services, rows) = state.catalog.counts().await;
        info!(services, rows, "Shutting down: releasing catalog snapshot");
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Quote API shutdown complete");
    Ok(())
}
