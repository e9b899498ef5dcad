//! Observability utilities for the print storefront.
//!
//! This crate provides:
//! - Prometheus metrics recording and export
//! - Quote calculator metrics
//! - Axum middleware for automatic request metrics
//!
//! # Example
//!
//! ```rust,ignore
//! use observability::{init_metrics, metrics_handler, QuoteMetrics};
//!
//! init_metrics();
//! QuoteMetrics::record_catalog_loaded(4, 20);
//!
//! let app = Router::new()
//!     .route("/metrics", get(metrics_handler));
//! ```

pub mod middleware;
pub mod quotes;

pub use middleware::metrics_middleware;
pub use quotes::{QuoteMetrics, QuoteTimer};

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use tracing::{info, warn};

static METRICS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Initialize the Prometheus metrics recorder.
///
/// Call once at startup. Returns `None` when another global recorder was
/// already installed (the process keeps running without `/metrics` output).
pub fn init_metrics() -> Option<&'static PrometheusHandle> {
    if let Some(handle) = METRICS_HANDLE.get() {
        return Some(handle);
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            info!("Prometheus metrics recorder initialized");
            register_metric_descriptions();
            Some(METRICS_HANDLE.get_or_init(|| handle))
        }
        Err(e) => {
            warn!("Failed to install Prometheus recorder: {}", e);
            None
        }
    }
}

/// Get the metrics handle (must call init_metrics first)
pub fn get_metrics_handle() -> Option<&'static PrometheusHandle> {
    METRICS_HANDLE.get()
}

/// Axum handler for /metrics endpoint
pub async fn metrics_handler() -> String {
    match get_metrics_handle() {
        Some(handle) => handle.render(),
        None => "# Metrics not initialized\n".to_string(),
    }
}

fn register_metric_descriptions() {
    use metrics::describe_counter;
    use metrics::describe_gauge;
    use metrics::describe_histogram;

    // HTTP metrics
    describe_counter!("http_requests_total", "Total number of HTTP requests");
    describe_histogram!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds"
    );
    describe_counter!(
        "http_requests_errors_total",
        "Total number of HTTP request errors"
    );

    // Quote metrics
    describe_counter!(
        "pricing_quotes_total",
        "Quotes computed, by outcome and service"
    );
    describe_histogram!(
        "pricing_quote_duration_seconds",
        "Time spent computing a quote"
    );
    describe_histogram!(
        "pricing_quote_gross_total",
        "Gross amount of computed quotes"
    );
    describe_counter!(
        "pricing_ambiguous_rows_total",
        "Selections that matched more than one price row"
    );

    // Catalog metrics
    describe_gauge!("pricing_catalog_services", "Services in the loaded catalog");
    describe_gauge!("pricing_catalog_rows", "Price rows in the loaded catalog");
    describe_counter!("pricing_catalog_loads_total", "Catalog snapshot loads");
}
