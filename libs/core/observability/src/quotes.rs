//! Quote calculator metrics for the print storefront.

use metrics::{counter, gauge, histogram};
use std::time::{Duration, Instant};

/// Quote metrics recorder
pub struct QuoteMetrics;

impl QuoteMetrics {
    // =========================================================================
    // Quote outcomes
    // =========================================================================

    /// Record a successfully priced quote
    pub fn record_quote_succeeded(slug: &str, rule_kind: &str, gross: f64, duration: Duration) {
        counter!(
            "pricing_quotes_total",
            "outcome" => "ok",
            "service" => slug.to_string(),
            "rule_kind" => rule_kind.to_string()
        )
        .increment(1);

        histogram!("pricing_quote_duration_seconds", "outcome" => "ok")
            .record(duration.as_secs_f64());

        histogram!("pricing_quote_gross_total", "service" => slug.to_string()).record(gross);

        tracing::debug!(
            service = slug,
            rule_kind = rule_kind,
            gross = gross,
            duration_us = duration.as_micros() as u64,
            "Quote computed"
        );
    }

    /// Record a quote that ended in a typed failure
    pub fn record_quote_failed(slug: &str, reason: &str, duration: Duration) {
        counter!(
            "pricing_quotes_total",
            "outcome" => "error",
            "service" => slug.to_string(),
            "reason" => reason.to_string()
        )
        .increment(1);

        histogram!("pricing_quote_duration_seconds", "outcome" => "error")
            .record(duration.as_secs_f64());
    }

    /// Record a price row that matched more than one candidate
    pub fn record_ambiguous_row(slug: &str) {
        counter!("pricing_ambiguous_rows_total", "service" => slug.to_string()).increment(1);
    }

    // =========================================================================
    // Catalog state
    // =========================================================================

    /// Set the number of services in the loaded catalog snapshot
    pub fn set_catalog_size(services: usize, rows: usize) {
        gauge!("pricing_catalog_services").set(services as f64);
        gauge!("pricing_catalog_rows").set(rows as f64);
    }

    /// Record a catalog snapshot (re)load
    pub fn record_catalog_loaded(services: usize, rows: usize) {
        counter!("pricing_catalog_loads_total").increment(1);
        Self::set_catalog_size(services, rows);

        tracing::info!(services = services, rows = rows, "Catalog snapshot loaded");
    }
}

/// Measures how long a quote took from construction to `elapsed()`.
#[derive(Debug, Clone, Copy)]
pub struct QuoteTimer {
    start: Instant,
}

impl QuoteTimer {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}
