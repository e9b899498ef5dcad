//! Readiness check backed by the loaded catalog.

use crate::state::AppState;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use axum_helpers::server::{HealthCheckFuture, run_health_checks};

pub async fn ready_handler(State(state): State<AppState>) -> Response {
    let checks: Vec<(&str, HealthCheckFuture<'_>)> = vec![(
        "catalog",
        Box::pin(async {
            let services = state
                .pricing
                .list_services()
                .await
                .map_err(|e| format!("Catalog lookup failed: {}", e))?;

            if services.is_empty() {
                return Err("Catalog has no active services".to_string());
            }
            Ok(())
        }),
    )];

    match run_health_checks(checks).await {
        Ok((status, json)) => (status, json).into_response(),
        Err((status, json)) => (status, json).into_response(),
    }
}
