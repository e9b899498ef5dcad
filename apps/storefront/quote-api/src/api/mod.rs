use axum::{Router, routing::get};

pub mod health;

/// API routes without the `/api` prefix; `create_router` adds it.
pub fn routes(state: &crate::state::AppState) -> Router {
    Router::new().nest(
        "/pricing",
        domain_pricing::handlers::router(state.pricing.clone()),
    )
}

/// `/ready` checks that the catalog has services to quote.
pub fn ready_router(state: crate::state::AppState) -> Router {
    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}

/// Prometheus scrape endpoint
pub fn metrics_router() -> Router {
    Router::new().route("/metrics", get(observability::metrics_handler))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Environment};
    use crate::state::AppState;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use core_config::{app_info, server::ServerConfig};
    use domain_pricing::{
        CatalogSnapshot, InMemoryCatalog, ModifierRuleSet, PriceRow, PricingConfig, RuleKind,
        Service, selection,
    };
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use std::path::PathBuf;
    use tower::ServiceExt;

    fn state(services: Vec<Service>, rows: Vec<PriceRow>) -> AppState {
        let config = Config {
            app: app_info!(),
            server: ServerConfig::default(),
            environment: Environment::Development,
            pricing: PricingConfig::default(),
            catalog_path: PathBuf::from("catalog.json"),
        };
        let catalog = InMemoryCatalog::new(CatalogSnapshot { services, rows }).unwrap();
        AppState::new(config, catalog, ModifierRuleSet::print_shop_defaults())
    }

    fn posters() -> (Vec<Service>, Vec<PriceRow>) {
        let services = vec![Service {
            id: 1,
            slug: "posters".into(),
            name: "Posters".into(),
            category: None,
            active: true,
            sort_order: 0,
        }];
        let rows = vec![PriceRow {
            id: 1,
            service_id: 1,
            attrs: selection([("Size", "A2")]),
            rule_kind: RuleKind::Fixed,
            unit: None,
            fixed: Some("12.50".parse().unwrap()),
            setup: None,
            tiers: vec![],
        }];
        (services, rows)
    }

    async fn json_body(body: Body) -> Value {
        let bytes = body.collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_quote_is_mounted_under_pricing() {
        let (services, rows) = posters();
        let app = routes(&state(services, rows));

        let request = Request::builder()
            .method("POST")
            .uri("/pricing/quote")
            .header("content-type", "application/json")
            .body(Body::from(
                json!({ "slug": "posters", "qty": 3, "selection": { "Size": "A2" } }).to_string(),
            ))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response.into_body()).await;
        assert_eq!(body["breakdown"]["gross"], "15.00");
    }

    #[tokio::test]
    async fn test_ready_with_services() {
        let (services, rows) = posters();
        let app = ready_router(state(services, rows));

        let response = app
            .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response.into_body()).await;
        assert_eq!(body["catalog"], "ok");
    }

    #[tokio::test]
    async fn test_not_ready_with_empty_catalog() {
        let app = ready_router(state(vec![], vec![]));

        let response = app
            .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = json_body(response.into_body()).await;
        assert_eq!(body["status"], "not ready");
    }
}
