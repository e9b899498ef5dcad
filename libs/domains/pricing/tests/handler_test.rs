//! Handler tests for the pricing domain
//!
//! These drive the pricing router with `oneshot` against an in-memory
//! catalog and check status codes and the `{ok, ...}` envelope.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use domain_pricing::*;
use http_body_util::BodyExt;
use rust_decimal_macros::dec;
use serde_json::{Value, json};
use tower::ServiceExt; // For oneshot()
use utoipa::OpenApi;

async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn catalog() -> InMemoryCatalog {
    let services = vec![
        Service {
            id: 1,
            slug: "flyers".into(),
            name: "Flyers".into(),
            category: Some("Marketing".into()),
            active: true,
            sort_order: 1,
        },
        Service {
            id: 2,
            slug: "business-cards".into(),
            name: "Business cards".into(),
            category: Some("Stationery".into()),
            active: true,
            sort_order: 0,
        },
        Service {
            id: 3,
            slug: "calendars".into(),
            name: "Calendars".into(),
            category: None,
            active: false,
            sort_order: 2,
        },
    ];

    let rows = vec![
        PriceRow {
            id: 1,
            service_id: 1,
            attrs: selection([("Size", "A5")]),
            rule_kind: RuleKind::PerUnit,
            unit: Some(dec!(2.00)),
            fixed: None,
            setup: None,
            tiers: vec![],
        },
        PriceRow {
            id: 2,
            service_id: 2,
            attrs: selection([("Paper", "Matte 350g")]),
            rule_kind: RuleKind::Tiered,
            unit: None,
            fixed: None,
            setup: Some(dec!(10)),
            tiers: vec![
                Tier { qty: 50, unit: dec!(3.00) },
                Tier { qty: 100, unit: dec!(2.50) },
            ],
        },
    ];

    InMemoryCatalog::new(CatalogSnapshot { services, rows }).unwrap()
}

fn app() -> axum::Router {
    let engine = QuoteEngine::new(PricingConfig::default(), ModifierRuleSet::print_shop_defaults());
    handlers::router(PricingService::new(catalog(), engine))
}

fn quote_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/quote")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

#[tokio::test]
async fn test_quote_returns_breakdown() {
    let response = app()
        .oneshot(quote_request(json!({
            "slug": "flyers",
            "qty": 100,
            "selection": { "Size": "A5" },
            "extras": { "Lamination": "Matte" }
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["ok"], true);
    assert_eq!(body["breakdown"]["base"]["net"], "200.00");
    assert_eq!(body["breakdown"]["modifiers"]["items"][0]["label"], "Lamination: Matte");
    assert_eq!(body["breakdown"]["gross"], "247.20");
    assert_eq!(body["breakdown"]["currency"], "EUR");
    assert!(body["breakdown"].get("warnings").is_none());
}

#[tokio::test]
async fn test_tiered_quote() {
    let response = app()
        .oneshot(quote_request(json!({
            "slug": "business-cards",
            "qty": 100,
            "selection": { "Paper": "Matte 350g" }
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["breakdown"]["base"]["ruleKind"], "tiered");
    assert_eq!(body["breakdown"]["base"]["tier"]["qty"], 100);
    assert_eq!(body["breakdown"]["base"]["net"], "260.00");
}

#[tokio::test]
async fn test_below_minimum_tier_is_400() {
    let response = app()
        .oneshot(quote_request(json!({
            "slug": "business-cards",
            "qty": 40,
            "selection": { "Paper": "Matte 350g" }
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["ok"], false);
    assert!(body["error"].as_str().unwrap().contains("minimum tier"));
}

#[tokio::test]
async fn test_invalid_quantity_is_400() {
    let response = app()
        .oneshot(quote_request(json!({
            "slug": "flyers",
            "qty": 0,
            "selection": { "Size": "A5" }
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_empty_slug_is_400_with_envelope() {
    let response = app()
        .oneshot(quote_request(json!({ "slug": "", "qty": 1 })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["ok"], false);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid input"));
}

#[tokio::test]
async fn test_malformed_json_is_400() {
    let request = Request::builder()
        .method("POST")
        .uri("/quote")
        .header("content-type", "application/json")
        .body(Body::from("{\"slug\": \"flyers\", \"qty\": \"lots\"}"))
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["ok"], false);
}

#[tokio::test]
async fn test_unknown_service_is_404() {
    let response = app()
        .oneshot(quote_request(json!({ "slug": "mugs", "qty": 10 })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body: handlers::QuoteErrorResponse = json_body(response.into_body()).await;
    assert!(!body.ok);
    assert_eq!(body.error, "Service not found: mugs");
}

#[tokio::test]
async fn test_inactive_service_is_404() {
    let response = app()
        .oneshot(quote_request(json!({ "slug": "calendars", "qty": 10 })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unmatched_selection_is_404() {
    let response = app()
        .oneshot(quote_request(json!({
            "slug": "flyers",
            "qty": 10,
            "selection": { "Size": "A0" }
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_services_returns_active_in_order() {
    let request = Request::builder()
        .uri("/services")
        .body(Body::empty())
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let services: Vec<Service> = json_body(response.into_body()).await;
    let slugs: Vec<_> = services.iter().map(|s| s.slug.as_str()).collect();
    assert_eq!(slugs, ["business-cards", "flyers"]);
}

#[tokio::test]
async fn test_get_price_table() {
    let request = Request::builder()
        .uri("/services/flyers")
        .body(Body::empty())
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let table: PriceTable = json_body(response.into_body()).await;
    assert_eq!(table.service.name, "Flyers");
    assert_eq!(table.rows.len(), 1);
    assert_eq!(table.rows[0].unit, Some(dec!(2.00)));
}

#[tokio::test]
async fn test_get_price_table_unknown_is_404() {
    let request = Request::builder()
        .uri("/services/mugs")
        .body(Body::empty())
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[test]
fn test_openapi_documents_extras_for_modifier_attributes() {
    let doc = serde_json::to_value(handlers::ApiDoc::openapi()).unwrap();
    let selection = &doc["components"]["schemas"]["QuoteRequest"]["properties"]["selection"];

    let description = selection["description"].as_str().unwrap_or_default();
    assert!(description.contains("modifier-only attributes"));
    assert!(description.contains("`extras`"));
}
