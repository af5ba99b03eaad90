//! Integration tests for the Observer API endpoints.
//!
//! Tests use Axum's `Router` directly via `tower::ServiceExt` without
//! starting a TCP server. No dispatcher runs, so admitted customers stay
//! in the roster for the duration of a test.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use rust_decimal::Decimal;
use serde_json::Value;
use storesim_core::Store;
use storesim_core::accident::AccidentController;
use storesim_core::config::SimulationConfig;
use storesim_observer::router::build_router;
use storesim_observer::state::AppState;
use storesim_types::{Customer, CustomerId, ProductCategory};
use tower::ServiceExt;

async fn make_test_state() -> Arc<AppState> {
    let config = SimulationConfig::default();
    let store = Arc::new(Store::from_config(&config));
    let accidents = Arc::new(AccidentController::new(Arc::clone(&store), &config.accidents));

    let customer = Customer::new(CustomerId::new(1), ProductCategory::Vegetables)
        .with_name("Anna", "Ivanova")
        .with_history(Decimal::new(12_050, 2), 3, 5);
    store.add_customer(customer).await.unwrap();

    Arc::new(AppState::new(store, accidents))
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_empty(uri: &str) -> Request<Body> {
    Request::post(uri).body(Body::empty()).unwrap()
}

// =========================================================================
// Tests
// =========================================================================

#[tokio::test]
async fn test_index_returns_html() {
    let router = build_router(make_test_state().await);

    let response = router
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(content_type.contains("text/html"));
}

#[tokio::test]
async fn test_list_customers() {
    let router = build_router(make_test_state().await);

    let response = router
        .oneshot(Request::get("/api/customers").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["count"], 1);
    assert_eq!(json["customers"][0]["first_name"], "Anna");
    assert_eq!(json["customers"][0]["current_position"]["x"], 50);
    assert_eq!(json["customers"][0]["current_position"]["y"], 500);
}

#[tokio::test]
async fn test_create_customer() {
    let state = make_test_state().await;
    let router = build_router(Arc::clone(&state));

    let body = serde_json::json!({
        "first_name": "Boris",
        "last_name": "Petrov",
        "category": "Отдел мяса",
        "purchase_count": 2,
    });
    let response = router
        .oneshot(post_json("/api/customers", &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["id"], 2);
    assert_eq!(json["customer"]["desired_product"]["category"], "meat");
    assert_eq!(json["customer"]["current_position"]["x"], 50);
    assert_eq!(json["customer"]["current_position"]["y"], 500);
    assert_eq!(state.store.roster_len().await, 2);
}

#[tokio::test]
async fn test_create_customer_requires_names() {
    let router = build_router(make_test_state().await);

    let body = serde_json::json!({ "first_name": "", "category": "bread" });
    let response = router
        .oneshot(post_json("/api/customers", &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], 400);
}

#[tokio::test]
async fn test_delete_customer() {
    let state = make_test_state().await;

    let response = build_router(Arc::clone(&state))
        .oneshot(
            Request::delete("/api/customers/1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(!state.store.contains(CustomerId::new(1)).await);

    let again = build_router(state)
        .oneshot(
            Request::delete("/api/customers/1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_customer_bad_id() {
    let router = build_router(make_test_state().await);

    let response = router
        .oneshot(
            Request::delete("/api/customers/abc")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_stats() {
    let router = build_router(make_test_state().await);

    let response = router
        .oneshot(Request::get("/api/stats").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["customers"].as_array().map(Vec::len), Some(1));
    assert_eq!(json["customer_categories"]["Отдел овощей"], 1);
    assert_eq!(json["average_purchase_count"], "3");
    assert_eq!(json["store_load"], "0.01");
    assert_eq!(json["active_workers"], 0);
}

#[tokio::test]
async fn test_get_logs() {
    let router = build_router(make_test_state().await);

    let response = router
        .oneshot(Request::get("/api/logs").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["count"], 1);
    assert!(
        json["logs"][0]
            .as_str()
            .unwrap()
            .ends_with("Added customer 1")
    );
}

#[tokio::test]
async fn test_start_simulation_admits_customers() {
    let state = make_test_state().await;

    let response = build_router(Arc::clone(&state))
        .oneshot(post_json(
            "/api/simulation/start",
            &serde_json::json!({ "customerCount": 4 }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["ids"].as_array().map(Vec::len), Some(4));
    assert_eq!(state.store.roster_len().await, 5);
}

#[tokio::test]
async fn test_start_simulation_rejects_zero() {
    let router = build_router(make_test_state().await);

    let response = router
        .oneshot(post_json(
            "/api/simulation/start",
            &serde_json::json!({ "customerCount": 0 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_accident_controls() {
    let state = make_test_state().await;

    let stop_idle = build_router(Arc::clone(&state))
        .oneshot(post_empty("/api/accidents/stop"))
        .await
        .unwrap();
    assert_eq!(stop_idle.status(), StatusCode::CONFLICT);

    let start = build_router(Arc::clone(&state))
        .oneshot(post_empty("/api/accidents/start"))
        .await
        .unwrap();
    assert_eq!(start.status(), StatusCode::OK);

    let start_again = build_router(Arc::clone(&state))
        .oneshot(post_empty("/api/accidents/start"))
        .await
        .unwrap();
    assert_eq!(start_again.status(), StatusCode::CONFLICT);
    let json = body_to_json(start_again.into_body()).await;
    assert_eq!(json["status"], 409);

    let status = build_router(Arc::clone(&state))
        .oneshot(Request::get("/api/accidents/status").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let json = body_to_json(status.into_body()).await;
    assert_eq!(json["running"], true);

    let stop = build_router(Arc::clone(&state))
        .oneshot(post_empty("/api/accidents/stop"))
        .await
        .unwrap();
    assert_eq!(stop.status(), StatusCode::OK);
    assert!(!state.accidents.is_running().await);
}
