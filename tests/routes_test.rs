// ABOUTME: HTTP-level tests for the Larder routes over an in-memory store
// ABOUTME: Stub LLM answers keep suggestion and planning behavior deterministic
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Project
#![allow(clippy::unwrap_used)]

//! Route behavior tests.

mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use larder_server::routes;
use serde_json::{json, Value};
use tower::ServiceExt;

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn health_reports_accessible_storage() {
    let app = routes::router(common::seeded_resources("Butter, Cereal").await);
    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["data_storage"], "accessible");
}

#[tokio::test]
async fn logging_consumption_appends_an_event() {
    let resources = common::seeded_resources("Butter, Cereal").await;
    let app = routes::router(resources.clone());

    let response = app
        .oneshot(post_json(
            "/log_consumption/",
            &json!({"item_name": "Yogurt", "quantity_used": 1, "remaining_stock": 4}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Consumption logged successfully");

    let items = resources.database.distinct_items().await.unwrap();
    assert!(items.contains(&"Yogurt".to_string()));
}

#[tokio::test]
async fn logging_rejects_blank_item_names() {
    let app = routes::router(common::seeded_resources("").await);
    let response = app
        .oneshot(post_json(
            "/log_consumption/",
            &json!({"item_name": "  ", "quantity_used": 1, "remaining_stock": 4}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn predicting_a_tracked_item_rounds_for_presentation() {
    let app = routes::router(common::seeded_resources("").await);
    let response = app.oneshot(get("/predict/Milk")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["item_name"], "Milk");
    // 3 units at ~0.483/day is ~6.2 days.
    assert_eq!(body["days_until_empty"], 6.2);
    assert!(body["prediction"]
        .as_str()
        .unwrap()
        .starts_with("Refill needed by "));
}

#[tokio::test]
async fn predicting_an_unknown_item_is_a_bad_request() {
    let app = routes::router(common::seeded_resources("").await);
    let response = app.oneshot(get("/predict/Caviar")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = common::body_json(response).await;
    assert_eq!(body["error"]["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn expiry_ranking_returns_the_front_runner() {
    let app = routes::router(common::seeded_resources("").await);
    let response = app.oneshot(get("/predict_expiry/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    assert_eq!(body["item_name"], "Bread");
    assert_eq!(body["days_left"], 1.9);
}

#[tokio::test]
async fn smart_shopping_list_carries_suggestions() {
    let app = routes::router(common::seeded_resources("Butter, Cereal").await);
    let response = app.oneshot(get("/smart_shopping_list/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;

    let list = body["shopping_list"].as_array().unwrap();
    // Bread and Tomatoes sit below the default five-day threshold.
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["item_name"], "Bread");
    assert_eq!(list[1]["item_name"], "Tomatoes");
    assert_eq!(
        list[0]["suggested_similar_items"],
        json!(["Butter", "Cereal"])
    );
}

#[tokio::test]
async fn sufficient_stock_shape_is_verbatim() {
    let app = routes::router(common::seeded_resources("").await);
    let response = app
        .oneshot(get("/smart_shopping_list/?threshold_days=0.5"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    assert_eq!(
        body,
        json!({
            "status": "success",
            "message": "All items have sufficient stock",
            "shopping_list": []
        })
    );
}

#[tokio::test]
async fn nonpositive_thresholds_are_rejected() {
    let app = routes::router(common::seeded_resources("").await);
    let response = app
        .oneshot(get("/smart_shopping_list/?threshold_days=-1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn zero_quantity_override_classifies_as_urgent() {
    let app = routes::router(common::seeded_resources("Butter, Cereal").await);
    let response = app
        .oneshot(post_json(
            "/enhanced_smart_shopping_list/",
            &json!({
                "inventory": [
                    {"item_name": "bread", "quantity": 0, "unit": "loaf"}
                ]
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;

    let urgent = body["shopping_list"]["urgent_items"].as_array().unwrap();
    assert_eq!(urgent.len(), 1);
    assert_eq!(urgent[0]["item_name"], "Bread");
    assert_eq!(urgent[0]["days_left"], 0.0);
    assert_eq!(urgent[0]["remaining_stock"], 0.0);

    // Stub suggestions become complementary entries with unknown urgency.
    let complementary = body["shopping_list"]["complementary_suggestions"]
        .as_array()
        .unwrap();
    assert!(!complementary.is_empty());
    assert!(complementary
        .iter()
        .all(|entry| entry["days_left"].is_null()));
}

#[tokio::test]
async fn similar_product_suggestions_are_capped_at_three() {
    let app = routes::router(common::seeded_resources("A, B, C, D, E").await);
    let response = app
        .oneshot(post_json(
            "/suggest_similar_products/",
            &json!({"item_name": "Milk"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    assert_eq!(body["similar_products"], json!(["A", "B", "C"]));
}

#[tokio::test]
async fn item_history_is_not_found_for_unknown_items() {
    let app = routes::router(common::seeded_resources("").await);
    let response = app.oneshot(get("/item_history/Caviar")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
