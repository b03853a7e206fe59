// ABOUTME: Shopping list route handlers - basic and enhanced composition entry points
// ABOUTME: Both share one default urgency threshold; rounding happens here, not in the core
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Project

//! Shopping list routes.
//!
//! The basic list is prediction-only; the enhanced list additionally folds
//! in the caller's inventory snapshot, today's meal plan and complementary
//! suggestions. A recommendation failure never fails these requests.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use larder_core::{InventoryItem, ShoppingListEntry};
use larder_intelligence::ComposeRequest;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;

use crate::errors::{AppError, AppResult};
use crate::resources::ServerResources;

/// Shopping list routes.
pub fn routes() -> Router<Arc<ServerResources>> {
    Router::new()
        .route("/smart_shopping_list/", get(smart_shopping_list))
        .route("/enhanced_smart_shopping_list/", post(enhanced_smart_shopping_list))
        .route("/suggest_similar_products/", post(suggest_similar_products))
}

#[derive(Debug, Deserialize)]
struct ThresholdQuery {
    threshold_days: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct EnhancedShoppingListRequest {
    #[serde(default)]
    inventory: Vec<InventoryItem>,
    threshold_days: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct SimilarProductsRequest {
    item_name: String,
}

fn resolve_threshold(
    requested: Option<f64>,
    resources: &ServerResources,
) -> AppResult<f64> {
    let threshold =
        requested.unwrap_or(resources.config.shopping.default_urgency_threshold_days);
    if !threshold.is_finite() || threshold <= 0.0 {
        return Err(AppError::invalid_input(
            "threshold_days must be a positive number",
        ));
    }
    Ok(threshold)
}

fn sufficient_stock_response() -> Value {
    json!({
        "status": "success",
        "message": "All items have sufficient stock",
        "shopping_list": []
    })
}

async fn smart_shopping_list(
    State(resources): State<Arc<ServerResources>>,
    Query(query): Query<ThresholdQuery>,
) -> AppResult<Json<Value>> {
    let threshold = resolve_threshold(query.threshold_days, &resources)?;
    let events = resources.database.all_events().await?;

    let entries = resources
        .composer
        .basic_list(
            resources.recommender.as_ref(),
            &events,
            threshold,
            Utc::now(),
        )
        .await;

    if entries.is_empty() {
        return Ok(Json(sufficient_stock_response()));
    }

    let entries: Vec<ShoppingListEntry> =
        entries.into_iter().map(ShoppingListEntry::rounded).collect();
    Ok(Json(json!({
        "status": "success",
        "shopping_list": entries,
    })))
}

async fn enhanced_smart_shopping_list(
    State(resources): State<Arc<ServerResources>>,
    Json(body): Json<EnhancedShoppingListRequest>,
) -> AppResult<Json<Value>> {
    let threshold = resolve_threshold(body.threshold_days, &resources)?;
    let events = resources.database.all_events().await?;
    let now = Utc::now();

    // Only a plan generated for today contributes requirements; a stale or
    // unreadable plan degrades to "no meal plan", not a failed request.
    let meal_plan_ingredients = match resources.database.latest_meal_plan().await {
        Ok(Some(plan)) if plan.date == now.date_naive() => Some(plan.scheduled_ingredients()),
        Ok(_) => None,
        Err(err) => {
            warn!(%err, "failed to load meal plan; composing without it");
            None
        }
    };

    let list = resources
        .composer
        .compose(
            resources.recommender.as_ref(),
            ComposeRequest {
                events: &events,
                inventory: &body.inventory,
                urgency_threshold_days: threshold,
                meal_plan_ingredients: meal_plan_ingredients.as_deref(),
                now,
            },
        )
        .await;

    if list.is_empty() {
        return Ok(Json(sufficient_stock_response()));
    }

    let total_items = list.total_items();
    Ok(Json(json!({
        "status": "success",
        "shopping_list": list.rounded(),
        "total_items": total_items,
    })))
}

async fn suggest_similar_products(
    State(resources): State<Arc<ServerResources>>,
    Json(request): Json<SimilarProductsRequest>,
) -> AppResult<Json<Value>> {
    let similar_products = match resources
        .recommender
        .suggest_similar(&request.item_name)
        .await
    {
        Ok(suggestions) => suggestions,
        Err(err) => {
            warn!(item = %request.item_name, %err, "recommendation failed; returning empty list");
            Vec::new()
        }
    };

    Ok(Json(json!({
        "item_name": request.item_name,
        "similar_products": similar_products,
    })))
}
