// ABOUTME: Consumption log route handlers - logging events and browsing item history
// ABOUTME: Appends are dated server-side; history reads are exact-name lookups
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Project

//! Consumption logging and history routes.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use larder_core::ConsumptionEvent;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::errors::{AppError, AppResult};
use crate::resources::ServerResources;

/// Consumption routes.
pub fn routes() -> Router<Arc<ServerResources>> {
    Router::new()
        .route("/log_consumption/", post(log_consumption))
        .route("/items/", get(list_items))
        .route("/item_history/:item_name", get(item_history))
}

#[derive(Debug, Deserialize)]
struct LogConsumptionRequest {
    item_name: String,
    quantity_used: f64,
    remaining_stock: f64,
}

async fn log_consumption(
    State(resources): State<Arc<ServerResources>>,
    Json(entry): Json<LogConsumptionRequest>,
) -> AppResult<Json<Value>> {
    let item_name = entry.item_name.trim();
    if item_name.is_empty() {
        return Err(AppError::invalid_input("item_name must not be empty"));
    }
    if !entry.quantity_used.is_finite() || !entry.remaining_stock.is_finite() {
        return Err(AppError::invalid_input(
            "quantity_used and remaining_stock must be finite numbers",
        ));
    }

    let event = ConsumptionEvent::new(
        item_name,
        Utc::now().date_naive(),
        entry.quantity_used,
        entry.remaining_stock,
    );
    resources.database.append_event(&event).await?;
    info!(item = %event.item_name, "logged consumption event");

    Ok(Json(json!({
        "status": "success",
        "message": "Consumption logged successfully"
    })))
}

async fn list_items(
    State(resources): State<Arc<ServerResources>>,
) -> AppResult<Json<Value>> {
    let items = resources.database.distinct_items().await?;
    Ok(Json(json!({ "status": "success", "items": items })))
}

async fn item_history(
    State(resources): State<Arc<ServerResources>>,
    Path(item_name): Path<String>,
) -> AppResult<Json<Value>> {
    let events = resources.database.events_for_item(&item_name).await?;
    if events.is_empty() {
        return Err(AppError::not_found(format!(
            "no consumption history for item: {item_name}"
        )));
    }

    let history: Vec<Value> = events
        .iter()
        .map(|event| {
            json!({
                "date": event.date_consumed.to_string(),
                "quantity_used": event.quantity_used,
                "remaining_stock": event.remaining_stock,
            })
        })
        .collect();

    Ok(Json(json!({
        "status": "success",
        "item_name": item_name,
        "history": history,
    })))
}
