// ABOUTME: Prediction route handlers - single-item refill and fleet-wide soonest expiry
// ABOUTME: Per-item estimator outcomes surface as 400s with their own messages
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Project

//! Refill prediction routes.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use larder_intelligence::{predict_refill, rank_soonest};
use serde_json::{json, Value};

use crate::errors::{AppError, AppResult};
use crate::resources::ServerResources;

/// Prediction routes.
pub fn routes() -> Router<Arc<ServerResources>> {
    Router::new()
        .route("/predict/:item_name", get(predict_item))
        .route("/predict_expiry/", get(predict_expiry))
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

async fn predict_item(
    State(resources): State<Arc<ServerResources>>,
    Path(item_name): Path<String>,
) -> AppResult<Json<Value>> {
    let events = resources.database.events_for_item(&item_name).await?;
    let profile = predict_refill(&item_name, &events, Utc::now())
        .map_err(|err| AppError::invalid_input(err.to_string()))?;

    let refill_date = profile.refill_date.format("%Y-%m-%d").to_string();
    Ok(Json(json!({
        "status": "success",
        "item_name": item_name,
        "prediction": format!("Refill needed by {refill_date}"),
        "days_until_empty": round1(profile.days_until_empty),
        "refill_date": refill_date,
    })))
}

async fn predict_expiry(
    State(resources): State<Arc<ServerResources>>,
) -> AppResult<Json<Value>> {
    let events = resources.database.all_events().await?;
    let soonest = rank_soonest(&events, Utc::now())
        .map_err(|err| AppError::invalid_input(err.to_string()))?;

    let expiry_date = soonest.expiry_date.format("%Y-%m-%d").to_string();
    Ok(Json(json!({
        "status": "success",
        "soonest_expiry": format!("{} will run out by {expiry_date}", soonest.item_name),
        "item_name": soonest.item_name,
        "days_left": round1(soonest.days_left),
        "expiry_date": expiry_date,
    })))
}
