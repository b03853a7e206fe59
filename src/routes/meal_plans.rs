// ABOUTME: Meal plan route handlers - generation and rolling history
// ABOUTME: Generation failures surface as gateway errors; history reads are plain
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Project

//! Meal planning routes.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use larder_core::MealPlanRequest;
use serde_json::{json, Value};

use crate::errors::AppResult;
use crate::resources::ServerResources;

/// Meal plan routes.
pub fn routes() -> Router<Arc<ServerResources>> {
    Router::new()
        .route("/generate_meal_plan/", post(generate_meal_plan))
        .route("/meal_plans/", get(meal_plan_history))
}

async fn generate_meal_plan(
    State(resources): State<Arc<ServerResources>>,
    Json(request): Json<MealPlanRequest>,
) -> AppResult<Json<Value>> {
    let plan = resources.meal_planner.generate(&request, Utc::now()).await?;
    Ok(Json(json!({ "status": "success", "meal_plan": plan })))
}

async fn meal_plan_history(
    State(resources): State<Arc<ServerResources>>,
) -> AppResult<Json<Value>> {
    let meal_plans = resources.database.meal_plan_history().await?;
    Ok(Json(json!({ "status": "success", "meal_plans": meal_plans })))
}
