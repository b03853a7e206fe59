// ABOUTME: Health check route for service monitoring
// ABOUTME: Probes the store; the LLM endpoint is reported by configuration only
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Project

//! Health check route.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::resources::ServerResources;

/// Health routes.
pub fn routes() -> Router<Arc<ServerResources>> {
    Router::new().route("/health", get(health))
}

async fn health(State(resources): State<Arc<ServerResources>>) -> Json<Value> {
    let storage_accessible = resources.database.ping().await.is_ok();
    Json(json!({
        "status": if storage_accessible { "healthy" } else { "degraded" },
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "data_storage": if storage_accessible { "accessible" } else { "inaccessible" },
        "ai_service": resources.config.llm.base_url,
    }))
}
