// ABOUTME: Route module wiring - assembles the axum router over shared resources
// ABOUTME: Permissive CORS to match the browser frontend's expectations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Project

//! HTTP routes.

pub mod consumption;
pub mod health;
pub mod meal_plans;
pub mod predictions;
pub mod shopping;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::resources::ServerResources;

/// Build the full application router.
pub fn router(resources: Arc<ServerResources>) -> Router {
    Router::new()
        .merge(health::routes())
        .merge(consumption::routes())
        .merge(predictions::routes())
        .merge(shopping::routes())
        .merge(meal_plans::routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(resources)
}
