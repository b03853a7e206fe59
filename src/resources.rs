// ABOUTME: Shared server resources - store, agents and composer wired once at startup
// ABOUTME: Capability handles are constructed explicitly and injected, never global
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Project

//! Shared state for route handlers.

use std::sync::Arc;
use std::time::Duration;

use larder_intelligence::{ComposerConfig, Recommender, ShoppingListComposer};

use crate::config::ServerConfig;
use crate::database::Database;
use crate::llm::LlmProvider;
use crate::meal_planner::MealPlanner;
use crate::recommender::ProductRecommender;

/// Everything the HTTP layer needs, assembled once at process start.
pub struct ServerResources {
    pub config: ServerConfig,
    pub database: Arc<Database>,
    pub recommender: Arc<dyn Recommender>,
    pub meal_planner: MealPlanner,
    pub composer: ShoppingListComposer,
}

impl ServerResources {
    /// Wire resources from a store and an LLM provider handle.
    #[must_use]
    pub fn new(
        config: ServerConfig,
        database: Arc<Database>,
        provider: Arc<dyn LlmProvider>,
    ) -> Self {
        let recommender = Arc::new(ProductRecommender::new(
            Arc::clone(&provider),
            Duration::from_secs(config.shopping.suggestion_timeout_secs),
        ));
        let meal_planner = MealPlanner::new(provider, Arc::clone(&database));
        let composer = ShoppingListComposer::with_config(ComposerConfig {
            max_suggestion_lookups: config.shopping.max_suggestion_lookups,
            ..ComposerConfig::default()
        });
        Self {
            config,
            database,
            recommender,
            meal_planner,
            composer,
        }
    }
}
