// ABOUTME: Shared test utilities - stub LLM provider and resource assembly helpers
// ABOUTME: Keeps integration tests independent of any real model endpoint
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Project
#![allow(dead_code, clippy::unwrap_used)]

//! Shared test setup for `larder_server` integration tests.

use std::sync::{Arc, Once};

use async_trait::async_trait;
use larder_server::{
    config::{LlmConfig, ServerConfig, ShoppingConfig},
    database::Database,
    errors::AppError,
    llm::{ChatRequest, ChatResponse, LlmProvider},
    resources::ServerResources,
};
use serde_json::Value;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging once per test process.
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_test_writer()
            .init();
    });
}

/// LLM provider that always answers with the same canned content.
pub struct StubLlmProvider {
    pub content: String,
}

impl StubLlmProvider {
    pub fn answering(content: &str) -> Arc<Self> {
        Arc::new(Self {
            content: content.to_owned(),
        })
    }
}

#[async_trait]
impl LlmProvider for StubLlmProvider {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn default_model(&self) -> &str {
        "stub-model"
    }

    async fn complete(&self, _request: &ChatRequest) -> Result<ChatResponse, AppError> {
        Ok(ChatResponse {
            content: self.content.clone(),
            model: "stub-model".into(),
            finish_reason: Some("stop".into()),
        })
    }
}

/// Configuration suitable for tests: in-memory store, stub-friendly tuning.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        http_port: 0,
        database_url: "sqlite::memory:".into(),
        llm: LlmConfig {
            base_url: "http://localhost:0/v1".into(),
            api_key: None,
            model: "stub-model".into(),
        },
        shopping: ShoppingConfig {
            default_urgency_threshold_days: 5.0,
            suggestion_timeout_secs: 5,
            max_suggestion_lookups: 5,
        },
    }
}

/// Fresh in-memory store seeded with the sample consumption log.
pub async fn seeded_database() -> Arc<Database> {
    init_test_logging();
    let database = Arc::new(Database::new("sqlite::memory:").await.unwrap());
    database.seed_sample_data().await.unwrap();
    database
}

/// Full resource assembly over a seeded store and a canned LLM answer.
pub async fn seeded_resources(llm_answer: &str) -> Arc<ServerResources> {
    let database = seeded_database().await;
    Arc::new(ServerResources::new(
        test_config(),
        database,
        StubLlmProvider::answering(llm_answer),
    ))
}

/// Collect an axum response body as JSON.
pub async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
